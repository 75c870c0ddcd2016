use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use log::error;

use crate::components::skill_graph::{GraphData, SkillGraphCanvas};
use crate::content;

/// One legend swatch: label and the CSS class that colours it.
#[derive(Clone, Debug, PartialEq, Eq)]
struct LegendEntry {
	label: String,
	swatch: &'static str,
}

const CLICK_HINT: &str = "Click projects to view details";

fn legend(graph: &GraphData) -> Vec<LegendEntry> {
	vec![
		LegendEntry {
			label: format!("Skills ({})", graph.skill_count()),
			swatch: "swatch-skill",
		},
		LegendEntry {
			label: format!("Projects ({})", graph.project_count()),
			swatch: "swatch-project",
		},
	]
}

/// Skills page hosting the network map overlay.
#[component]
pub fn Skills() -> impl IntoView {
	let (graph_open, set_graph_open) = signal(false);
	let (intent, set_intent) = signal(None::<String>);

	let navigate = use_navigate();
	Effect::new(move |_| {
		if let Some(project) = intent.get() {
			navigate(&format!("/projects/{project}"), Default::default());
		}
	});

	let graph = match content::skill_graph() {
		Ok(data) => {
			let entries = legend(&data);
			let data = Signal::derive(move || data.clone());
			view! {
				<button class="open-graph" on:click=move |_| set_graph_open.set(true)>
					"Open network map"
				</button>
				<Show when=move || graph_open.get()>
					<div class="graph-overlay" on:click=move |_| set_graph_open.set(false)>
						<div class="graph-panel" on:click=|ev| ev.stop_propagation()>
							<header class="graph-header">
								<h2>"Skills × Projects Network"</h2>
								<p class="subtitle">
									"Hover to see connections. Drag to rearrange. Click a project for details."
								</p>
								<button class="close" on:click=move |_| set_graph_open.set(false)>
									"Close"
								</button>
							</header>
							<div class="graph-body">
								<SkillGraphCanvas
									data=data
									on_navigate=move |project: String| {
										set_graph_open.set(false);
										set_intent.set(Some(project));
									}
								/>
							</div>
							<footer class="graph-legend">
								{entries
									.iter()
									.map(|entry| {
										view! {
											<span class="legend-item">
												<span class=format!("swatch {}", entry.swatch)></span>
												{entry.label.clone()}
											</span>
										}
									})
									.collect_view()}
								<span class="legend-hint">{CLICK_HINT}</span>
							</footer>
						</div>
					</div>
				</Show>
			}
			.into_any()
		}
		Err(err) => {
			error!("skill graph data is invalid: {err}");
			view! { <p class="graph-error">{err.to_string()}</p> }.into_any()
		}
	};

	view! {
		<section class="page">
			<h1>"Skills & Expertise"</h1>
			<p>
				"Explore how my skills connect to real projects through an interactive network."
			</p>
			{graph}
		</section>
	}
}
