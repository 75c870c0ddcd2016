use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

use crate::content::{self, PROJECTS};
use crate::pages::not_found::NotFound;

/// Project index.
#[component]
pub fn Projects() -> impl IntoView {
	view! {
		<section class="page">
			<h1>"Projects"</h1>
			<ul class="project-list">
				{PROJECTS
					.iter()
					.map(|&(key, name, impact, color)| {
						view! {
							<li style=format!("border-color: {color}")>
								<A href=format!("/projects/{key}")>{name}</A>
								<span class="impact">{impact}</span>
							</li>
						}
					})
					.collect_view()}
			</ul>
		</section>
	}
}

/// Single project with the skills it used.
#[component]
pub fn ProjectDetail() -> impl IntoView {
	let params = use_params_map();
	let graph = content::skill_graph().ok();

	move || {
		let id = params.with(|p| p.get("id")).unwrap_or_default();
		let Some(&(_, name, impact, color)) = PROJECTS.iter().find(|p| p.0 == id) else {
			return view! { <NotFound /> }.into_any();
		};
		let skills: Vec<String> = graph
			.as_ref()
			.map(|g| g.skills_for_project(&id).into_iter().map(|n| n.label.clone()).collect())
			.unwrap_or_default();

		view! {
			<section class="page project-detail">
				<h1 style=format!("color: {color}")>{name}</h1>
				<p class="impact">{impact}</p>
				<h2>"Built with"</h2>
				<ul class="skill-tags">
					{skills.into_iter().map(|s| view! { <li>{s}</li> }).collect_view()}
				</ul>
				<A href="/projects">"All projects"</A>
			</section>
		}
		.into_any()
	}
}
