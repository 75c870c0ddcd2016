use leptos::prelude::*;
use leptos_router::components::A;

use crate::content::{PROJECTS, SKILL_PROJECTS};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<section class="page hero">
			<h1>"AI/ML engineer building production GenAI systems"</h1>
			<p class="subtitle">
				{format!(
					"{} projects shipped across {} core skills.",
					PROJECTS.len(),
					SKILL_PROJECTS.len(),
				)}
			</p>
			<div class="hero-links">
				<A href="/skills">"Explore the skills network"</A>
				<A href="/projects">"See projects"</A>
			</div>
		</section>
	}
}
