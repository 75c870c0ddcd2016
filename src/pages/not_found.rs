use leptos::prelude::*;
use leptos_router::components::A;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<section class="page">
			<h1>"Page not found"</h1>
			<A href="/">"Back home"</A>
		</section>
	}
}
