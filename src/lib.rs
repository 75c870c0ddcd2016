//! Portfolio site with an interactive skills × projects network.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod components;
pub mod content;
mod pages;

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::projects::{ProjectDetail, Projects};
use crate::pages::skills::Skills;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Site shell: navigation bar plus the page router.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Portfolio" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<nav class="site-nav">
				<A href="/">"Home"</A>
				<A href="/skills">"Skills"</A>
				<A href="/projects">"Projects"</A>
			</nav>
			<main class="site-main">
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=Home />
					<Route path=path!("/skills") view=Skills />
					<Route path=path!("/projects") view=Projects />
					<Route path=path!("/projects/:id") view=ProjectDetail />
				</Routes>
			</main>
		</Router>
	}
}
