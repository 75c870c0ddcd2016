// The library carries every dependency; the entry point only mounts it.
#![allow(unused_crate_dependencies)]

use portfolio_network::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
