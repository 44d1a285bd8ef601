//! Browser entry point: starts logging and mounts the flowchart editor app.

use flowchart_editor::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App)
}
