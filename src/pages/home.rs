use leptos::prelude::*;
use leptos_router::components::A;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<div class="home">
			<h1>"Flowchart editor"</h1>
			<p>
				"A fabrication pipeline laid out on a grid. Drag nodes, connect them from their ports, \
				double-click an edge to rename it."
			</p>
			<p class="subtitle">
				"Ctrl+C / X / V copy, cut and paste. Ctrl+Z undo, Ctrl+Shift+Z redo. Ctrl+A selects \
				everything, Backspace deletes. Ctrl+1 / Ctrl+2 zoom."
			</p>
			<A href="/flowchart">"Open the flowchart"</A>
		</div>
	}
}
