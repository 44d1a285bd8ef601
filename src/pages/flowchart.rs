use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use log::warn;

use crate::components::flowchart::{
	EdgeTools, FlowchartCanvas, GraphData, GraphLink, GraphNode, GridOptions, ShapeKind, SortKey,
};

const STEPS: &[(&str, &str, &str)] = &[
	(
		"1",
		"Design & simulation",
		"Lay out the die and simulate its function from the circuit design.",
	),
	(
		"2",
		"Material preparation",
		"Select a suitable semiconductor substrate, usually silicon.",
	),
	(
		"3",
		"Photolithography",
		"Transfer the circuit pattern onto the wafer surface.",
	),
	(
		"4",
		"Etching",
		"Remove unwanted material by wet or dry etching to form the pattern.",
	),
	(
		"5",
		"Doping",
		"Introduce impurities by ion implantation or diffusion to tune conductivity.",
	),
	(
		"6",
		"Deposition",
		"Grow insulating and metal layers with CVD or PVD.",
	),
	(
		"7",
		"Chemical mechanical polishing (CMP)",
		"Planarise the surface so later lithography stays precise.",
	),
	(
		"8",
		"Inspection & testing",
		"Electrical tests and failure analysis against the design rules.",
	),
	(
		"9",
		"Packaging",
		"Encapsulate good dies for physical protection and electrical contact.",
	),
	(
		"10",
		"Final test",
		"Performance test of packaged chips for quality control.",
	),
];

const HOPS: &[(&str, &str, &str)] = &[
	("1", "2", "Transition"),
	("2", "3", "Materials ready -> start lithography"),
	("3", "4", "Lithography done -> etch"),
	("4", "5", "Etching done -> dope"),
	("5", "6", "Doping done -> deposit"),
	("6", "7", "Deposition done -> polish"),
	("7", "8", "CMP done -> inspect and test"),
	("8", "9", "Tests passed -> package"),
	("9", "10", "Packaged -> final test"),
];

/// The fixed chip fabrication pipeline shown in the editor.
fn pipeline_data() -> GraphData {
	let nodes = STEPS
		.iter()
		.map(|&(id, label, description)| GraphNode {
			id: id.into(),
			label: label.into(),
			description: Some(description.into()),
			width: 100.0,
			height: 40.0,
			shape: ShapeKind::Process,
		})
		.collect();

	let links = HOPS
		.iter()
		.enumerate()
		.map(|(i, &(source, target, label))| GraphLink {
			source: source.into(),
			target: target.into(),
			label: label.into(),
			tools: EdgeTools {
				// only the first two hops carry a remove button
				remove_button: i < 2,
				editor: true,
			},
		})
		.collect();

	GraphData { nodes, links }
}

/// Grid options from the `sort` query value; unknown keys fall back to id order.
fn grid_options(sort: Option<&str>) -> GridOptions {
	let sort_by = match sort {
		Some(name) => SortKey::parse(name).unwrap_or_else(|| {
			warn!("unknown sort key {name:?}, sorting by id");
			SortKey::Id
		}),
		None => SortKey::Id,
	};
	GridOptions {
		sort_by,
		..GridOptions::default()
	}
}

/// Flowchart editor page. `?sort=label|insertion|id` orders the grid and
/// `?fullscreen` sizes the canvas to the window.
#[component]
pub fn FlowchartPage() -> impl IntoView {
	let graph_data = Signal::derive(pipeline_data);
	let query = use_query_map();
	let (grid, fullscreen) = query.with_untracked(|q| {
		(
			grid_options(q.get("sort").as_deref()),
			q.get("fullscreen").is_some_and(|v| v != "false" && v != "0"),
		)
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<FlowchartCanvas data=graph_data grid=grid fullscreen=fullscreen />
		</ErrorBoundary>
	}
}
