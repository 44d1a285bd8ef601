use log::debug;

use super::geometry::{fit_label, select_ports};
use super::layout::{GridOptions, grid_layout};
use super::types::{
	EdgeLabel, EdgeRecord, EdgeStyle, Flowchart, GraphData, NodeRecord, Size,
};

/// Turns static literals into unpositioned records.
pub fn records(data: &GraphData) -> Flowchart {
	let nodes = data
		.nodes
		.iter()
		.map(|n| NodeRecord {
			id: n.id.clone(),
			label: n.label.clone(),
			description: n.description.clone(),
			size: Size {
				width: n.width,
				height: n.height,
			},
			shape: n.shape,
			ports: Some(n.shape.template().ports),
			position: None,
		})
		.collect();

	let edges = data
		.links
		.iter()
		.enumerate()
		.map(|(i, l)| EdgeRecord {
			id: format!("e{}", i + 1),
			source: l.source.clone(),
			target: l.target.clone(),
			source_port: None,
			target_port: None,
			label: EdgeLabel::new(l.label.clone()),
			style: EdgeStyle::default(),
			tools: l.tools,
		})
		.collect();

	Flowchart { nodes, edges }
}

/// Assigns ports to every edge whose endpoints are both positioned.
pub fn adjust_ports(chart: &mut Flowchart) {
	let Flowchart { nodes, edges } = chart;
	for edge in edges.iter_mut() {
		let source = nodes.iter().find(|n| n.id == edge.source).and_then(NodeRecord::rect);
		let target = nodes.iter().find(|n| n.id == edge.target).and_then(NodeRecord::rect);
		let (Some(source), Some(target)) = (source, target) else {
			debug!("skipping ports for edge {}: endpoint not positioned", edge.id);
			continue;
		};
		let (sp, tp) = select_ports(&source, &target);
		edge.source_port = Some(sp);
		edge.target_port = Some(tp);
	}
}

/// Re-fits every edge label from its original text.
pub fn adjust_labels(chart: &mut Flowchart) {
	let Flowchart { nodes, edges } = chart;
	for edge in edges.iter_mut() {
		let source = nodes.iter().find(|n| n.id == edge.source).and_then(NodeRecord::rect);
		let target = nodes.iter().find(|n| n.id == edge.target).and_then(NodeRecord::rect);
		let (Some(source), Some(target)) = (source, target) else {
			debug!("skipping label fit for edge {}: endpoint not positioned", edge.id);
			continue;
		};
		edge.label.display = fit_label(
			&source,
			&target,
			edge.source_port,
			edge.target_port,
			&edge.label.original,
		);
	}
}

/// Layout, port selection and label fitting, in that order.
pub fn prepare(data: &GraphData, grid: &GridOptions) -> Flowchart {
	let mut chart = records(data);
	grid_layout(&mut chart.nodes, grid);
	adjust_ports(&mut chart);
	adjust_labels(&mut chart);
	chart
}
