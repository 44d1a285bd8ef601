use std::collections::{BTreeSet, HashMap};

use log::{debug, info};

use super::geometry::{distance_to_segment, fit_label, port_point, select_ports};
use super::keymap::Command;
use super::shape::StencilItem;
use super::types::{
	EdgeLabel, EdgeRecord, EdgeStyle, EdgeTools, Flowchart, NodeRecord, Port, Position, Rect,
};

pub const PORT_RADIUS: f64 = 4.0;
pub const PASTE_OFFSET: f64 = 32.0;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.1;
/// How far along an edge, from its source, the remove button sits.
pub const REMOVE_BUTTON_DISTANCE: f64 = 20.0;
pub const REMOVE_BUTTON_RADIUS: f64 = 7.0;
const EDGE_HIT: f64 = 6.0;
const HISTORY_LIMIT: usize = 100;

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Position,
	moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<String>,
	pub edge: Option<String>,
}

/// A connection being dragged out of a port. `x`/`y` is the cursor in graph
/// coordinates.
#[derive(Clone, Debug)]
pub struct ConnectState {
	pub source: String,
	pub port: Port,
	pub x: f64,
	pub y: f64,
}

/// The editor engine: the document plus everything the canvas interaction
/// needs. Created when the view mounts and dropped when it unmounts.
pub struct FlowchartState {
	pub chart: Flowchart,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub linking: Option<ConnectState>,
	pub selected_nodes: BTreeSet<String>,
	pub selected_edges: BTreeSet<String>,
	pub width: f64,
	pub height: f64,
	undo: Vec<Flowchart>,
	redo: Vec<Flowchart>,
	clipboard: Option<Flowchart>,
	next_id: usize,
}

impl FlowchartState {
	pub fn new(chart: Flowchart, width: f64, height: f64) -> Self {
		let next_id = chart.nodes.len() + chart.edges.len() + 1;
		let content_right = chart
			.nodes
			.iter()
			.filter_map(NodeRecord::rect)
			.map(|r| r.x + r.width)
			.fold(0.0, f64::max);
		Self {
			chart,
			transform: ViewTransform {
				x: ((width - content_right) / 2.0).max(20.0),
				y: 20.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			linking: None,
			selected_nodes: BTreeSet::new(),
			selected_edges: BTreeSet::new(),
			width,
			height,
			undo: Vec::new(),
			redo: Vec::new(),
			clipboard: None,
			next_id,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	pub fn node_at(&self, sx: f64, sy: f64) -> Option<String> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// last drawn is on top
		self.chart
			.nodes
			.iter()
			.rev()
			.find(|n| n.rect().is_some_and(|r| r.contains(gx, gy)))
			.map(|n| n.id.clone())
	}

	/// Connection port under the cursor. Ports are only live on the hovered node.
	pub fn port_at(&self, sx: f64, sy: f64) -> Option<(String, Port)> {
		let node = self.chart.node(self.hover.node.as_deref()?)?;
		let (rect, ports) = (node.rect()?, node.ports?);
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let reach = PORT_RADIUS + 3.0 / self.transform.k;
		ports
			.iter()
			.find(|&p| {
				let (px, py) = port_point(&rect, Some(p));
				(px - gx).hypot(py - gy) <= reach
			})
			.map(|p| (node.id.clone(), p))
	}

	/// Rendered endpoints of an edge in graph coordinates.
	pub fn edge_points(&self, edge: &EdgeRecord) -> Option<((f64, f64), (f64, f64))> {
		let (source, target) = self.chart.endpoints(edge)?;
		Some((
			port_point(&source, edge.source_port),
			port_point(&target, edge.target_port),
		))
	}

	pub fn label_point(&self, edge: &EdgeRecord) -> Option<(f64, f64)> {
		let (a, b) = self.edge_points(edge)?;
		Some(((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0))
	}

	pub fn remove_button_point(&self, edge: &EdgeRecord) -> Option<(f64, f64)> {
		let (a, b) = self.edge_points(edge)?;
		let len = (b.0 - a.0).hypot(b.1 - a.1);
		let t = if len > 0.0 {
			(REMOVE_BUTTON_DISTANCE / len).min(1.0)
		} else {
			0.0
		};
		Some((a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t))
	}

	pub fn edge_at(&self, sx: f64, sy: f64) -> Option<String> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let reach = EDGE_HIT / self.transform.k;
		self.chart
			.edges
			.iter()
			.rev()
			.find(|e| {
				self.edge_points(e)
					.is_some_and(|(a, b)| distance_to_segment(gx, gy, a, b) <= reach)
			})
			.map(|e| e.id.clone())
	}

	/// Remove button under the cursor; only the hovered edge shows one.
	pub fn remove_button_at(&self, sx: f64, sy: f64) -> Option<String> {
		let edge = self.chart.edge(self.hover.edge.as_deref()?)?;
		if !edge.tools.remove_button {
			return None;
		}
		let (bx, by) = self.remove_button_point(edge)?;
		let (gx, gy) = self.screen_to_graph(sx, sy);
		((bx - gx).hypot(by - gy) <= REMOVE_BUTTON_RADIUS / self.transform.k)
			.then(|| edge.id.clone())
	}

	pub fn set_hover(&mut self, node: Option<String>, edge: Option<String>) {
		self.hover.node = node;
		// nodes sit above edges
		self.hover.edge = if self.hover.node.is_some() { None } else { edge };
	}

	fn checkpoint(&mut self) {
		self.undo.push(self.chart.clone());
		if self.undo.len() > HISTORY_LIMIT {
			self.undo.remove(0);
		}
		self.redo.clear();
	}

	fn fresh_id(&mut self, prefix: &str) -> String {
		loop {
			let id = format!("{prefix}{}", self.next_id);
			self.next_id += 1;
			if self.chart.node(&id).is_none() && self.chart.edge(&id).is_none() {
				return id;
			}
		}
	}

	fn prune_selection(&mut self) {
		let chart = &self.chart;
		self.selected_nodes.retain(|id| chart.node(id).is_some());
		self.selected_edges.retain(|id| chart.edge(id).is_some());
	}

	pub fn clear_selection(&mut self) {
		self.selected_nodes.clear();
		self.selected_edges.clear();
	}

	/// Selects a node; with `additive` the node's selection is toggled instead.
	pub fn select_node(&mut self, id: &str, additive: bool) {
		if additive {
			if !self.selected_nodes.remove(id) {
				self.selected_nodes.insert(id.to_string());
			}
		} else if !self.selected_nodes.contains(id) {
			self.clear_selection();
			self.selected_nodes.insert(id.to_string());
		}
	}

	pub fn select_edge(&mut self, id: &str, additive: bool) {
		if !additive {
			self.clear_selection();
		}
		self.selected_edges.insert(id.to_string());
	}

	pub fn select_all(&mut self) {
		self.selected_nodes = self.chart.nodes.iter().map(|n| n.id.clone()).collect();
	}

	pub fn begin_drag(&mut self, id: &str, sx: f64, sy: f64) {
		let Some(position) = self.chart.node(id).and_then(|n| n.position) else {
			return;
		};
		self.drag = DragState {
			node: Some(id.to_string()),
			start_x: sx,
			start_y: sy,
			node_start: position,
			moved: false,
		};
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(id) = self.drag.node.clone() else {
			return;
		};
		let (dx, dy) = (
			(sx - self.drag.start_x) / self.transform.k,
			(sy - self.drag.start_y) / self.transform.k,
		);
		if !self.drag.moved {
			if dx == 0.0 && dy == 0.0 {
				return;
			}
			self.checkpoint();
			self.drag.moved = true;
		}
		let start = self.drag.node_start;
		if let Some(node) = self.chart.node_mut(&id) {
			node.position = Some(Position {
				x: start.x + dx,
				y: start.y + dy,
			});
		}
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	pub fn begin_connect(&mut self, source: &str, port: Port, sx: f64, sy: f64) {
		let (x, y) = self.screen_to_graph(sx, sy);
		self.linking = Some(ConnectState {
			source: source.to_string(),
			port,
			x,
			y,
		});
	}

	pub fn connect_to(&mut self, sx: f64, sy: f64) {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		if let Some(c) = self.linking.as_mut() {
			c.x = gx;
			c.y = gy;
		}
	}

	/// Ends a port drag; connects when released over another node.
	pub fn finish_connect(&mut self, sx: f64, sy: f64) -> Option<String> {
		let pending = self.linking.take()?;
		let target = self.node_at(sx, sy)?;
		self.connect(&pending.source, Some(pending.port), &target)
	}

	/// Ends any drag, pan or connection in progress without committing it.
	pub fn release_pointer(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.linking = None;
	}

	/// Adds an edge between two existing, distinct nodes.
	pub fn connect(&mut self, source: &str, source_port: Option<Port>, target: &str) -> Option<String> {
		if source == target {
			return None;
		}
		let source_node = self.chart.node(source)?;
		let target_node = self.chart.node(target)?;
		let (mut sp, mut tp) = (source_port, None);
		if let (Some(s), Some(t)) = (source_node.rect(), target_node.rect()) {
			let (auto_sp, auto_tp) = select_ports(&s, &t);
			let source_side =
				sp.unwrap_or_else(|| source_node.settle_port(auto_sp, auto_tp.opposite()));
			// decision and data shapes only take vertical connections
			tp = Some(target_node.settle_port(auto_tp, source_side.opposite()));
			sp = Some(source_side);
		}

		self.checkpoint();
		let id = self.fresh_id("e");
		self.chart.edges.push(EdgeRecord {
			id: id.clone(),
			source: source.to_string(),
			target: target.to_string(),
			source_port: sp,
			target_port: tp,
			label: EdgeLabel::default(),
			style: EdgeStyle::default(),
			tools: EdgeTools {
				remove_button: true,
				editor: true,
			},
		});
		debug!(
			"connected {source}:{} -> {target}:{} as {id}",
			sp.map_or("-", Port::as_str),
			tp.map_or("-", Port::as_str)
		);
		Some(id)
	}

	pub fn remove_edge(&mut self, id: &str) -> bool {
		if self.chart.edge(id).is_none() {
			return false;
		}
		self.checkpoint();
		self.chart.edges.retain(|e| e.id != id);
		if self.hover.edge.as_deref() == Some(id) {
			self.hover.edge = None;
		}
		self.prune_selection();
		true
	}

	/// Inserts a palette shape at the centre of the viewport and selects it.
	pub fn add_node(&mut self, item: StencilItem) -> String {
		let template = item.kind.template();
		let (cx, cy) = self.screen_to_graph(self.width / 2.0, self.height / 2.0);
		self.checkpoint();
		let id = self.fresh_id("n");
		self.chart.nodes.push(NodeRecord {
			id: id.clone(),
			label: item.label.to_string(),
			description: None,
			size: template.size,
			shape: item.kind,
			ports: Some(template.ports),
			position: Some(Position {
				x: cx - template.size.width / 2.0,
				y: cy - template.size.height / 2.0,
			}),
		});
		self.clear_selection();
		self.selected_nodes.insert(id.clone());
		id
	}

	/// Untruncated label text of an edge, for the inline editor.
	pub fn edge_text(&self, id: &str) -> Option<&str> {
		self.chart.edge(id).map(|e| e.label.original.as_str())
	}

	/// Stores `text` as the edge's label and returns the text that fits,
	/// measured on the edge's current endpoints.
	pub fn set_edge_text(&mut self, id: &str, text: &str) -> Option<String> {
		let edge = self.chart.edge(id)?;
		let ends: Option<(Rect, Rect)> = self.chart.endpoints(edge);
		let display = match ends {
			Some((s, t)) => fit_label(&s, &t, edge.source_port, edge.target_port, text),
			None => text.to_string(),
		};
		if edge.label.original == text && edge.label.display == display {
			return Some(display);
		}
		self.checkpoint();
		let edge = self.chart.edge_mut(id)?;
		edge.label = EdgeLabel {
			original: text.to_string(),
			display: display.clone(),
		};
		Some(display)
	}

	/// Copies selected nodes and the edges running between them.
	pub fn copy(&mut self) -> bool {
		if self.selected_nodes.is_empty() {
			return false;
		}
		let nodes: Vec<NodeRecord> = self
			.chart
			.nodes
			.iter()
			.filter(|n| self.selected_nodes.contains(&n.id))
			.cloned()
			.collect();
		let edges = self
			.chart
			.edges
			.iter()
			.filter(|e| self.selected_nodes.contains(&e.source) && self.selected_nodes.contains(&e.target))
			.cloned()
			.collect();
		debug!("copied {} nodes", nodes.len());
		self.clipboard = Some(Flowchart { nodes, edges });
		true
	}

	pub fn cut(&mut self) -> bool {
		self.copy() && self.delete_selection()
	}

	/// Pastes the clipboard offset from where it was copied; the pasted nodes
	/// become the selection. Repeated pastes keep stepping down and right.
	pub fn paste(&mut self) -> bool {
		let Some(mut clip) = self.clipboard.take() else {
			return false;
		};
		if clip.nodes.is_empty() {
			self.clipboard = Some(clip);
			return false;
		}
		for node in &mut clip.nodes {
			if let Some(p) = node.position.as_mut() {
				p.x += PASTE_OFFSET;
				p.y += PASTE_OFFSET;
			}
		}

		self.checkpoint();
		let mut ids = HashMap::new();
		let mut pasted = BTreeSet::new();
		for node in &clip.nodes {
			let id = self.fresh_id("n");
			ids.insert(node.id.clone(), id.clone());
			pasted.insert(id.clone());
			self.chart.nodes.push(NodeRecord {
				id,
				..node.clone()
			});
		}
		for edge in &clip.edges {
			let (Some(source), Some(target)) = (ids.get(&edge.source), ids.get(&edge.target)) else {
				continue;
			};
			let (source, target) = (source.clone(), target.clone());
			let id = self.fresh_id("e");
			self.chart.edges.push(EdgeRecord {
				id,
				source,
				target,
				..edge.clone()
			});
		}
		info!("pasted {} nodes", pasted.len());
		self.clipboard = Some(clip);
		self.selected_edges.clear();
		self.selected_nodes = pasted;
		true
	}

	/// Removes selected nodes with their edges, and selected edges.
	pub fn delete_selection(&mut self) -> bool {
		if self.selected_nodes.is_empty() && self.selected_edges.is_empty() {
			return false;
		}
		self.checkpoint();
		let (nodes, edges) = (&self.selected_nodes, &self.selected_edges);
		self.chart.nodes.retain(|n| !nodes.contains(&n.id));
		self.chart.edges.retain(|e| {
			!edges.contains(&e.id) && !nodes.contains(&e.source) && !nodes.contains(&e.target)
		});
		info!(
			"deleted {} nodes and {} edges",
			self.selected_nodes.len(),
			self.selected_edges.len()
		);
		self.clear_selection();
		self.hover = HoverState::default();
		true
	}

	pub fn undo(&mut self) -> bool {
		let Some(previous) = self.undo.pop() else {
			return false;
		};
		self.redo.push(std::mem::replace(&mut self.chart, previous));
		self.prune_selection();
		info!("undo ({} left)", self.undo.len());
		true
	}

	pub fn redo(&mut self) -> bool {
		let Some(next) = self.redo.pop() else {
			return false;
		};
		self.undo.push(std::mem::replace(&mut self.chart, next));
		self.prune_selection();
		info!("redo ({} left)", self.redo.len());
		true
	}

	/// Zooms keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, k: f64) {
		let new_k = k.clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn zoom_in(&mut self) -> bool {
		if self.transform.k >= 1.5 {
			return false;
		}
		self.zoom_at(self.width / 2.0, self.height / 2.0, self.transform.k + ZOOM_STEP);
		true
	}

	pub fn zoom_out(&mut self) -> bool {
		if self.transform.k <= 0.5 {
			return false;
		}
		self.zoom_at(self.width / 2.0, self.height / 2.0, self.transform.k - ZOOM_STEP);
		true
	}

	pub fn apply(&mut self, command: Command) -> bool {
		debug!("command {command:?}");
		match command {
			Command::Copy => self.copy(),
			Command::Cut => self.cut(),
			Command::Paste => self.paste(),
			Command::Undo => self.undo(),
			Command::Redo => self.redo(),
			Command::SelectAll => {
				self.select_all();
				true
			}
			Command::Delete => self.delete_selection(),
			Command::ZoomIn => self.zoom_in(),
			Command::ZoomOut => self.zoom_out(),
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flowchart::layout::GridOptions;
	use crate::components::flowchart::prepare::prepare;
	use crate::components::flowchart::shape::ShapeKind;
	use crate::components::flowchart::types::{GraphData, GraphLink, GraphNode};

	impl FlowchartState {
		fn can_undo(&self) -> bool {
			!self.undo.is_empty()
		}

		fn can_redo(&self) -> bool {
			!self.redo.is_empty()
		}
	}

	fn state() -> FlowchartState {
		let node = |id: &str| GraphNode {
			id: id.into(),
			label: format!("Step {id}"),
			description: None,
			width: 100.0,
			height: 40.0,
			shape: ShapeKind::Process,
		};
		let link = |s: &str, t: &str, label: &str| GraphLink {
			source: s.into(),
			target: t.into(),
			label: label.into(),
			tools: EdgeTools {
				remove_button: true,
				editor: true,
			},
		};
		let data = GraphData {
			nodes: vec![node("1"), node("2"), node("3")],
			links: vec![link("1", "2", "first hop"), link("2", "3", "second hop")],
		};
		let chart = prepare(
			&data,
			&GridOptions {
				columns: 3,
				width: 900.0,
				height: 300.0,
				..GridOptions::default()
			},
		);
		let mut state = FlowchartState::new(chart, 1000.0, 600.0);
		state.transform = ViewTransform {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		};
		state
	}

	#[test]
	fn set_text_then_get_text_round_trips() {
		let mut s = state();
		let long = "Materials ready, start the photolithography step now";
		let display = s.set_edge_text("e1", long).unwrap();
		assert_eq!(s.edge_text("e1"), Some(long));
		assert_ne!(display, long);
		assert_eq!(s.chart.edge("e1").unwrap().label.display, display);
	}

	#[test]
	fn set_text_refits_from_the_new_text() {
		let mut s = state();
		s.set_edge_text("e1", "a very long replacement label for this hop").unwrap();
		let short = s.set_edge_text("e1", "ok").unwrap();
		assert_eq!(short, "ok");
		assert_eq!(s.edge_text("e1"), Some("ok"));
	}

	#[test]
	fn set_text_measures_the_moved_geometry() {
		let mut s = state();
		let long = "Materials ready, start the photolithography step on the cleaned wafer";
		let before = s.set_edge_text("e1", long).unwrap();

		s.begin_drag("2", 0.0, 0.0);
		s.drag_to(600.0, 0.0);
		s.release_pointer();

		let after = s.set_edge_text("e1", long).unwrap();
		assert!(after.chars().count() > before.chars().count());
		assert_eq!(s.chart.edge("e1").unwrap().label.display, after);
		assert_eq!(s.edge_text("e1"), Some(long));
	}

	#[test]
	fn unchanged_text_leaves_history_alone() {
		let mut s = state();
		s.remove_edge("e2");
		s.undo();
		assert!(s.can_redo());
		let shown = s.chart.edge("e1").unwrap().label.display.clone();
		assert_eq!(s.set_edge_text("e1", "first hop"), Some(shown));
		assert!(s.can_redo());
		assert!(!s.can_undo());
	}

	#[test]
	fn connect_settles_on_ports_the_target_enables() {
		let mut s = state();
		let target = s.chart.node_mut("3").unwrap();
		target.shape = ShapeKind::Decision;
		target.ports = Some(ShapeKind::Decision.template().ports);

		let id = s.connect("1", None, "3").unwrap();
		let edge = s.chart.edge(&id).unwrap();
		assert_eq!(edge.source_port, Some(Port::Right));
		assert_eq!(edge.target_port, Some(Port::Top));
	}

	#[test]
	fn set_text_on_unknown_edge_is_none() {
		let mut s = state();
		assert_eq!(s.set_edge_text("nope", "x"), None);
		assert!(!s.can_undo());
	}

	#[test]
	fn undo_and_redo_edge_removal() {
		let mut s = state();
		assert!(s.remove_edge("e1"));
		assert!(s.chart.edge("e1").is_none());
		assert!(s.undo());
		assert!(s.chart.edge("e1").is_some());
		assert!(s.redo());
		assert!(s.chart.edge("e1").is_none());
		assert!(!s.redo());
	}

	#[test]
	fn new_mutation_clears_redo() {
		let mut s = state();
		s.remove_edge("e1");
		s.undo();
		assert!(s.can_redo());
		s.set_edge_text("e2", "changed");
		assert!(!s.can_redo());
	}

	#[test]
	fn copy_paste_offsets_and_remaps() {
		let mut s = state();
		s.select_node("1", false);
		s.select_node("2", true);
		assert!(s.apply(Command::Copy));
		assert!(s.apply(Command::Paste));

		assert_eq!(s.chart.nodes.len(), 5);
		assert_eq!(s.chart.edges.len(), 3);
		assert_eq!(s.selected_nodes.len(), 2);
		assert!(!s.selected_nodes.contains("1"));

		let original = s.chart.node("1").unwrap().position.unwrap();
		let pasted_edge = s.chart.edges.last().unwrap();
		assert!(s.selected_nodes.contains(&pasted_edge.source));
		assert!(s.selected_nodes.contains(&pasted_edge.target));
		let copy = s.chart.node(&pasted_edge.source).unwrap().position.unwrap();
		assert_eq!(copy.x, original.x + PASTE_OFFSET);
		assert_eq!(copy.y, original.y + PASTE_OFFSET);
		assert_eq!(pasted_edge.label.original, "first hop");
	}

	#[test]
	fn paste_with_empty_clipboard_does_nothing() {
		let mut s = state();
		assert!(!s.paste());
		assert!(!s.can_undo());
	}

	#[test]
	fn cut_removes_nodes_and_attached_edges() {
		let mut s = state();
		s.select_node("2", false);
		assert!(s.apply(Command::Cut));
		assert!(s.chart.node("2").is_none());
		assert!(s.chart.edges.is_empty());
		assert!(s.apply(Command::Paste));
		assert_eq!(s.chart.nodes.len(), 3);
	}

	#[test]
	fn select_all_then_delete() {
		let mut s = state();
		s.apply(Command::SelectAll);
		assert_eq!(s.selected_nodes.len(), 3);
		assert!(s.apply(Command::Delete));
		assert!(s.chart.nodes.is_empty());
		assert!(s.chart.edges.is_empty());
		assert!(s.apply(Command::Undo));
		assert_eq!(s.chart.nodes.len(), 3);
		assert_eq!(s.chart.edges.len(), 2);
	}

	#[test]
	fn connect_rejects_loops_and_unknown_nodes() {
		let mut s = state();
		assert_eq!(s.connect("1", None, "1"), None);
		assert_eq!(s.connect("1", None, "missing"), None);
		let id = s.connect("1", None, "3").unwrap();
		let edge = s.chart.edge(&id).unwrap();
		assert_eq!(edge.source_port, Some(Port::Right));
		assert_eq!(edge.target_port, Some(Port::Left));
		assert!(edge.tools.remove_button && edge.tools.editor);
	}

	#[test]
	fn connect_keeps_the_grabbed_port() {
		let mut s = state();
		let id = s.connect("1", Some(Port::Top), "2").unwrap();
		assert_eq!(s.chart.edge(&id).unwrap().source_port, Some(Port::Top));
	}

	#[test]
	fn zoom_shortcuts_respect_bounds() {
		let mut s = state();
		for _ in 0..20 {
			s.apply(Command::ZoomIn);
		}
		assert!(s.transform.k < 1.6);
		assert!(!s.zoom_in());
		for _ in 0..40 {
			s.apply(Command::ZoomOut);
		}
		assert!(s.transform.k > 0.4);
		assert!(!s.zoom_out());
	}

	#[test]
	fn wheel_zoom_is_clamped() {
		let mut s = state();
		s.zoom_at(10.0, 10.0, 100.0);
		assert_eq!(s.transform.k, MAX_ZOOM);
		s.zoom_at(10.0, 10.0, 0.01);
		assert_eq!(s.transform.k, MIN_ZOOM);
	}

	#[test]
	fn drag_moves_node_as_one_undo_step() {
		let mut s = state();
		let start = s.chart.node("1").unwrap().position.unwrap();
		s.begin_drag("1", 0.0, 0.0);
		s.drag_to(0.0, 0.0);
		assert!(!s.can_undo());
		s.drag_to(10.0, 5.0);
		s.drag_to(20.0, 10.0);
		s.release_pointer();
		let end = s.chart.node("1").unwrap().position.unwrap();
		assert_eq!((end.x, end.y), (start.x + 20.0, start.y + 10.0));
		assert!(s.undo());
		assert_eq!(s.chart.node("1").unwrap().position.unwrap(), start);
		assert!(!s.can_undo());
	}

	#[test]
	fn hit_testing_finds_nodes_edges_and_buttons() {
		let mut s = state();
		let rect = s.chart.node("1").unwrap().rect().unwrap();
		let (cx, cy) = rect.center();
		assert_eq!(s.node_at(cx, cy).as_deref(), Some("1"));

		let edge = s.chart.edge("e1").unwrap().clone();
		let (mx, my) = s.label_point(&edge).unwrap();
		assert_eq!(s.edge_at(mx, my).as_deref(), Some("e1"));

		let (bx, by) = s.remove_button_point(&edge).unwrap();
		assert_eq!(s.remove_button_at(bx, by), None);
		s.set_hover(None, Some("e1".into()));
		assert_eq!(s.remove_button_at(bx, by).as_deref(), Some("e1"));
	}

	#[test]
	fn ports_are_live_only_on_hovered_node() {
		let mut s = state();
		let rect = s.chart.node("2").unwrap().rect().unwrap();
		let (px, py) = port_point(&rect, Some(Port::Top));
		assert_eq!(s.port_at(px, py), None);
		s.set_hover(Some("2".into()), None);
		assert_eq!(s.port_at(px, py), Some(("2".to_string(), Port::Top)));
	}

	#[test]
	fn palette_nodes_get_template_size_and_selection() {
		let mut s = state();
		let id = s.add_node(StencilItem {
			kind: ShapeKind::Connector,
			label: "Connector",
		});
		let node = s.chart.node(&id).unwrap();
		assert_eq!(node.size.width, 45.0);
		assert_eq!(node.label, "Connector");
		assert!(s.selected_nodes.contains(&id));
		assert_eq!(s.selected_nodes.len(), 1);
		assert!(s.undo());
		assert!(s.chart.node(&id).is_none());
		assert!(s.selected_nodes.is_empty());
	}

	#[test]
	fn shift_click_toggles_selection() {
		let mut s = state();
		s.select_node("1", false);
		s.select_node("2", true);
		assert_eq!(s.selected_nodes.len(), 2);
		s.select_node("1", true);
		assert_eq!(s.selected_nodes.len(), 1);
		s.select_node("3", false);
		assert!(s.selected_nodes.contains("3") && s.selected_nodes.len() == 1);
	}
}
