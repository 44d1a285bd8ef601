use super::shape::ShapeKind;

/// One of the four compass connection points of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Port {
	Top,
	Right,
	Bottom,
	Left,
}

impl Port {
	pub const ALL: [Port; 4] = [Port::Top, Port::Right, Port::Bottom, Port::Left];

	pub fn as_str(self) -> &'static str {
		match self {
			Port::Top => "top",
			Port::Right => "right",
			Port::Bottom => "bottom",
			Port::Left => "left",
		}
	}

	pub fn opposite(self) -> Port {
		match self {
			Port::Top => Port::Bottom,
			Port::Right => Port::Left,
			Port::Bottom => Port::Top,
			Port::Left => Port::Right,
		}
	}
}

/// Which compass slots of a node accept connections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ports {
	pub top: bool,
	pub right: bool,
	pub bottom: bool,
	pub left: bool,
}

impl Ports {
	pub const ALL: Ports = Ports {
		top: true,
		right: true,
		bottom: true,
		left: true,
	};

	pub const VERTICAL: Ports = Ports {
		top: true,
		right: false,
		bottom: true,
		left: false,
	};

	pub fn enabled(self, port: Port) -> bool {
		match port {
			Port::Top => self.top,
			Port::Right => self.right,
			Port::Bottom => self.bottom,
			Port::Left => self.left,
		}
	}

	pub fn iter(self) -> impl Iterator<Item = Port> {
		Port::ALL.into_iter().filter(move |&p| self.enabled(p))
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

/// Axis-aligned box of a positioned node, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn center(&self) -> (f64, f64) {
		(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	pub fn contains(&self, px: f64, py: f64) -> bool {
		px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
	pub id: String,
	pub label: String,
	pub description: Option<String>,
	pub size: Size,
	pub shape: ShapeKind,
	pub ports: Option<Ports>,
	pub position: Option<Position>,
}

impl NodeRecord {
	/// The node's box, or `None` until it has been positioned.
	pub fn rect(&self) -> Option<Rect> {
		self.position.map(|p| Rect {
			x: p.x,
			y: p.y,
			width: self.size.width,
			height: self.size.height,
		})
	}

	pub fn accepts(&self, port: Port) -> bool {
		self.ports.is_some_and(|p| p.enabled(port))
	}

	/// `preferred` when this node takes it, else `fallback`, else the first
	/// port it enables. Nodes without port slots take anything.
	pub fn settle_port(&self, preferred: Port, fallback: Port) -> Port {
		let Some(ports) = self.ports else {
			return preferred;
		};
		if self.accepts(preferred) {
			preferred
		} else if self.accepts(fallback) {
			fallback
		} else {
			ports.iter().next().unwrap_or(preferred)
		}
	}
}

/// Label text of an edge: the full text kept for editing, and the text that
/// fits along the edge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeLabel {
	pub original: String,
	pub display: String,
}

impl EdgeLabel {
	pub fn new(text: impl Into<String>) -> Self {
		let text = text.into();
		Self {
			display: text.clone(),
			original: text,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub stroke: String,
	pub stroke_width: f64,
	pub target_marker: bool,
}

impl Default for EdgeStyle {
	fn default() -> Self {
		Self {
			stroke: "#8f8f8f".into(),
			stroke_width: 1.0,
			target_marker: false,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeTools {
	pub remove_button: bool,
	pub editor: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRecord {
	pub id: String,
	pub source: String,
	pub target: String,
	pub source_port: Option<Port>,
	pub target_port: Option<Port>,
	pub label: EdgeLabel,
	pub style: EdgeStyle,
	pub tools: EdgeTools,
}

/// A complete document: what gets laid out, snapshotted and copied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Flowchart {
	pub nodes: Vec<NodeRecord>,
	pub edges: Vec<EdgeRecord>,
}

impl Flowchart {
	pub fn node(&self, id: &str) -> Option<&NodeRecord> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn node_mut(&mut self, id: &str) -> Option<&mut NodeRecord> {
		self.nodes.iter_mut().find(|n| n.id == id)
	}

	pub fn edge(&self, id: &str) -> Option<&EdgeRecord> {
		self.edges.iter().find(|e| e.id == id)
	}

	pub fn edge_mut(&mut self, id: &str) -> Option<&mut EdgeRecord> {
		self.edges.iter_mut().find(|e| e.id == id)
	}

	/// Source and target boxes of an edge, when both endpoints are positioned.
	pub fn endpoints(&self, edge: &EdgeRecord) -> Option<(Rect, Rect)> {
		let source = self.node(&edge.source)?.rect()?;
		let target = self.node(&edge.target)?.rect()?;
		Some((source, target))
	}
}

/// Static node literal, before layout.
#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	pub description: Option<String>,
	pub width: f64,
	pub height: f64,
	pub shape: ShapeKind,
}

/// Static edge literal.
#[derive(Clone, Debug)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	pub label: String,
	pub tools: EdgeTools,
}

#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}
