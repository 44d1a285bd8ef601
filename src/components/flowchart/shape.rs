//! Node shape templates.
//!
//! Every [`ShapeKind`] is a base outline plus a style record; kinds only
//! override the fields that differ from [`ShapeStyle::default`].

use super::types::{Ports, Size};

/// Outline drawn for a node. Polygon points are normalised to the node box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BaseShape {
	Rect { corner_radius: f64 },
	Ellipse,
	Polygon(&'static [(f64, f64)]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelAnchor {
	Center,
	TopLeft,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeStyle {
	pub fill: &'static str,
	pub stroke: &'static str,
	pub stroke_width: f64,
	pub text_color: &'static str,
	pub font_size: f64,
	pub label_anchor: LabelAnchor,
}

impl Default for ShapeStyle {
	fn default() -> Self {
		Self {
			fill: "#EFF4FF",
			stroke: "#5F95FF",
			stroke_width: 1.0,
			text_color: "#262626",
			font_size: 12.0,
			label_anchor: LabelAnchor::Center,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeTemplate {
	pub base: BaseShape,
	pub style: ShapeStyle,
	pub size: Size,
	pub ports: Ports,
}

const DIAMOND: &[(f64, f64)] = &[(0.0, 0.5), (0.5, 0.0), (1.0, 0.5), (0.5, 1.0)];
const PARALLELOGRAM: &[(f64, f64)] = &[(0.25, 0.0), (1.0, 0.0), (0.75, 1.0), (0.0, 1.0)];

const FLOW_SIZE: Size = Size {
	width: 66.0,
	height: 36.0,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
	Start,
	Process,
	OptionalProcess,
	Decision,
	Data,
	Connector,
	Service,
}

impl ShapeKind {
	pub fn template(self) -> ShapeTemplate {
		let base = ShapeTemplate {
			base: BaseShape::Rect { corner_radius: 0.0 },
			style: ShapeStyle::default(),
			size: FLOW_SIZE,
			ports: Ports::ALL,
		};
		match self {
			ShapeKind::Process => base,
			ShapeKind::Start => ShapeTemplate {
				base: BaseShape::Rect {
					corner_radius: 20.0,
				},
				..base
			},
			ShapeKind::OptionalProcess => ShapeTemplate {
				base: BaseShape::Rect { corner_radius: 6.0 },
				..base
			},
			ShapeKind::Decision => ShapeTemplate {
				base: BaseShape::Polygon(DIAMOND),
				ports: Ports::VERTICAL,
				..base
			},
			ShapeKind::Data => ShapeTemplate {
				base: BaseShape::Polygon(PARALLELOGRAM),
				ports: Ports::VERTICAL,
				..base
			},
			ShapeKind::Connector => ShapeTemplate {
				base: BaseShape::Ellipse,
				size: Size {
					width: 45.0,
					height: 45.0,
				},
				..base
			},
			ShapeKind::Service => ShapeTemplate {
				style: ShapeStyle {
					fill: "#5F95FF",
					text_color: "#fff",
					label_anchor: LabelAnchor::TopLeft,
					..base.style
				},
				size: Size {
					width: 52.0,
					height: 52.0,
				},
				..base
			},
		}
	}
}

/// A palette entry: the shape to insert and the label it starts with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StencilItem {
	pub kind: ShapeKind,
	pub label: &'static str,
}

pub struct StencilGroup {
	pub title: &'static str,
	pub items: &'static [StencilItem],
}

const fn item(kind: ShapeKind, label: &'static str) -> StencilItem {
	StencilItem { kind, label }
}

pub const STENCIL: &[StencilGroup] = &[
	StencilGroup {
		title: "Basic flowchart",
		items: &[
			item(ShapeKind::Start, "Start"),
			item(ShapeKind::Process, "Process"),
			item(ShapeKind::OptionalProcess, "Optional process"),
			item(ShapeKind::Decision, "Decision"),
			item(ShapeKind::Data, "Data"),
			item(ShapeKind::Connector, "Connector"),
		],
	},
	StencilGroup {
		title: "System design",
		items: &[
			item(ShapeKind::Service, "Client"),
			item(ShapeKind::Service, "Http"),
			item(ShapeKind::Service, "Api"),
			item(ShapeKind::Service, "Sql"),
			item(ShapeKind::Service, "Cloud"),
			item(ShapeKind::Service, "Mq"),
		],
	},
];

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flowchart::types::Port;

	#[test]
	fn overrides_keep_base_style() {
		let decision = ShapeKind::Decision.template();
		assert_eq!(decision.style, ShapeStyle::default());
		assert_eq!(decision.size, FLOW_SIZE);
		assert!(!decision.ports.enabled(Port::Left));
		assert!(decision.ports.enabled(Port::Bottom));
	}

	#[test]
	fn service_overrides_fill_and_text() {
		let service = ShapeKind::Service.template();
		assert_eq!(service.style.fill, "#5F95FF");
		assert_eq!(service.style.text_color, "#fff");
		assert_eq!(service.style.stroke, ShapeStyle::default().stroke);
		assert_eq!(service.style.label_anchor, LabelAnchor::TopLeft);
	}

	#[test]
	fn stencil_has_two_groups_of_six() {
		assert_eq!(STENCIL.len(), 2);
		assert!(STENCIL.iter().all(|g| g.items.len() == 6));
	}
}
