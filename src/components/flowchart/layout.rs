//! Deterministic grid placement.

use std::cmp::Ordering;

use super::types::{NodeRecord, Position};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
	/// Natural order of node ids: numeric ids compare as numbers.
	#[default]
	Id,
	Label,
	/// Keep the order nodes were declared in.
	Insertion,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridOptions {
	pub columns: usize,
	pub width: f64,
	pub height: f64,
	/// Fixed row height; when unset the height is split evenly across rows.
	pub row_height: Option<f64>,
	pub sort_by: SortKey,
}

impl Default for GridOptions {
	fn default() -> Self {
		Self {
			columns: 4,
			width: 1000.0,
			height: 1000.0,
			row_height: None,
			sort_by: SortKey::Id,
		}
	}
}

impl SortKey {
	/// Parses the `sort` query value: `id`, `label` or `insertion`.
	pub fn parse(name: &str) -> Option<SortKey> {
		match name.trim().to_ascii_lowercase().as_str() {
			"id" => Some(SortKey::Id),
			"label" => Some(SortKey::Label),
			"insertion" => Some(SortKey::Insertion),
			_ => None,
		}
	}
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
	match (a.parse::<u64>(), b.parse::<u64>()) {
		(Ok(x), Ok(y)) => x.cmp(&y),
		_ => a.cmp(b),
	}
}

/// Places every node in a cell of a `columns`-wide grid, centred in its cell.
pub fn grid_layout(nodes: &mut [NodeRecord], options: &GridOptions) {
	if nodes.is_empty() {
		return;
	}
	let columns = options.columns.max(1);
	let rows = nodes.len().div_ceil(columns);
	let cell_w = options.width / columns as f64;
	let cell_h = options
		.row_height
		.unwrap_or(options.height / rows as f64);

	let mut order: Vec<usize> = (0..nodes.len()).collect();
	match options.sort_by {
		SortKey::Id => order.sort_by(|&a, &b| natural_cmp(&nodes[a].id, &nodes[b].id)),
		SortKey::Label => order.sort_by(|&a, &b| nodes[a].label.cmp(&nodes[b].label)),
		SortKey::Insertion => {}
	}

	for (slot, idx) in order.into_iter().enumerate() {
		let (col, row) = ((slot % columns) as f64, (slot / columns) as f64);
		let node = &mut nodes[idx];
		node.position = Some(Position {
			x: col * cell_w + (cell_w - node.size.width) / 2.0,
			y: row * cell_h + (cell_h - node.size.height) / 2.0,
		});
	}
}
