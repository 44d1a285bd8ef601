//! Port selection and edge label fitting.

use super::types::{Port, Rect};

/// Font size edge labels are measured with.
pub const LABEL_FONT_SIZE: f64 = 14.0;
/// Length along an edge reserved for the endpoints before labels get room.
pub const LABEL_MARGIN: f64 = 20.0;
pub const ELLIPSIS: char = '…';

/// Rounds halves toward positive infinity, so `-0.5` becomes `0`.
fn round_half_up(v: f64) -> f64 {
	(v + 0.5).floor()
}

/// Picks `(source_port, target_port)` from the relative position of two boxes.
///
/// Coordinates are rounded before comparing. Aligned boxes always get an
/// opposite pair. In the diagonal case where the vertical distance dominates,
/// the source port compares the target's y against the target's x; that rule
/// is kept as-is and is not a nearest-port search.
pub fn select_ports(source: &Rect, target: &Rect) -> (Port, Port) {
	let (sx, sy) = (round_half_up(source.x), round_half_up(source.y));
	let (tx, ty) = (round_half_up(target.x), round_half_up(target.y));

	if tx == sx {
		if ty > sy {
			(Port::Bottom, Port::Top)
		} else {
			(Port::Top, Port::Bottom)
		}
	} else if ty == sy {
		if tx > sx {
			(Port::Right, Port::Left)
		} else {
			(Port::Left, Port::Right)
		}
	} else if (ty - sy).abs() >= (tx - sx).abs() {
		let target_port = if ty > sy { Port::Top } else { Port::Bottom };
		// FIXME: compares two different axes; kept until a real router replaces it.
		let source_port = if ty > tx { Port::Right } else { Port::Left };
		(source_port, target_port)
	} else {
		let source_port = if ty > sy { Port::Left } else { Port::Right };
		let target_port = if tx > sx { Port::Bottom } else { Port::Top };
		(source_port, target_port)
	}
}

/// Point an edge is measured from: the top-left corner, shifted by the
/// width for a right port and by the height for a bottom port.
pub fn label_anchor(rect: &Rect, port: Option<Port>) -> (f64, f64) {
	let x = match port {
		Some(Port::Right) => rect.x + rect.width,
		_ => rect.x,
	};
	let y = match port {
		Some(Port::Bottom) => rect.y + rect.height,
		_ => rect.y,
	};
	(x, y)
}

/// Midpoint of the side a port sits on, or the centre without a port.
pub fn port_point(rect: &Rect, port: Option<Port>) -> (f64, f64) {
	let (cx, cy) = rect.center();
	match port {
		Some(Port::Top) => (cx, rect.y),
		Some(Port::Right) => (rect.x + rect.width, cy),
		Some(Port::Bottom) => (cx, rect.y + rect.height),
		Some(Port::Left) => (rect.x, cy),
		None => (cx, cy),
	}
}

/// Number of label characters that fit along an edge of `length` pixels.
pub fn label_capacity(length: f64, font_size: f64) -> usize {
	let length = length.floor();
	let capacity = ((length - LABEL_MARGIN) / font_size).floor() - 1.0;
	if capacity > 0.0 { capacity as usize } else { 0 }
}

/// Cuts `text` to `capacity` characters, appending an ellipsis when
/// anything was cut.
pub fn truncate_label(text: &str, capacity: usize) -> String {
	match text.char_indices().nth(capacity) {
		Some((cut, _)) => {
			let mut out = String::with_capacity(cut + ELLIPSIS.len_utf8());
			out.push_str(&text[..cut]);
			out.push(ELLIPSIS);
			out
		}
		None => text.to_string(),
	}
}

/// Display text for an edge label given the edge's endpoints and ports.
pub fn fit_label(
	source: &Rect,
	target: &Rect,
	source_port: Option<Port>,
	target_port: Option<Port>,
	text: &str,
) -> String {
	let (sx, sy) = label_anchor(source, source_port);
	let (tx, ty) = label_anchor(target, target_port);
	let length = (tx - sx).hypot(ty - sy);
	truncate_label(text, label_capacity(length, LABEL_FONT_SIZE))
}

/// Distance from `(px, py)` to the segment `a`-`b`.
pub fn distance_to_segment(px: f64, py: f64, a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len_sq = dx * dx + dy * dy;
	if len_sq < f64::EPSILON {
		return (px - a.0).hypot(py - a.1);
	}
	let t = (((px - a.0) * dx + (py - a.1) * dy) / len_sq).clamp(0.0, 1.0);
	(px - (a.0 + t * dx)).hypot(py - (a.1 + t * dy))
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn rect(x: f64, y: f64) -> Rect {
		Rect {
			x,
			y,
			width: 100.0,
			height: 40.0,
		}
	}

	fn is_opposite_pair(pair: (Port, Port)) -> bool {
		pair.0.opposite() == pair.1
	}

	#[test]
	fn vertically_aligned_nodes_use_bottom_and_top() {
		assert_eq!(
			select_ports(&rect(0.0, 0.0), &rect(0.0, 200.0)),
			(Port::Bottom, Port::Top)
		);
		assert_eq!(
			select_ports(&rect(0.0, 200.0), &rect(0.0, 0.0)),
			(Port::Top, Port::Bottom)
		);
	}

	#[test]
	fn horizontally_aligned_nodes_use_right_and_left() {
		assert_eq!(
			select_ports(&rect(0.0, 0.0), &rect(250.0, 0.0)),
			(Port::Right, Port::Left)
		);
		assert_eq!(
			select_ports(&rect(250.0, 0.0), &rect(0.0, 0.0)),
			(Port::Left, Port::Right)
		);
	}

	#[test]
	fn rounding_decides_alignment() {
		assert_eq!(
			select_ports(&rect(10.2, 0.0), &rect(9.8, 120.0)),
			(Port::Bottom, Port::Top)
		);
	}

	#[test]
	fn negative_halves_round_up() {
		// -0.5 and 0.4 both round to 0
		assert_eq!(
			select_ports(&rect(-0.5, 0.0), &rect(0.4, 200.0)),
			(Port::Bottom, Port::Top)
		);
		assert_eq!(
			select_ports(&rect(0.0, -120.5), &rect(300.0, -120.0)),
			(Port::Right, Port::Left)
		);
		assert_eq!(round_half_up(-1.5), -1.0);
		assert_eq!(round_half_up(2.5), 3.0);
	}

	#[rstest]
	#[case(0.0, 0.0, 0.0, 200.0)]
	#[case(0.0, 200.0, 0.0, 0.0)]
	#[case(0.0, 0.0, 300.0, 0.0)]
	#[case(300.0, 50.0, -20.0, 50.0)]
	#[case(17.4, 3.0, 17.0, -90.0)]
	fn aligned_pairs_are_opposite(#[case] sx: f64, #[case] sy: f64, #[case] tx: f64, #[case] ty: f64) {
		assert!(is_opposite_pair(select_ports(&rect(sx, sy), &rect(tx, ty))));
	}

	#[test]
	fn diagonal_vertical_dominant_compares_target_y_to_x() {
		// target below: top; target y 300 > target x 100: right
		assert_eq!(
			select_ports(&rect(0.0, 0.0), &rect(100.0, 300.0)),
			(Port::Right, Port::Top)
		);
		// target above; target y -300 < target x 100: left
		assert_eq!(
			select_ports(&rect(0.0, 0.0), &rect(100.0, -300.0)),
			(Port::Left, Port::Bottom)
		);
	}

	#[test]
	fn diagonal_horizontal_dominant() {
		assert_eq!(
			select_ports(&rect(750.0, 0.0), &rect(0.0, 333.0)),
			(Port::Left, Port::Top)
		);
		assert_eq!(
			select_ports(&rect(0.0, 333.0), &rect(750.0, 0.0)),
			(Port::Right, Port::Bottom)
		);
	}

	#[test]
	fn anchors_shift_for_right_and_bottom_ports() {
		let r = rect(10.0, 20.0);
		assert_eq!(label_anchor(&r, None), (10.0, 20.0));
		assert_eq!(label_anchor(&r, Some(Port::Top)), (10.0, 20.0));
		assert_eq!(label_anchor(&r, Some(Port::Left)), (10.0, 20.0));
		assert_eq!(label_anchor(&r, Some(Port::Right)), (110.0, 20.0));
		assert_eq!(label_anchor(&r, Some(Port::Bottom)), (10.0, 60.0));
	}

	#[test]
	fn capacity_for_three_hundred_pixels() {
		// (300 - 20) / 14 is exactly 20
		assert_eq!(label_capacity(300.0, 14.0), 19);
		assert_eq!(label_capacity(299.0, 14.0), 18);
	}

	#[rstest]
	#[case(0.0)]
	#[case(20.0)]
	#[case(33.9)]
	fn short_edges_have_no_room(#[case] length: f64) {
		assert_eq!(label_capacity(length, LABEL_FONT_SIZE), 0);
	}

	#[test]
	fn long_label_is_cut_with_ellipsis() {
		let text = "abcdefghijklmnopqrstuvwxy";
		assert_eq!(text.chars().count(), 25);
		let fitted = truncate_label(text, 18);
		assert_eq!(fitted, "abcdefghijklmnopqr…");
		assert_eq!(fitted.chars().count(), 19);
	}

	#[test]
	fn label_that_fits_is_untouched() {
		assert_eq!(truncate_label("short", 18), "short");
		assert_eq!(truncate_label("exactly", 7), "exactly");
	}

	#[test]
	fn truncation_counts_characters_not_bytes() {
		assert_eq!(truncate_label("光刻完成进行蚀刻", 3), "光刻完…");
	}

	#[test]
	fn display_never_exceeds_capacity_plus_one() {
		let text = "Materials ready, start photolithography on the wafer";
		for length in (0..1200).step_by(7) {
			let capacity = label_capacity(length as f64, LABEL_FONT_SIZE);
			let fitted = truncate_label(text, capacity);
			assert!(fitted.chars().count() <= capacity + 1, "length {length}");
		}
	}

	#[test]
	fn fitting_from_the_original_is_idempotent() {
		let (a, b) = (rect(0.0, 0.0), rect(0.0, 200.0));
		let text = "Etching done, begin doping the exposed regions";
		let once = fit_label(&a, &b, Some(Port::Bottom), Some(Port::Top), text);
		let twice = fit_label(&a, &b, Some(Port::Bottom), Some(Port::Top), text);
		assert_eq!(once, twice);
		assert_eq!(once, "Etching d…");
		assert_eq!(fit_label(&a, &b, Some(Port::Bottom), Some(Port::Top), &once), once);
	}

	#[test]
	fn fit_label_measures_between_anchors() {
		// bottom of A at y=40, top of B at y=339: 299px apart
		let (a, b) = (rect(0.0, 0.0), rect(0.0, 339.0));
		let text = "abcdefghijklmnopqrstuvwxy";
		assert_eq!(
			fit_label(&a, &b, Some(Port::Bottom), Some(Port::Top), text),
			"abcdefghijklmnopqr…"
		);
	}

	#[test]
	fn segment_distance() {
		assert_eq!(distance_to_segment(5.0, 3.0, (0.0, 0.0), (10.0, 0.0)), 3.0);
		assert_eq!(distance_to_segment(-3.0, 4.0, (0.0, 0.0), (10.0, 0.0)), 5.0);
		assert!((distance_to_segment(1.0, 1.0, (0.0, 0.0), (0.0, 0.0)) - 2f64.sqrt()).abs() < 1e-12);
	}
}
