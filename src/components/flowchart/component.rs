use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use super::keymap::command_for;
use super::layout::GridOptions;
use super::prepare::prepare;
use super::render;
use super::shape::{STENCIL, ShapeKind};
use super::state::FlowchartState;
use super::types::GraphData;

type SharedState = Rc<RefCell<Option<FlowchartState>>>;

/// An open inline label editor, positioned in canvas pixels.
#[derive(Clone, Debug, PartialEq)]
struct EditSession {
	edge: String,
	x: f64,
	y: f64,
	text: String,
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn host_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

fn window_size(window: &web_sys::Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Window size in fullscreen mode when the window reports one, else the host size.
fn resolve_size(fullscreen: bool, window: Option<(f64, f64)>, host: (f64, f64)) -> (f64, f64) {
	match window {
		Some(size) if fullscreen => size,
		_ => host,
	}
}

fn canvas_size(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	let window = if fullscreen {
		web_sys::window().as_ref().and_then(window_size)
	} else {
		None
	};
	resolve_size(fullscreen, window, host_size(canvas, width, height))
}

fn commit_edit(state: &SharedState, editing: RwSignal<Option<EditSession>>, text: &str) {
	let Some(session) = editing.get_untracked() else {
		return;
	};
	editing.set(None);
	if let Some(ref mut s) = *state.borrow_mut() {
		if let Some(display) = s.set_edge_text(&session.edge, text) {
			debug!("edge {} shows {:?}", session.edge, display);
		}
	}
}

#[component]
pub fn FlowchartCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] grid: GridOptions,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let input_ref = NodeRef::<leptos::html::Input>::new();
	let editing = RwSignal::new(None::<EditSession>);

	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let keydown_cb: Rc<RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>> =
		Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));
	let (state_init, animate_init, resize_cb_init, keydown_init, alive_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		keydown_cb.clone(),
		alive.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = canvas_size(&canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("canvas has no 2d context");
				return;
			}
		};

		let chart = prepare(&data.get_untracked(), &grid);
		info!(
			"flowchart mounted with {} nodes and {} edges",
			chart.nodes.len(),
			chart.edges.len()
		);
		*state_init.borrow_mut() = Some(FlowchartState::new(chart, w, h));

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = canvas_size(&canvas_resize, fullscreen, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let state_key = state_init.clone();
		*keydown_init.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
			// the inline editor owns the keyboard while open
			if editing.try_get_untracked().flatten().is_some() {
				return;
			}
			let modifier = ev.ctrl_key() || ev.meta_key();
			let Some(command) = command_for(&ev.key(), modifier, ev.shift_key()) else {
				return;
			};
			if let Some(ref mut s) = *state_key.borrow_mut() {
				ev.prevent_default();
				s.apply(command);
			}
		}));
		if let Some(ref cb) = *keydown_init.borrow() {
			let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner, resize_anim, keydown_anim, alive_anim) = (
			state_init.clone(),
			animate_init.clone(),
			resize_cb_init.clone(),
			keydown_init.clone(),
			alive_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			if !alive_anim.load(Ordering::Relaxed) {
				if let Some(cb) = resize_anim.borrow_mut().take() {
					let _ =
						win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				if let Some(cb) = keydown_anim.borrow_mut().take() {
					let _ =
						win.remove_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
				}
				state_anim.borrow_mut().take();
				info!("flowchart released");
				return;
			}
			if let Some(ref s) = *state_anim.borrow() {
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let alive_cleanup = alive.clone();
	on_cleanup(move || alive_cleanup.store(false, Ordering::Relaxed));

	Effect::new(move |_| {
		if editing.with(Option::is_some) {
			if let Some(input) = input_ref.get() {
				let _ = input.focus();
				input.select();
			}
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(edge) = s.remove_button_at(x, y) {
				s.remove_edge(&edge);
			} else if let Some((node, port)) = s.port_at(x, y) {
				s.begin_connect(&node, port, x, y);
			} else if let Some(node) = s.node_at(x, y) {
				s.select_node(&node, ev.shift_key());
				s.begin_drag(&node, x, y);
			} else if let Some(edge) = s.edge_at(x, y) {
				s.select_edge(&edge, ev.shift_key());
			} else {
				if !ev.shift_key() {
					s.clear_selection();
				}
				s.begin_pan(x, y);
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.linking.is_some() {
				s.connect_to(x, y);
				let target = s.node_at(x, y);
				s.set_hover(target, None);
			} else if s.drag.node.is_some() {
				s.drag_to(x, y);
			} else if s.pan.active {
				s.pan_to(x, y);
			} else {
				// ports and the remove button overhang their owners
				let node = s.port_at(x, y).map(|(id, _)| id).or_else(|| s.node_at(x, y));
				let edge = match node {
					Some(_) => None,
					None => s.remove_button_at(x, y).or_else(|| s.edge_at(x, y)),
				};
				s.set_hover(node, edge);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.linking.is_some() {
				s.finish_connect(x, y);
			}
			s.release_pointer();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.release_pointer();
			s.set_hover(None, None);
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let session = state_dc.borrow().as_ref().and_then(|s| {
			let id = s.edge_at(x, y)?;
			let edge = s.chart.edge(&id)?;
			if !edge.tools.editor {
				return None;
			}
			let (gx, gy) = s.label_point(edge)?;
			let (sx, sy) = s.graph_to_screen(gx, gy);
			Some(EditSession {
				text: s.edge_text(&id)?.to_string(),
				edge: id,
				x: sx,
				y: sy,
			})
		});
		if session.is_some() {
			editing.set(session);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			if ev.ctrl_key() || ev.meta_key() {
				let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
				let k = s.transform.k * factor;
				s.zoom_at(x, y, k);
			} else {
				s.transform.x -= ev.delta_x();
				s.transform.y -= ev.delta_y();
			}
		}
	};

	let palette = STENCIL
		.iter()
		.map(|group| {
			let items = group
				.items
				.iter()
				.map(|&item| {
					let state_pl = state.clone();
					let class = if item.kind == ShapeKind::Service {
						"service"
					} else {
						""
					};
					view! {
						<button
							class=class
							title=item.label
							on:click=move |_| {
								if let Some(ref mut s) = *state_pl.borrow_mut() {
									s.add_node(item);
								}
							}
						>
							{item.label}
						</button>
					}
				})
				.collect_view();
			view! {
				<h3>{group.title}</h3>
				<div class="stencil-group">{items}</div>
			}
		})
		.collect_view();

	let (state_enter, state_blur) = (state.clone(), state.clone());
	view! {
		<div class="flowchart-editor" class:fullscreen=fullscreen>
			<aside class="stencil">
				<h2>"Flowchart"</h2>
				{palette}
			</aside>
			<div class="canvas-host">
				<canvas
					node_ref=canvas_ref
					class="flowchart-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:dblclick=on_dblclick
					on:wheel=on_wheel
					style="display: block;"
				/>
				<input
					node_ref=input_ref
					class="edge-editor"
					style:display=move || {
						if editing.with(Option::is_some) { "block" } else { "none" }
					}
					style:left=move || {
						editing.with(|s| s.as_ref().map(|s| format!("{}px", s.x)).unwrap_or_default())
					}
					style:top=move || {
						editing.with(|s| s.as_ref().map(|s| format!("{}px", s.y)).unwrap_or_default())
					}
					prop:value=move || {
						editing.with(|s| s.as_ref().map(|s| s.text.clone()).unwrap_or_default())
					}
					on:keydown=move |ev: KeyboardEvent| {
						match ev.key().as_str() {
							"Enter" => commit_edit(&state_enter, editing, &event_target_value(&ev)),
							"Escape" => editing.set(None),
							_ => {}
						}
					}
					on:blur=move |ev| commit_edit(&state_blur, editing, &event_target_value(&ev))
				/>
			</div>
		</div>
	}
}
