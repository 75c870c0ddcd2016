use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::SkillGraphState;
use super::types::{GraphData, NodeKind};

type SharedState = Rc<RefCell<Option<SkillGraphState>>>;

/// Owns the animation-frame loop and window listeners of one open view.
/// Dropping it stops the loop and ends any gesture in flight.
struct FrameLoop {
	window: Window,
	state: SharedState,
	frame: Rc<Cell<Option<i32>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	resize: Option<Closure<dyn FnMut()>>,
	release: Closure<dyn FnMut(MouseEvent)>,
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		if let Some(id) = self.frame.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		// The frame closure holds a handle to its own slot.
		self.animate.borrow_mut().take();
		if let Some(cb) = self.resize.take() {
			let _ = self
				.window
				.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		let _ = self
			.window
			.remove_event_listener_with_callback("mouseup", self.release.as_ref().unchecked_ref());
		if let Ok(mut slot) = self.state.try_borrow_mut() {
			if let Some(s) = slot.as_mut() {
				s.close();
			}
			slot.take();
		}
		debug!("skill graph frame loop released");
	}
}

fn container_size(window: &Window, canvas: &HtmlCanvasElement, fullscreen: bool) -> (f64, f64) {
	if fullscreen {
		let dim = |v: Result<JsValue, JsValue>, fallback| v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback);
		return (dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0));
	}
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn set_cursor(canvas_ref: NodeRef<leptos::html::Canvas>, state: &SkillGraphState) {
	let Some(canvas) = canvas_ref.get() else {
		return;
	};
	let canvas: HtmlCanvasElement = canvas.into();
	let cursor = if state.is_dragging() {
		"grabbing"
	} else {
		match state.controller.hovered().and_then(|i| state.data.node(i)) {
			Some(node) if node.kind == NodeKind::Project => "pointer",
			_ => "grab",
		}
	};
	let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
}

/// Skills × projects network drawn on a canvas.
///
/// Hovering lights a node's links, dragging pulls its neighbourhood along, and
/// clicking a project calls `on_navigate` with the project key.
#[component]
pub fn SkillGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] on_navigate: Callback<String>,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let frame_loop = StoredValue::new_local(None::<FrameLoop>);
	on_cleanup(move || {
		let _ = frame_loop.try_update_value(|slot| slot.take());
	});

	let state_init = state.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window available for the skill graph");
			return;
		};

		// A previous loop would clear the state installed below when dropped.
		frame_loop.update_value(|slot| {
			slot.take();
		});

		let (w, h) = container_size(&window, &canvas, fullscreen);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>().ok(),
			_ => None,
		};
		let Some(ctx) = ctx else {
			warn!("canvas 2d context unavailable, skill graph disabled");
			return;
		};
		*state_init.borrow_mut() = Some(SkillGraphState::new(data.get(), w, h));

		let resize = fullscreen.then(|| {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			let cb = Closure::<dyn FnMut()>::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = container_size(&win, &canvas_resize, true);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			});
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			cb
		});

		let frame = Rc::new(Cell::new(None));
		let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
		let (state_anim, animate_inner, frame_inner) =
			(state_init.clone(), animate.clone(), frame.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			let next = match (web_sys::window(), animate_inner.borrow().as_ref()) {
				(Some(win), Some(cb)) => win.request_animation_frame(cb.as_ref().unchecked_ref()).ok(),
				_ => None,
			};
			frame_inner.set(next);
		}));
		if let Some(ref cb) = *animate.borrow() {
			frame.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}

		// Releases land on the window so a drag ends even off the canvas.
		let state_up = state_init.clone();
		let release = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
			let Some((x, y)) = local_point(canvas_ref, &ev) else {
				return;
			};
			let intent = match state_up.try_borrow_mut() {
				Ok(mut slot) => slot.as_mut().and_then(|s| {
					let intent = s.pointer_up(x, y);
					set_cursor(canvas_ref, s);
					intent
				}),
				Err(_) => None,
			};
			if let Some(intent) = intent {
				info!("navigating to project `{}`", intent.project);
				on_navigate.run(intent.project);
			}
		});
		let _ = window.add_event_listener_with_callback("mouseup", release.as_ref().unchecked_ref());

		frame_loop.set_value(Some(FrameLoop {
			window,
			state: state_init.clone(),
			frame,
			animate,
			resize,
			release,
		}));
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
			set_cursor(canvas_ref, s);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
			set_cursor(canvas_ref, s);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="skill-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
