use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::highlight::HighlightTracker;
use super::render;
use super::state::{ForceGraphState, HoverInfo};
use super::tier::TierConfig;
use super::types::GraphData;

/// Zoom applied when a node is clicked.
const FOCUS_ZOOM: f64 = 6.0;

/// Shared handle to the live simulation, used by controls outside the canvas.
#[derive(Clone, Default)]
pub struct GraphHandle(Rc<RefCell<Option<ForceGraphState>>>);

impl GraphHandle {
	pub fn zoom_by(&self, factor: f64) {
		if let Some(s) = self.0.borrow_mut().as_mut() {
			s.zoom_by(factor);
		}
	}

	pub fn fit_view(&self) {
		if let Some(s) = self.0.borrow_mut().as_mut() {
			s.fit_view(80.0);
		}
	}

	/// Centers on node `id`, zooms to `k` and hovers it.
	pub fn focus(&self, id: &str, k: f64) -> Option<HoverInfo> {
		let mut guard = self.0.borrow_mut();
		let s = guard.as_mut()?;
		let idx = s.center_on(id, k)?;
		s.set_hover(Some(idx));
		s.hover_info()
	}
}

fn measure(canvas: &HtmlCanvasElement, fullscreen: bool) -> (f64, f64) {
	if fullscreen {
		if let Some(win) = web_sys::window() {
			let w = win.inner_width().ok().and_then(|v| v.as_f64());
			let h = win.inner_height().ok().and_then(|v| v.as_f64());
			if let (Some(w), Some(h)) = (w, h) {
				return (w, h);
			}
		}
	}
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|(w, h)| *w > 0.0 && *h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn local_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<Arc<GraphData>>,
	#[prop(into)] tier: Signal<TierConfig>,
	highlight: HighlightTracker,
	#[prop(optional)] handle: GraphHandle,
	#[prop(optional)] on_hover: Option<Callback<Option<HoverInfo>>>,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));
	let (handle_init, animate_init, resize_cb_init, alive_init) =
		(handle.clone(), animate.clone(), resize_cb.clone(), alive.clone());

	on_cleanup(move || alive.store(false, Ordering::Relaxed));

	Effect::new(move |_| {
		let graph = data.get();
		let tier = tier.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = measure(&canvas, fullscreen);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let mut state = ForceGraphState::new(&graph, tier, highlight.clone(), w, h);
		if !tier.explosion_enabled {
			state.fit_view(80.0);
		}
		debug!("simulation rebuilt: {} nodes, tier {:?}", state.nodes.len(), tier.tier);
		*handle_init.0.borrow_mut() = Some(state);
		if let Some(cb) = on_hover {
			cb.run(None);
		}

		if animate_init.borrow().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};
		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.map(|c| c.dyn_into::<CanvasRenderingContext2d>())
		{
			Some(Ok(ctx)) => ctx,
			_ => {
				error!("2d canvas context unavailable");
				return;
			}
		};

		let (state_resize, canvas_resize) = (handle_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = measure(&canvas_resize, fullscreen);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(s) = state_resize.0.borrow_mut().as_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(cb) = resize_cb_init.borrow().as_ref() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner, resize_inner, alive_anim) = (
			handle_init.clone(),
			animate_init.clone(),
			resize_cb_init.clone(),
			alive_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			if !alive_anim.load(Ordering::Relaxed) {
				if let Some(cb) = resize_inner.borrow().as_ref() {
					let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				state_anim.0.borrow_mut().take();
				return;
			}
			if let Some(s) = state_anim.0.borrow_mut().as_mut() {
				s.tick(0.016);
				render::render(s, &ctx, js_sys::Date::now());
			}
			if let Some(cb) = animate_inner.borrow().as_ref() {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(cb) = animate_init.borrow().as_ref() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let handle_md = handle.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = handle_md.0.borrow_mut().as_mut() {
			match s.node_at_position(x, y) {
				Some(idx) => s.begin_drag(idx, x, y),
				None => s.begin_pan(x, y),
			}
		}
	};

	let handle_mm = handle.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		let mut changed = None;
		if let Some(s) = handle_mm.0.borrow_mut().as_mut() {
			if !s.drag.active {
				let hovered = s.node_at_position(x, y);
				if s.set_hover(hovered) {
					changed = Some(s.hover_info());
				}
			}
			if s.drag.active {
				s.drag_to(x, y);
			} else if s.pan.active {
				s.pan_to(x, y);
			}
		}
		if let (Some(info), Some(cb)) = (changed, on_hover) {
			cb.run(info);
		}
	};

	let handle_mu = handle.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(s) = handle_mu.0.borrow_mut().as_mut() {
			if let Some(idx) = s.end_interaction() {
				let (x, y) = (s.nodes[idx].x, s.nodes[idx].y);
				s.center_at(x, y, FOCUS_ZOOM);
			}
		}
	};

	let handle_ml = handle.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let mut cleared = false;
		if let Some(s) = handle_ml.0.borrow_mut().as_mut() {
			s.end_interaction();
			cleared = s.set_hover(None);
		}
		if let (true, Some(cb)) = (cleared, on_hover) {
			cb.run(None);
		}
	};

	let handle_wh = handle.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = handle_wh.0.borrow_mut().as_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
