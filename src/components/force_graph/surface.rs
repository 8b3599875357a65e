//! Drawing surface the painters target.
//!
//! Painters only see this trait; the browser canvas context implements it and
//! tests substitute a recorder.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

/// The subset of the 2D canvas API used by the graph renderer.
pub trait Surface {
	fn save(&self);
	fn restore(&self);
	fn translate(&self, x: f64, y: f64);
	fn scale(&self, k: f64);

	fn set_fill(&self, style: &str);
	fn set_stroke(&self, style: &str);
	fn set_line_width(&self, width: f64);
	fn set_line_dash(&self, segments: &[f64]);
	fn set_line_dash_offset(&self, offset: f64);
	fn set_global_alpha(&self, alpha: f64);
	fn composite(&self) -> String;
	fn set_composite(&self, op: &str);
	/// Uses a radial gradient from `inner` to `outer` (each `(x, y, r)`) as fill.
	fn set_radial_fill(&self, inner: (f64, f64, f64), outer: (f64, f64, f64), stops: &[(f64, &str)]);

	fn begin_path(&self);
	fn close_path(&self);
	fn move_to(&self, x: f64, y: f64);
	fn line_to(&self, x: f64, y: f64);
	fn quadratic_to(&self, cx: f64, cy: f64, x: f64, y: f64);
	/// Full circle.
	fn circle(&self, x: f64, y: f64, r: f64);
	fn round_rect(&self, x: f64, y: f64, w: f64, h: f64, r: f64);
	fn fill(&self);
	fn stroke(&self);
	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64);
	fn clear_rect(&self, x: f64, y: f64, w: f64, h: f64);

	fn set_font(&self, font: &str);
	fn set_text_align(&self, align: &str);
	fn set_text_baseline(&self, baseline: &str);
	fn measure_text(&self, text: &str) -> f64;
	fn fill_text(&self, text: &str, x: f64, y: f64);
}

impl Surface for CanvasRenderingContext2d {
	fn save(&self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn translate(&self, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::translate(self, x, y);
	}

	fn scale(&self, k: f64) {
		let _ = CanvasRenderingContext2d::scale(self, k, k);
	}

	fn set_fill(&self, style: &str) {
		self.set_fill_style_str(style);
	}

	fn set_stroke(&self, style: &str) {
		self.set_stroke_style_str(style);
	}

	fn set_line_width(&self, width: f64) {
		CanvasRenderingContext2d::set_line_width(self, width);
	}

	fn set_line_dash(&self, segments: &[f64]) {
		let array = js_sys::Array::new();
		for s in segments {
			array.push(&JsValue::from_f64(*s));
		}
		let _ = CanvasRenderingContext2d::set_line_dash(self, &array);
	}

	fn set_line_dash_offset(&self, offset: f64) {
		CanvasRenderingContext2d::set_line_dash_offset(self, offset);
	}

	fn set_global_alpha(&self, alpha: f64) {
		CanvasRenderingContext2d::set_global_alpha(self, alpha);
	}

	fn composite(&self) -> String {
		self.global_composite_operation()
			.unwrap_or_else(|_| "source-over".to_string())
	}

	fn set_composite(&self, op: &str) {
		let _ = self.set_global_composite_operation(op);
	}

	fn set_radial_fill(&self, inner: (f64, f64, f64), outer: (f64, f64, f64), stops: &[(f64, &str)]) {
		let Ok(gradient) =
			self.create_radial_gradient(inner.0, inner.1, inner.2, outer.0, outer.1, outer.2)
		else {
			return;
		};
		for (offset, color) in stops {
			let _ = gradient.add_color_stop(*offset as f32, color);
		}
		#[allow(deprecated)]
		self.set_fill_style(&gradient);
	}

	fn begin_path(&self) {
		CanvasRenderingContext2d::begin_path(self);
	}

	fn close_path(&self) {
		CanvasRenderingContext2d::close_path(self);
	}

	fn move_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::move_to(self, x, y);
	}

	fn line_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::line_to(self, x, y);
	}

	fn quadratic_to(&self, cx: f64, cy: f64, x: f64, y: f64) {
		self.quadratic_curve_to(cx, cy, x, y);
	}

	fn circle(&self, x: f64, y: f64, r: f64) {
		let _ = self.arc(x, y, r, 0.0, 2.0 * PI);
	}

	fn round_rect(&self, x: f64, y: f64, w: f64, h: f64, r: f64) {
		let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
		CanvasRenderingContext2d::move_to(self, x + r, y);
		let _ = self.arc_to(x + w, y, x + w, y + h, r);
		let _ = self.arc_to(x + w, y + h, x, y + h, r);
		let _ = self.arc_to(x, y + h, x, y, r);
		let _ = self.arc_to(x, y, x + w, y, r);
		CanvasRenderingContext2d::close_path(self);
	}

	fn fill(&self) {
		CanvasRenderingContext2d::fill(self);
	}

	fn stroke(&self) {
		CanvasRenderingContext2d::stroke(self);
	}

	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
	}

	fn clear_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		CanvasRenderingContext2d::clear_rect(self, x, y, w, h);
	}

	fn set_font(&self, font: &str) {
		CanvasRenderingContext2d::set_font(self, font);
	}

	fn set_text_align(&self, align: &str) {
		CanvasRenderingContext2d::set_text_align(self, align);
	}

	fn set_text_baseline(&self, baseline: &str) {
		CanvasRenderingContext2d::set_text_baseline(self, baseline);
	}

	fn measure_text(&self, text: &str) -> f64 {
		CanvasRenderingContext2d::measure_text(self, text)
			.map(|m| m.width())
			.unwrap_or(0.0)
	}

	fn fill_text(&self, text: &str, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::fill_text(self, text, x, y);
	}
}

#[cfg(test)]
pub(crate) mod recording {
	//! In-memory surface for painter tests.

	use std::cell::RefCell;

	use super::Surface;

	#[derive(Clone, Debug, PartialEq)]
	pub enum Op {
		Fill(String),
		Stroke(String),
		Radial,
		Circle(f64, f64, f64),
		RoundRect,
		FillPath,
		StrokePath,
		Text(String, f64, f64),
		Composite(String),
		Other,
	}

	#[derive(Default)]
	pub struct Recorder {
		pub ops: RefCell<Vec<Op>>,
	}

	impl Recorder {
		pub fn ops(&self) -> Vec<Op> {
			self.ops.borrow().clone()
		}

		pub fn texts(&self) -> Vec<String> {
			self.ops()
				.into_iter()
				.filter_map(|op| match op {
					Op::Text(t, _, _) => Some(t),
					_ => None,
				})
				.collect()
		}

		pub fn fills(&self) -> Vec<String> {
			self.ops()
				.into_iter()
				.filter_map(|op| match op {
					Op::Fill(s) => Some(s),
					_ => None,
				})
				.collect()
		}

		fn push(&self, op: Op) {
			self.ops.borrow_mut().push(op);
		}
	}

	impl Surface for Recorder {
		fn save(&self) {}
		fn restore(&self) {}
		fn translate(&self, _: f64, _: f64) {}
		fn scale(&self, _: f64) {}
		fn set_fill(&self, style: &str) {
			self.push(Op::Fill(style.to_string()));
		}
		fn set_stroke(&self, style: &str) {
			self.push(Op::Stroke(style.to_string()));
		}
		fn set_line_width(&self, _: f64) {}
		fn set_line_dash(&self, _: &[f64]) {}
		fn set_line_dash_offset(&self, _: f64) {}
		fn set_global_alpha(&self, _: f64) {}
		fn composite(&self) -> String {
			"source-over".to_string()
		}
		fn set_composite(&self, op: &str) {
			self.push(Op::Composite(op.to_string()));
		}
		fn set_radial_fill(&self, _: (f64, f64, f64), _: (f64, f64, f64), _: &[(f64, &str)]) {
			self.push(Op::Radial);
		}
		fn begin_path(&self) {}
		fn close_path(&self) {}
		fn move_to(&self, _: f64, _: f64) {
			self.push(Op::Other);
		}
		fn line_to(&self, _: f64, _: f64) {
			self.push(Op::Other);
		}
		fn quadratic_to(&self, _: f64, _: f64, _: f64, _: f64) {
			self.push(Op::Other);
		}
		fn circle(&self, x: f64, y: f64, r: f64) {
			self.push(Op::Circle(x, y, r));
		}
		fn round_rect(&self, _: f64, _: f64, _: f64, _: f64, _: f64) {
			self.push(Op::RoundRect);
		}
		fn fill(&self) {
			self.push(Op::FillPath);
		}
		fn stroke(&self) {
			self.push(Op::StrokePath);
		}
		fn fill_rect(&self, _: f64, _: f64, _: f64, _: f64) {
			self.push(Op::Other);
		}
		fn clear_rect(&self, _: f64, _: f64, _: f64, _: f64) {
			self.push(Op::Other);
		}
		fn set_font(&self, _: &str) {}
		fn set_text_align(&self, _: &str) {}
		fn set_text_baseline(&self, _: &str) {}
		fn measure_text(&self, text: &str) -> f64 {
			text.chars().count() as f64 * 6.0
		}
		fn fill_text(&self, text: &str, x: f64, y: f64) {
			self.push(Op::Text(text.to_string(), x, y));
		}
	}
}
