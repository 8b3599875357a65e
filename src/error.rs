//! Error type shared by the API client and the pages that call it.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures surfaced by backend calls and user-input validation.
#[derive(Debug, Error)]
pub enum ApiError {
	/// No `window` object (not running in a browser).
	#[error("browser window unavailable")]
	NoWindow,
	/// The fetch promise rejected or a browser API threw.
	#[error("transport error: {0}")]
	Transport(String),
	/// The backend answered with a non-2xx status.
	#[error("backend returned {status}: {}", detail.as_deref().unwrap_or("no detail"))]
	Status {
		/// HTTP status code.
		status: u16,
		/// `detail` field of the error body, when the backend sent one.
		detail: Option<String>,
	},
	/// The response body was not the JSON shape we expected.
	#[error("malformed response: {0}")]
	Decode(#[from] serde_json::Error),
	/// Rejected before any request was sent.
	#[error("{0}")]
	Validation(String),
}

impl ApiError {
	/// Text displayed to the user in alerts and error bubbles.
	pub fn user_message(&self, fallback: &str) -> String {
		match self {
			ApiError::Status {
				detail: Some(detail),
				..
			} => detail.clone(),
			ApiError::Validation(msg) => msg.clone(),
			_ => fallback.to_string(),
		}
	}
}

impl From<JsValue> for ApiError {
	fn from(value: JsValue) -> Self {
		let msg = value
			.as_string()
			.or_else(|| {
				js_sys::Reflect::get(&value, &JsValue::from_str("message"))
					.ok()
					.and_then(|m| m.as_string())
			})
			.unwrap_or_else(|| format!("{:?}", value));
		ApiError::Transport(msg)
	}
}

/// Result alias for backend calls.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_detail_wins_over_fallback() {
		let err = ApiError::Status {
			status: 415,
			detail: Some("Unsupported file type".into()),
		};
		assert_eq!(err.user_message("Upload failed"), "Unsupported file type");
		assert_eq!(
			err.to_string(),
			"backend returned 415: Unsupported file type"
		);
	}

	#[test]
	fn transport_uses_fallback() {
		let err = ApiError::Transport("offline".into());
		assert_eq!(err.user_message("Delete failed. Please try again."), "Delete failed. Please try again.");
	}
}
