use log::debug;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, Response};

use super::types::{
	DashboardData, Document, DocumentList, ErrorBody, GraphPayload, QueryRequest, QueryResponse,
	SummaryResponse, TaskStatus, UploadResponse,
};
use crate::config::DEFAULT_API_BASE;
use crate::error::{ApiError, Result};

enum Body<'a> {
	Empty,
	Json(String),
	Form(&'a FormData),
}

/// Thin JSON client over `window.fetch`.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
	base: String,
}

impl Default for ApiClient {
	fn default() -> Self {
		Self::new(DEFAULT_API_BASE)
	}
}

impl ApiClient {
	pub fn new(base: &str) -> Self {
		Self {
			base: base.trim_end_matches('/').to_string(),
		}
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.base, path)
	}

	/// Where the backend serves an uploaded file for preview and download.
	pub fn file_url(&self, filename: &str) -> String {
		self.url(&format!("/uploads/{}", encode_segment(filename)))
	}

	pub async fn documents(&self) -> Result<Vec<Document>> {
		let (status, body) = self.send("GET", "/documents", Body::Empty).await?;
		decode::<DocumentList>(status, &body).map(|list| list.documents)
	}

	pub async fn upload(&self, file: &File) -> Result<UploadResponse> {
		let form = FormData::new()?;
		form.append_with_blob_and_filename("file", file, &file.name())?;
		let (status, body) = self.send("POST", "/upload", Body::Form(&form)).await?;
		decode(status, &body)
	}

	pub async fn delete(&self, filename: &str) -> Result<()> {
		let path = format!("/delete/{}", encode_segment(filename));
		let (status, body) = self.send("DELETE", &path, Body::Empty).await?;
		expect_ok(status, &body)
	}

	pub async fn task_status(&self, task_id: &str) -> Result<TaskStatus> {
		let path = format!("/status/{}", encode_segment(task_id));
		let (status, body) = self.send("GET", &path, Body::Empty).await?;
		decode(status, &body)
	}

	pub async fn cancel(&self, task_id: &str) -> Result<()> {
		let path = format!("/cancel/{}", encode_segment(task_id));
		let (status, body) = self.send("POST", &path, Body::Empty).await?;
		expect_ok(status, &body)
	}

	pub async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
		let json = serde_json::to_string(request)?;
		let (status, body) = self.send("POST", "/query", Body::Json(json)).await?;
		decode(status, &body)
	}

	pub async fn summarize(&self, filename: &str) -> Result<SummaryResponse> {
		let path = format!("/summarize/{}", encode_segment(filename));
		let (status, body) = self.send("POST", &path, Body::Empty).await?;
		decode(status, &body)
	}

	pub async fn graph(&self, limit: usize) -> Result<GraphPayload> {
		let path = graph_path(limit);
		let (status, body) = self.send("GET", &path, Body::Empty).await?;
		decode(status, &body)
	}

	pub async fn dashboard(&self) -> Result<DashboardData> {
		let (status, body) = self.send("GET", "/dashboard", Body::Empty).await?;
		decode(status, &body)
	}

	async fn send(&self, method: &str, path: &str, body: Body<'_>) -> Result<(u16, String)> {
		let window = web_sys::window().ok_or(ApiError::NoWindow)?;
		let opts = RequestInit::new();
		opts.set_method(method);
		match &body {
			Body::Empty => {}
			Body::Json(json) => opts.set_body(&JsValue::from_str(json)),
			Body::Form(form) => opts.set_body(form),
		}

		let url = self.url(path);
		let request = Request::new_with_str_and_init(&url, &opts)?;
		if let Body::Json(_) = body {
			request.headers().set("Content-Type", "application/json")?;
		}

		debug!("{} {}", method, url);
		let value = JsFuture::from(window.fetch_with_request(&request)).await?;
		let response: Response = value
			.dyn_into()
			.map_err(|_| ApiError::Transport("fetch did not return a Response".into()))?;
		let text = JsFuture::from(response.text()?).await?;
		Ok((response.status(), text.as_string().unwrap_or_default()))
	}
}

fn graph_path(limit: usize) -> String {
	if limit > 0 {
		format!("/graph?limit={}", limit)
	} else {
		"/graph".to_string()
	}
}

fn encode_segment(segment: &str) -> String {
	js_sys::encode_uri_component(segment).into()
}

fn status_error(status: u16, body: &str) -> ApiError {
	let detail = serde_json::from_str::<ErrorBody>(body)
		.ok()
		.and_then(|b| b.detail)
		.map(|d| match d {
			serde_json::Value::String(s) => s,
			other => other.to_string(),
		});
	ApiError::Status { status, detail }
}

/// Maps a raw `(status, body)` pair onto the expected JSON type.
pub fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
	if !(200..300).contains(&status) {
		return Err(status_error(status, body));
	}
	Ok(serde_json::from_str(body)?)
}

fn expect_ok(status: u16, body: &str) -> Result<()> {
	if (200..300).contains(&status) {
		Ok(())
	} else {
		Err(status_error(status, body))
	}
}
