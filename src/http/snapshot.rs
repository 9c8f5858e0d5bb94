//! Owned copies of requests and responses kept for diagnostics.

// crates.io
use oauth2::{
	HttpRequest, HttpResponse,
	http::{HeaderMap, HeaderValue, Method, Uri, header::AUTHORIZATION},
};
// self
use crate::{_prelude::*, json};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Request line and headers of a dispatched request.
///
/// The `Authorization` header is redacted at capture time so bearer tokens never reach error
/// messages or logs.
#[derive(Clone, Debug)]
pub struct RequestSnapshot {
	/// HTTP method.
	pub method: Method,
	/// Target URI.
	pub uri: Uri,
	/// Request headers (with `Authorization` redacted).
	pub headers: HeaderMap,
}
impl RequestSnapshot {
	/// Captures the request line and headers of `request`.
	pub fn capture(request: &HttpRequest) -> Self {
		let mut headers = request.headers().clone();

		if headers.contains_key(AUTHORIZATION) {
			headers.insert(AUTHORIZATION, HeaderValue::from_static("<redacted>"));
		}

		Self { method: request.method().clone(), uri: request.uri().clone(), headers }
	}
}

/// Status, headers, and body of a received response.
#[derive(Clone)]
pub struct ResponseSnapshot {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ResponseSnapshot {
	/// Copies status, headers, and body out of `response`.
	pub fn capture(response: &HttpResponse) -> Self {
		Self {
			status: response.status().as_u16(),
			headers: response.headers().clone(),
			body: response.body().clone(),
		}
	}

	/// Decodes the body as JSON, if possible.
	pub fn json(&self) -> Option<JsonValue> {
		serde_json::from_slice(&self.body).ok()
	}

	/// Slack's `error` code from the body, if present.
	pub fn api_error(&self) -> Option<String> {
		self.json().and_then(|body| json::get_str(&body, "error").map(ToOwned::to_owned))
	}

	/// Body decoded as UTF-8 (lossy).
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}
impl Debug for ResponseSnapshot {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResponseSnapshot")
			.field("status", &self.status)
			.field("headers", &self.headers)
			.field("body", &truncate_preview(self.body_text()))
			.finish()
	}
}

/// Request/response pair attached to HTTP-level failures.
#[derive(Clone, Debug)]
pub struct FailedExchange {
	/// Request that produced the failure.
	pub request: RequestSnapshot,
	/// Response that was rejected.
	pub response: ResponseSnapshot,
}
impl FailedExchange {
	/// Captures both sides of a rejected exchange.
	pub fn new(request: RequestSnapshot, response: &HttpResponse) -> Self {
		Self { request, response: ResponseSnapshot::capture(response) }
	}
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = body.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::{Request, Response, StatusCode};
	// self
	use super::*;

	#[test]
	fn request_capture_redacts_bearer_tokens() {
		let request = Request::builder()
			.uri("https://slack.com/api/users.identity")
			.header(AUTHORIZATION, "Bearer xoxp-secret")
			.body(Vec::new())
			.expect("Request fixture should build.");
		let snapshot = RequestSnapshot::capture(&request);

		assert_eq!(snapshot.headers.get(AUTHORIZATION).map(|v| v.as_bytes()), Some(&b"<redacted>"[..]));
		assert!(!format!("{snapshot:?}").contains("xoxp-secret"));
		assert_eq!(snapshot.method, Method::GET);
	}

	#[test]
	fn response_capture_exposes_api_error() {
		let mut response = Response::new(br#"{"ok":false,"error":"missing_scope"}"#.to_vec());

		*response.status_mut() = StatusCode::OK;

		let snapshot = ResponseSnapshot::capture(&response);

		assert_eq!(snapshot.status, 200);
		assert_eq!(snapshot.api_error().as_deref(), Some("missing_scope"));
	}

	#[test]
	fn debug_output_truncates_large_bodies() {
		let snapshot =
			ResponseSnapshot { status: 500, headers: HeaderMap::new(), body: vec![b'x'; 1024] };
		let rendered = format!("{snapshot:?}");

		assert!(rendered.contains('…'));
		assert!(rendered.len() < 1024);
		assert!(snapshot.api_error().is_none());
	}
}
