use axum::http::HeaderMap;
use feed::{VIEWER_ADMIN_HEADER, VIEWER_HEADER};

/// Who is asking. Set by the session layer in front of this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub username: String,
    pub is_admin: bool,
}

impl Viewer {
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let username = headers
            .get(VIEWER_HEADER)?
            .to_str()
            .ok()?
            .trim()
            .to_string();

        if username.is_empty() {
            return None;
        }

        let is_admin = headers
            .get(VIEWER_ADMIN_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| matches!(value.trim(), "true" | "1"));

        Some(Self { username, is_admin })
    }
}
