use serde::Deserialize;

use super::count::TransportCount;

/// Non-2xx response, decoded from the service's error body.
///
/// The body looks like `{"code": 21211, "message": "...", "more_info": "...", "status": 400}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {title}")]
pub struct ServiceError {
    /// HTTP status, as reported in the body or, failing that, on the response.
    pub status: u16,
    /// Human-readable summary (`+1foobar is not a valid number`).
    pub title: String,
    /// Service error code, when the body carried one.
    pub code: Option<i64>,
    /// Link to the error's documentation.
    pub more_info: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorJson {
    #[serde(default)]
    code: Option<TransportCount>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    more_info: Option<String>,
    #[serde(default)]
    status: Option<TransportCount>,
}

/// Build a [`ServiceError`] from a failed response. Never fails: bodies that are not
/// the service's JSON error format keep the HTTP status and use the body as title.
pub fn decode_service_error(http_status: u16, body: &str) -> ServiceError {
    if let Ok(parsed) = serde_json::from_str::<ErrorJson>(body) {
        if let Some(title) = parsed.message.filter(|message| !message.trim().is_empty()) {
            let status = parsed
                .status
                .and_then(|status| status.parse("status").ok())
                .and_then(|status| u16::try_from(status).ok())
                .unwrap_or(http_status);
            return ServiceError {
                status,
                title,
                code: parsed.code.and_then(|code| code.parse("code").ok()),
                more_info: parsed.more_info,
            };
        }
    }

    let trimmed = body.trim();
    let title = if trimmed.is_empty() {
        reqwest::StatusCode::from_u16(http_status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .map_or_else(|| format!("HTTP {http_status}"), str::to_owned)
    } else {
        trimmed.to_owned()
    };

    ServiceError {
        status: http_status,
        title,
        code: None,
        more_info: None,
    }
}
