//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod count;
mod error;
mod incoming_number;
mod media;
mod message;
mod money;
mod page;
mod time;

pub use error::{ServiceError, decode_service_error};
pub use incoming_number::encode_buy_number_form;
pub use message::encode_send_message_form;

#[cfg(test)]
pub(crate) use message::tests::DELIVERED_MESSAGE;

use serde::de::DeserializeOwned;

use crate::domain::{Page, Sid};

/// A JSON payload could not be turned into a domain record.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Malformed JSON or a value of the wrong JSON type.
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// `field` is missing or its value is not acceptable.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl DecodeError {
    /// Name of the offending field, when the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidField { field, .. } => Some(*field),
            Self::Json(_) => None,
        }
    }
}

/// Resources that list endpoints return in pages.
pub trait ListResource: Sized {
    /// Decode a list response body: the pagination block plus the item array.
    fn decode_page(payload: &[u8]) -> Result<Page<Self>, DecodeError>;
}

/// Deserialize `payload`, reporting a missing key from `required` as
/// [`DecodeError::InvalidField`] instead of a bare JSON error.
fn decode_json<T: DeserializeOwned>(
    payload: &[u8],
    required: &'static [&'static str],
) -> Result<T, DecodeError> {
    serde_json::from_slice(payload).map_err(|err| {
        let text = err.to_string();
        let missing = text
            .strip_prefix("missing field `")
            .and_then(|rest| rest.split_once('`'))
            .and_then(|(name, _)| required.iter().copied().find(|field| *field == name));
        match missing {
            Some(field) => DecodeError::InvalidField {
                field,
                reason: "missing".to_owned(),
            },
            None => DecodeError::Json(err),
        }
    })
}

fn required_sid(field: &'static str, value: String) -> Result<Sid, DecodeError> {
    Sid::new(value).map_err(|err| DecodeError::InvalidField {
        field,
        reason: err.to_string(),
    })
}

fn optional_sid(field: &'static str, value: Option<String>) -> Result<Option<Sid>, DecodeError> {
    match value {
        Some(value) if !value.trim().is_empty() => required_sid(field, value).map(Some),
        _ => Ok(None),
    }
}
