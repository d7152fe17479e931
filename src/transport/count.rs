use serde::Deserialize;

use super::DecodeError;

/// Integer sent as a JSON number or, as the service usually does, a quoted string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(super) enum TransportCount {
    Int(i64),
    String(String),
}

impl TransportCount {
    pub(super) fn parse(self, field: &'static str) -> Result<i64, DecodeError> {
        match self {
            Self::Int(value) => Ok(value),
            Self::String(value) => {
                value
                    .trim()
                    .parse::<i64>()
                    .map_err(|err| DecodeError::InvalidField {
                        field,
                        reason: format!("{value:?} is not an integer: {err}"),
                    })
            }
        }
    }
}

pub(super) fn required_count(
    field: &'static str,
    value: Option<TransportCount>,
) -> Result<i64, DecodeError> {
    value
        .ok_or(DecodeError::InvalidField {
            field,
            reason: "missing".to_owned(),
        })?
        .parse(field)
}

/// Unsigned count that defaults to zero when the field is missing.
pub(super) fn unsigned_count(
    field: &'static str,
    value: Option<TransportCount>,
) -> Result<u64, DecodeError> {
    let Some(value) = value else {
        return Ok(0);
    };
    let parsed = value.parse(field)?;
    u64::try_from(parsed).map_err(|_| DecodeError::InvalidField {
        field,
        reason: format!("{parsed} is negative"),
    })
}
