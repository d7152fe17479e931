use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    OutOfRange {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },
    TooManyMediaUrls { max: usize, actual: usize },
    MissingContent,
    InvalidAreaCode { input: String },
    InvalidBaseUrl { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::OutOfRange {
                field,
                min,
                max,
                actual,
            } => {
                write!(
                    f,
                    "{field} out of range: {actual} (expected {min}..={max})"
                )
            }
            Self::TooManyMediaUrls { max, actual } => {
                write!(f, "too many media urls: {actual} (max {max})")
            }
            Self::MissingContent => write!(f, "message needs a body or at least one media url"),
            Self::InvalidAreaCode { input } => {
                write!(f, "area code must be exactly 3 digits: {input}")
            }
            Self::InvalidBaseUrl { input } => write!(f, "base url cannot be a base: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}
