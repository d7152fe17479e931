use crate::domain::validation::ValidationError;

use phonenumber::country;

/// Instant in UTC, as normalized from either of the service's timestamp encodings.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Region used for [`PhoneNumber::local`] and [`PhoneNumber::friendly`].
const DISPLAY_REGION: country::Id = country::Id::US;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Service-assigned resource identifier (`SM...`, `AC...`, `PN...`, `ME...`).
///
/// Invariant: non-empty after trimming.
pub struct Sid(String);

impl Sid {
    /// Field name used by the API (`Sid`).
    pub const FIELD: &'static str = "Sid";

    /// Create a validated [`Sid`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sid.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Account auth token or API key secret, used as the basic-auth password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Secret(String);

impl Secret {
    /// Name reported in validation errors.
    pub const FIELD: &'static str = "secret";

    /// Create a validated [`Secret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Outgoing message text (`Body`).
///
/// Invariant: non-empty after trimming and at most [`MessageBody::MAX_CHARS`] characters.
/// The original value (including whitespace) is preserved.
pub struct MessageBody(String);

impl MessageBody {
    /// Form field name used by the API (`Body`).
    pub const FIELD: &'static str = "Body";

    /// Longest body the service accepts, in characters.
    pub const MAX_CHARS: usize = 1600;

    /// Create a validated message body.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let chars = value.chars().count();
        if chars > Self::MAX_CHARS {
            return Err(ValidationError::OutOfRange {
                field: Self::FIELD,
                min: 1,
                max: Self::MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the body as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number exactly as it appears on the wire (`To`, `From`, `PhoneNumber`).
///
/// The raw value may carry a channel prefix such as `whatsapp:+14155238886`.
/// Equality, ordering, and hashing are based on the raw string.
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Form field name used by the API for the recipient (`To`).
    pub const FIELD: &'static str = "To";

    /// Create a validated (non-empty) phone number. The value is trimmed but otherwise kept.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wrap a value decoded from a response without validation.
    pub(crate) fn from_wire(value: String) -> Self {
        Self(value)
    }

    /// Raw value, including any channel prefix.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Channel marker in front of the number (`whatsapp` for `whatsapp:+1...`).
    pub fn channel(&self) -> Option<&str> {
        let (prefix, _) = self.0.split_once(':')?;
        let is_marker = !prefix.is_empty()
            && prefix
                .chars()
                .all(|c| !c.is_ascii_digit() && c != '+' && !c.is_whitespace());
        is_marker.then_some(prefix)
    }

    /// The number with any channel prefix removed.
    pub fn without_channel(&self) -> &str {
        match self.channel() {
            Some(channel) => &self.0[channel.len() + 1..],
            None => &self.0,
        }
    }

    /// National display form, e.g. `(925) 324-5555` for `+19253245555`.
    ///
    /// This is a display heuristic pinned to North American grouping: numbers
    /// without a country code are read as US numbers. Values that cannot be
    /// parsed are returned without their channel prefix.
    pub fn local(&self) -> String {
        self.display(phonenumber::Mode::National)
    }

    /// International display form, e.g. `+1 925-324-5555`.
    pub fn friendly(&self) -> String {
        self.display(phonenumber::Mode::International)
    }

    /// Parse the number (without channel prefix) with the `phonenumber` crate.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        &self,
        default_region: Option<country::Id>,
    ) -> Result<phonenumber::PhoneNumber, ValidationError> {
        let number = self.without_channel();
        phonenumber::parse(default_region, number).map_err(|_| {
            ValidationError::InvalidPhoneNumber {
                input: self.0.clone(),
            }
        })
    }

    /// Parse and normalize into E.164 (`+19253245555`), keeping any channel prefix.
    pub fn normalized(&self, default_region: Option<country::Id>) -> Result<Self, ValidationError> {
        let parsed = self.parse(default_region)?;
        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();
        Ok(match self.channel() {
            Some(channel) => Self(format!("{channel}:{e164}")),
            None => Self(e164),
        })
    }

    fn display(&self, mode: phonenumber::Mode) -> String {
        let number = self.without_channel();
        match phonenumber::parse(Some(DISPLAY_REGION), number) {
            Ok(parsed) => phonenumber::format(&parsed).mode(mode).to_string(),
            Err(_) => number.to_owned(),
        }
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Number of records per list page (`PageSize`).
///
/// Invariant: `1..=1000`.
pub struct PageSize(u32);

impl PageSize {
    /// Query parameter name used by the API (`PageSize`).
    pub const FIELD: &'static str = "PageSize";

    /// Minimum allowed page size.
    pub const MIN: u32 = 1;
    /// Maximum allowed page size.
    pub const MAX: u32 = 1000;

    /// Create a validated page size.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: Self::FIELD,
                min: Self::MIN as usize,
                max: Self::MAX as usize,
                actual: value as usize,
            });
        }
        Ok(Self(value))
    }

    /// Get the underlying page size.
    pub fn value(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Three-digit area code used when buying a number by region (`AreaCode`).
pub struct AreaCode(String);

impl AreaCode {
    /// Form field name used by the API (`AreaCode`).
    pub const FIELD: &'static str = "AreaCode";

    /// Create a validated area code.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.len() != 3 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidAreaCode { input: value });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the area code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Which way a message travelled.
pub enum Direction {
    Inbound,
    OutboundApi,
    OutboundReply,
    OutboundCall,
}

impl Direction {
    /// Map a wire value (`outbound-api`) to a direction.
    pub fn from_wire(value: &str) -> Option<Self> {
        Some(match value {
            "inbound" => Self::Inbound,
            "outbound-api" => Self::OutboundApi,
            "outbound-reply" => Self::OutboundReply,
            "outbound-call" => Self::OutboundCall,
            _ => return None,
        })
    }

    /// Wire value of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::OutboundApi => "outbound-api",
            Self::OutboundReply => "outbound-reply",
            Self::OutboundCall => "outbound-call",
        }
    }

    /// Human-readable form (`Outbound Api`).
    pub fn friendly(self) -> String {
        friendly_words(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Delivery status of a message.
///
/// Values unknown to this crate are preserved in [`Status::Other`].
pub enum Status {
    Accepted,
    Scheduled,
    Queued,
    Sending,
    Sent,
    Delivered,
    Undelivered,
    Failed,
    Receiving,
    Received,
    Read,
    Canceled,
    InProgress,
    Other(String),
}

impl Status {
    /// Wire value of this status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Accepted => "accepted",
            Self::Scheduled => "scheduled",
            Self::Queued => "queued",
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Undelivered => "undelivered",
            Self::Failed => "failed",
            Self::Receiving => "receiving",
            Self::Received => "received",
            Self::Read => "read",
            Self::Canceled => "canceled",
            Self::InProgress => "in-progress",
            Self::Other(value) => value,
        }
    }

    /// Human-readable form: hyphen-separated words, each capitalized (`In Progress`).
    pub fn friendly(&self) -> String {
        friendly_words(self.as_str())
    }

    /// Whether the service will not change this status any more.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Self::Delivered
                | Self::Undelivered
                | Self::Failed
                | Self::Received
                | Self::Read
                | Self::Canceled
        )
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        match value {
            "accepted" => Self::Accepted,
            "scheduled" => Self::Scheduled,
            "queued" => Self::Queued,
            "sending" => Self::Sending,
            "sent" => Self::Sent,
            "delivered" => Self::Delivered,
            "undelivered" => Self::Undelivered,
            "failed" => Self::Failed,
            "receiving" => Self::Receiving,
            "received" => Self::Received,
            "read" => Self::Read,
            "canceled" => Self::Canceled,
            "in-progress" => Self::InProgress,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Service error code attached to a failed or undelivered message.
///
/// This value is preserved as-is even when the code is unknown to this crate.
pub struct ErrorCode(i64);

impl ErrorCode {
    /// Construct an error code from its integer representation.
    pub fn new(code: i64) -> Self {
        Self(code)
    }

    /// Get the integer code as provided by the service.
    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// Map this code to a known variant, if one exists.
    pub fn known_kind(self) -> Option<KnownErrorCode> {
        KnownErrorCode::from_code(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Messaging error codes this crate gives names to.
pub enum KnownErrorCode {
    InvalidToNumber,
    RegionPermissionDenied,
    Unsubscribed,
    NotMobileNumber,
    QueueOverflow,
    AccountSuspended,
    UnreachableDestination,
    MessageBlocked,
    UnknownDestination,
    LandlineOrUnreachableCarrier,
    CarrierViolation,
    Unknown,
}

impl KnownErrorCode {
    /// Convert a raw integer code into a known variant.
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            21211 => Self::InvalidToNumber,
            21408 => Self::RegionPermissionDenied,
            21610 => Self::Unsubscribed,
            21614 => Self::NotMobileNumber,
            30001 => Self::QueueOverflow,
            30002 => Self::AccountSuspended,
            30003 => Self::UnreachableDestination,
            30004 => Self::MessageBlocked,
            30005 => Self::UnknownDestination,
            30006 => Self::LandlineOrUnreachableCarrier,
            30007 => Self::CarrierViolation,
            30008 => Self::Unknown,
            _ => return None,
        })
    }

    /// Whether resending the same message to the same recipient cannot succeed.
    pub fn is_permanent(self) -> bool {
        matches!(
            self,
            Self::InvalidToNumber
                | Self::Unsubscribed
                | Self::NotMobileNumber
                | Self::MessageBlocked
                | Self::UnknownDestination
                | Self::LandlineOrUnreachableCarrier
        )
    }
}

/// Render a price for display: `("-0.00750", Some("USD"))` becomes `$0.0075`.
///
/// Returns `None` when there is no price yet. The sign is dropped because the
/// service reports charges as negative amounts.
pub fn friendly_price(price: Option<&str>, unit: Option<&str>) -> Option<String> {
    let amount = price?.trim();
    if amount.is_empty() {
        return None;
    }
    let amount = trim_amount(amount.strip_prefix('-').unwrap_or(amount));
    let Some(unit) = unit.map(str::trim).filter(|unit| !unit.is_empty()) else {
        return Some(amount.to_owned());
    };
    Some(match currency_symbol(unit) {
        Some(symbol) => format!("{symbol}{amount}"),
        None => format!("{} {amount}", unit.to_ascii_uppercase()),
    })
}

fn currency_symbol(unit: &str) -> Option<&'static str> {
    Some(match unit.to_ascii_uppercase().as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CAD" => "CA$",
        "AUD" => "A$",
        _ => return None,
    })
}

// Drops trailing zeros but keeps at least two decimals ("0.00750" -> "0.0075", "1.000" -> "1.00").
fn trim_amount(amount: &str) -> &str {
    let Some((whole, fraction)) = amount.split_once('.') else {
        return amount;
    };
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return amount;
    }
    let significant = fraction.trim_end_matches('0').len().max(2).min(fraction.len());
    &amount[..whole.len() + 1 + significant]
}

fn friendly_words(value: &str) -> String {
    value
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
