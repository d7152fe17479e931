use crate::domain::value::{
    Direction, ErrorCode, PhoneNumber, Sid, Status, Timestamp, friendly_price,
};

/// A message resource as returned by the Messages endpoints.
///
/// Built once by decoding a response; fields are never updated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub sid: Sid,
    pub account_sid: Sid,
    pub messaging_service_sid: Option<Sid>,
    pub api_version: String,
    pub direction: Direction,
    pub status: Status,
    pub from: PhoneNumber,
    pub to: PhoneNumber,
    pub body: String,
    pub date_created: Option<Timestamp>,
    pub date_updated: Option<Timestamp>,
    pub date_sent: Option<Timestamp>,
    pub num_segments: i64,
    pub num_media: i64,
    /// Decimal amount exactly as reported (`"-0.00750"`).
    pub price: Option<String>,
    /// ISO 4217 currency of [`Message::price`].
    pub price_unit: Option<String>,
    pub error: Option<MessageError>,
    pub uri: String,
    /// Relative URI of the media list, when the service links one.
    pub media_uri: Option<String>,
}

impl Message {
    /// Price with a currency symbol (`$0.0075`), or `None` while the price is not known yet.
    pub fn friendly_price(&self) -> Option<String> {
        friendly_price(self.price.as_deref(), self.price_unit.as_deref())
    }
}

/// `error_code` and `error_message` of a message; the service sets both or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageError {
    pub code: ErrorCode,
    pub message: String,
}

impl MessageError {
    /// `false` when the message text is still empty.
    ///
    /// An empty string is a decoded value, not an absent one; this check is
    /// only a convenience for callers that treat both the same way.
    pub fn has_message(&self) -> bool {
        !self.message.trim().is_empty()
    }
}

/// Pagination block shared by every list response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub page: u64,
    pub page_size: u32,
    pub start: u64,
    pub end: u64,
    pub uri: String,
    pub first_page_uri: Option<String>,
    /// `None` on the last page.
    pub next_page_uri: Option<String>,
    pub previous_page_uri: Option<String>,
}

impl PageMeta {
    pub fn is_last(&self) -> bool {
        self.next_page_uri.is_none()
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub meta: PageMeta,
    pub items: Vec<T>,
}

/// What an incoming number can be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub voice: bool,
    pub sms: bool,
    pub mms: bool,
    pub fax: bool,
}

/// A phone number owned by the account.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingPhoneNumber {
    pub sid: Sid,
    pub account_sid: Sid,
    pub friendly_name: String,
    pub phone_number: PhoneNumber,
    pub date_created: Option<Timestamp>,
    pub date_updated: Option<Timestamp>,
    pub capabilities: Capabilities,
    pub sms_url: Option<String>,
    pub voice_url: Option<String>,
    pub status_callback: Option<String>,
    pub uri: String,
}

/// A media attachment of a message.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub sid: Sid,
    pub parent_sid: Sid,
    pub account_sid: Sid,
    pub content_type: String,
    pub date_created: Option<Timestamp>,
    pub date_updated: Option<Timestamp>,
    pub uri: String,
}
