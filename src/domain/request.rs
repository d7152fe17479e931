use url::Url;

use crate::domain::validation::ValidationError;
use crate::domain::value::{AreaCode, MessageBody, PageSize, PhoneNumber, Sid};

pub const SEND_MESSAGE_MAX_MEDIA_URLS: usize = 10;

/// Filters and page size for a list endpoint.
///
/// Parameters are sent in insertion order; `PageSize` is always appended last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    params: Vec<(String, String)>,
    page_size: Option<PageSize>,
}

impl PageQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter parameter such as `To`, `From` or `DateSent>`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn requested_page_size(&self) -> Option<PageSize> {
        self.page_size
    }
}

/// Who the message appears to come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sender {
    /// A number (or channel address) owned by the account.
    Number(PhoneNumber),
    /// A messaging service that picks the sender from its pool.
    MessagingService(Sid),
}

#[derive(Debug, Clone)]
pub struct SendMessage {
    to: PhoneNumber,
    sender: Sender,
    body: Option<MessageBody>,
    media_urls: Vec<Url>,
    status_callback: Option<Url>,
}

impl SendMessage {
    /// A text message. Media can be attached with [`SendMessage::with_media`].
    pub fn text(from: PhoneNumber, to: PhoneNumber, body: MessageBody) -> Self {
        Self {
            to,
            sender: Sender::Number(from),
            body: Some(body),
            media_urls: Vec::new(),
            status_callback: None,
        }
    }

    /// A message with media attachments and an optional body.
    pub fn media(
        sender: Sender,
        to: PhoneNumber,
        body: Option<MessageBody>,
        media_urls: Vec<Url>,
    ) -> Result<Self, ValidationError> {
        if body.is_none() && media_urls.is_empty() {
            return Err(ValidationError::MissingContent);
        }
        if media_urls.len() > SEND_MESSAGE_MAX_MEDIA_URLS {
            return Err(ValidationError::TooManyMediaUrls {
                max: SEND_MESSAGE_MAX_MEDIA_URLS,
                actual: media_urls.len(),
            });
        }
        Ok(Self {
            to,
            sender,
            body,
            media_urls,
            status_callback: None,
        })
    }

    pub fn with_media(mut self, url: Url) -> Result<Self, ValidationError> {
        if self.media_urls.len() >= SEND_MESSAGE_MAX_MEDIA_URLS {
            return Err(ValidationError::TooManyMediaUrls {
                max: SEND_MESSAGE_MAX_MEDIA_URLS,
                actual: self.media_urls.len() + 1,
            });
        }
        self.media_urls.push(url);
        Ok(self)
    }

    pub fn with_sender(mut self, sender: Sender) -> Self {
        self.sender = sender;
        self
    }

    pub fn with_status_callback(mut self, url: Url) -> Self {
        self.status_callback = Some(url);
        self
    }

    pub fn to(&self) -> &PhoneNumber {
        &self.to
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    pub fn body(&self) -> Option<&MessageBody> {
        self.body.as_ref()
    }

    pub fn media_urls(&self) -> &[Url] {
        &self.media_urls
    }

    pub fn status_callback(&self) -> Option<&Url> {
        self.status_callback.as_ref()
    }
}

/// Purchase an incoming phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuyNumber {
    /// Buy this exact number.
    PhoneNumber(PhoneNumber),
    /// Buy any available number in this area code.
    AreaCode(AreaCode),
}
