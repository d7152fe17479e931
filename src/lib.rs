//! Typed Rust client for the Twilio 2010-04-01 REST API: messages, media and
//! incoming phone numbers.
//!
//! The crate has three layers: a domain layer of strong types, a transport
//! layer for wire-format quirks (two timestamp encodings, counts sent as
//! strings, channel-prefixed numbers), and a client layer that runs requests
//! under a [`RequestContext`] and walks list endpoints with a [`PageIterator`].
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use twilio_rest::{Auth, PageQuery, PageSize, RequestContext, TwilioClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), twilio_rest::TwilioError> {
//!     let client = TwilioClient::new(Auth::auth_token("AC...", "...")?)?;
//!     let ctx = RequestContext::with_timeout(Duration::from_secs(30));
//!
//!     let mut pages = client.message_pages(PageQuery::new().page_size(PageSize::new(500)?));
//!     while let Some(page) = pages.next(&ctx).await? {
//!         for message in page.items {
//!             println!("{} {} {}", message.to.local(), message.status.friendly(), message.body);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    Auth, Cancelled, ErrorKind, IteratorState, PageIterator, RequestContext, TwilioClient,
    TwilioClientBuilder, TwilioError,
};
pub use domain::{
    AreaCode, BuyNumber, Capabilities, Direction, ErrorCode, IncomingPhoneNumber, KnownErrorCode,
    Media, Message, MessageBody, MessageError, Page, PageMeta, PageQuery, PageSize, PhoneNumber,
    Secret, SendMessage, Sender, Sid, Status, Timestamp, ValidationError, friendly_price,
};
pub use transport::{DecodeError, ListResource, ServiceError};
