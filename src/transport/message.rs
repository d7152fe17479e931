use serde::Deserialize;

use super::count::{TransportCount, required_count};
use super::money::TransportMoney;
use super::page::decode_page_meta;
use super::time::parse_timestamp;
use super::{DecodeError, ListResource, decode_json, optional_sid, required_sid};
use crate::domain::{
    Direction, ErrorCode, Message, MessageBody, MessageError, Page, PhoneNumber, SendMessage,
    Sender, Status,
};

const REQUIRED_FIELDS: &[&str] = &["sid", "account_sid", "direction", "status", "from", "to"];

#[derive(Debug, Clone, Deserialize)]
pub(super) struct MessageJson {
    sid: String,
    account_sid: String,
    #[serde(default)]
    messaging_service_sid: Option<String>,
    #[serde(default)]
    api_version: String,
    direction: String,
    status: String,
    from: String,
    to: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    date_created: Option<String>,
    #[serde(default)]
    date_updated: Option<String>,
    #[serde(default)]
    date_sent: Option<String>,
    #[serde(default)]
    num_segments: Option<TransportCount>,
    #[serde(default)]
    num_media: Option<TransportCount>,
    #[serde(default)]
    price: Option<TransportMoney>,
    #[serde(default)]
    price_unit: Option<String>,
    #[serde(default)]
    error_code: Option<TransportCount>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    subresource_uris: Option<SubresourceUrisJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct SubresourceUrisJson {
    #[serde(default)]
    media: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct MessageListJson {
    #[serde(default)]
    messages: Vec<MessageJson>,
}

impl Message {
    /// Decode one message resource from a JSON payload.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        decode_message(payload)
    }
}

impl ListResource for Message {
    fn decode_page(payload: &[u8]) -> Result<Page<Self>, DecodeError> {
        let meta = decode_page_meta(payload)?;
        let list: MessageListJson = decode_json(payload, REQUIRED_FIELDS)?;
        let items = list
            .messages
            .into_iter()
            .map(into_message)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page { meta, items })
    }
}

pub fn decode_message(payload: &[u8]) -> Result<Message, DecodeError> {
    let parsed: MessageJson = decode_json(payload, REQUIRED_FIELDS)?;
    into_message(parsed)
}

fn into_message(parsed: MessageJson) -> Result<Message, DecodeError> {
    let direction =
        Direction::from_wire(&parsed.direction).ok_or_else(|| DecodeError::InvalidField {
            field: "direction",
            reason: format!("unknown direction {:?}", parsed.direction),
        })?;

    Ok(Message {
        sid: required_sid("sid", parsed.sid)?,
        account_sid: required_sid("account_sid", parsed.account_sid)?,
        messaging_service_sid: optional_sid("messaging_service_sid", parsed.messaging_service_sid)?,
        api_version: parsed.api_version,
        direction,
        status: Status::from(parsed.status),
        from: PhoneNumber::from_wire(parsed.from),
        to: PhoneNumber::from_wire(parsed.to),
        body: parsed.body.unwrap_or_default(),
        date_created: parse_timestamp("date_created", parsed.date_created)?,
        date_updated: parse_timestamp("date_updated", parsed.date_updated)?,
        date_sent: parse_timestamp("date_sent", parsed.date_sent)?,
        num_segments: required_count("num_segments", parsed.num_segments)?,
        num_media: required_count("num_media", parsed.num_media)?,
        price: parsed.price.map(TransportMoney::into_string),
        price_unit: parsed.price_unit,
        error: message_error(parsed.error_code, parsed.error_message)?,
        uri: parsed.uri,
        media_uri: parsed.subresource_uris.and_then(|uris| uris.media),
    })
}

fn message_error(
    code: Option<TransportCount>,
    message: Option<String>,
) -> Result<Option<MessageError>, DecodeError> {
    match (code, message) {
        (None, None) => Ok(None),
        (Some(code), Some(message)) => Ok(Some(MessageError {
            code: ErrorCode::new(code.parse("error_code")?),
            message,
        })),
        (Some(_), None) => Err(DecodeError::InvalidField {
            field: "error_message",
            reason: "missing while error_code is set".to_owned(),
        }),
        (None, Some(_)) => Err(DecodeError::InvalidField {
            field: "error_code",
            reason: "missing while error_message is set".to_owned(),
        }),
    }
}

pub fn encode_send_message_form(request: &SendMessage) -> Vec<(String, String)> {
    let mut params = vec![(
        PhoneNumber::FIELD.to_owned(),
        request.to().raw().to_owned(),
    )];

    match request.sender() {
        Sender::Number(from) => params.push(("From".to_owned(), from.raw().to_owned())),
        Sender::MessagingService(sid) => {
            params.push(("MessagingServiceSid".to_owned(), sid.as_str().to_owned()));
        }
    }
    if let Some(body) = request.body() {
        params.push((MessageBody::FIELD.to_owned(), body.as_str().to_owned()));
    }
    for url in request.media_urls() {
        params.push(("MediaUrl".to_owned(), url.as_str().to_owned()));
    }
    if let Some(callback) = request.status_callback() {
        params.push(("StatusCallback".to_owned(), callback.as_str().to_owned()));
    }

    params
}
