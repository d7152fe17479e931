use serde::Deserialize;

use super::page::decode_page_meta;
use super::time::parse_timestamp;
use super::{DecodeError, ListResource, decode_json, required_sid};
use crate::domain::{AreaCode, BuyNumber, Capabilities, IncomingPhoneNumber, Page, PhoneNumber};

const REQUIRED_FIELDS: &[&str] = &["sid", "account_sid", "phone_number"];

#[derive(Debug, Clone, Deserialize)]
struct IncomingPhoneNumberJson {
    sid: String,
    account_sid: String,
    #[serde(default)]
    friendly_name: Option<String>,
    phone_number: String,
    #[serde(default)]
    date_created: Option<String>,
    #[serde(default)]
    date_updated: Option<String>,
    #[serde(default)]
    capabilities: Option<CapabilitiesJson>,
    #[serde(default)]
    sms_url: Option<String>,
    #[serde(default)]
    voice_url: Option<String>,
    #[serde(default)]
    status_callback: Option<String>,
    #[serde(default)]
    uri: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct CapabilitiesJson {
    #[serde(default)]
    voice: bool,
    #[serde(default, alias = "SMS")]
    sms: bool,
    #[serde(default, alias = "MMS")]
    mms: bool,
    #[serde(default)]
    fax: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct IncomingPhoneNumberListJson {
    #[serde(default)]
    incoming_phone_numbers: Vec<IncomingPhoneNumberJson>,
}

impl IncomingPhoneNumber {
    /// Decode one incoming phone number resource from a JSON payload.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let parsed: IncomingPhoneNumberJson = decode_json(payload, REQUIRED_FIELDS)?;
        into_incoming_number(parsed)
    }
}

impl ListResource for IncomingPhoneNumber {
    fn decode_page(payload: &[u8]) -> Result<Page<Self>, DecodeError> {
        let meta = decode_page_meta(payload)?;
        let list: IncomingPhoneNumberListJson = decode_json(payload, REQUIRED_FIELDS)?;
        let items = list
            .incoming_phone_numbers
            .into_iter()
            .map(into_incoming_number)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page { meta, items })
    }
}

fn into_incoming_number(parsed: IncomingPhoneNumberJson) -> Result<IncomingPhoneNumber, DecodeError> {
    let capabilities = parsed.capabilities.unwrap_or_default();
    Ok(IncomingPhoneNumber {
        sid: required_sid("sid", parsed.sid)?,
        account_sid: required_sid("account_sid", parsed.account_sid)?,
        friendly_name: parsed.friendly_name.unwrap_or_default(),
        phone_number: PhoneNumber::from_wire(parsed.phone_number),
        date_created: parse_timestamp("date_created", parsed.date_created)?,
        date_updated: parse_timestamp("date_updated", parsed.date_updated)?,
        capabilities: Capabilities {
            voice: capabilities.voice,
            sms: capabilities.sms,
            mms: capabilities.mms,
            fax: capabilities.fax,
        },
        sms_url: parsed.sms_url.filter(|url| !url.is_empty()),
        voice_url: parsed.voice_url.filter(|url| !url.is_empty()),
        status_callback: parsed.status_callback.filter(|url| !url.is_empty()),
        uri: parsed.uri,
    })
}

pub fn encode_buy_number_form(request: &BuyNumber) -> Vec<(String, String)> {
    match request {
        BuyNumber::PhoneNumber(number) => {
            vec![("PhoneNumber".to_owned(), number.raw().to_owned())]
        }
        BuyNumber::AreaCode(area_code) => {
            vec![(AreaCode::FIELD.to_owned(), area_code.as_str().to_owned())]
        }
    }
}
