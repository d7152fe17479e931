use serde::Deserialize;

use super::page::decode_page_meta;
use super::time::parse_timestamp;
use super::{DecodeError, ListResource, decode_json, required_sid};
use crate::domain::{Media, Page};

const REQUIRED_FIELDS: &[&str] = &["sid", "parent_sid", "account_sid", "uri"];

#[derive(Debug, Clone, Deserialize)]
struct MediaJson {
    sid: String,
    parent_sid: String,
    account_sid: String,
    #[serde(default)]
    content_type: String,
    #[serde(default)]
    date_created: Option<String>,
    #[serde(default)]
    date_updated: Option<String>,
    uri: String,
}

#[derive(Debug, Clone, Deserialize)]
struct MediaListJson {
    #[serde(default)]
    media_list: Vec<MediaJson>,
}

impl Media {
    /// Decode one media resource from a JSON payload.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let parsed: MediaJson = decode_json(payload, REQUIRED_FIELDS)?;
        into_media(parsed)
    }

    /// Path of the media content itself: the resource URI without its `.json` suffix.
    pub fn content_path(&self) -> &str {
        self.uri.strip_suffix(".json").unwrap_or(&self.uri)
    }
}

impl ListResource for Media {
    fn decode_page(payload: &[u8]) -> Result<Page<Self>, DecodeError> {
        let meta = decode_page_meta(payload)?;
        let list: MediaListJson = decode_json(payload, REQUIRED_FIELDS)?;
        let items = list
            .media_list
            .into_iter()
            .map(into_media)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page { meta, items })
    }
}

fn into_media(parsed: MediaJson) -> Result<Media, DecodeError> {
    Ok(Media {
        sid: required_sid("sid", parsed.sid)?,
        parent_sid: required_sid("parent_sid", parsed.parent_sid)?,
        account_sid: required_sid("account_sid", parsed.account_sid)?,
        content_type: parsed.content_type,
        date_created: parse_timestamp("date_created", parsed.date_created)?,
        date_updated: parse_timestamp("date_updated", parsed.date_updated)?,
        uri: parsed.uri,
    })
}
