use serde::Deserialize;

use super::DecodeError;
use super::count::{TransportCount, unsigned_count};
use crate::domain::PageMeta;

#[derive(Debug, Clone, Deserialize)]
struct PageMetaJson {
    #[serde(default)]
    page: Option<TransportCount>,
    #[serde(default)]
    page_size: Option<TransportCount>,
    #[serde(default)]
    start: Option<TransportCount>,
    #[serde(default)]
    end: Option<TransportCount>,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    first_page_uri: Option<String>,
    #[serde(default)]
    next_page_uri: Option<String>,
    #[serde(default)]
    previous_page_uri: Option<String>,
}

/// Decode the pagination fields that sit next to the item array of every list body.
pub(super) fn decode_page_meta(payload: &[u8]) -> Result<PageMeta, DecodeError> {
    let parsed: PageMetaJson = serde_json::from_slice(payload)?;

    let page_size = unsigned_count("page_size", parsed.page_size)?;
    let page_size = u32::try_from(page_size).map_err(|_| DecodeError::InvalidField {
        field: "page_size",
        reason: format!("{page_size} does not fit in 32 bits"),
    })?;

    Ok(PageMeta {
        page: unsigned_count("page", parsed.page)?,
        page_size,
        start: unsigned_count("start", parsed.start)?,
        end: unsigned_count("end", parsed.end)?,
        uri: parsed.uri,
        first_page_uri: non_empty(parsed.first_page_uri),
        next_page_uri: non_empty(parsed.next_page_uri),
        previous_page_uri: non_empty(parsed.previous_page_uri),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|uri| !uri.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_middle_page() {
        let json = br#"
        {
          "first_page_uri": "/2010-04-01/Accounts/AC123/Messages.json?PageSize=50&Page=0",
          "end": 99,
          "previous_page_uri": "/2010-04-01/Accounts/AC123/Messages.json?PageSize=50&Page=0&PageToken=PBSM1",
          "messages": [],
          "uri": "/2010-04-01/Accounts/AC123/Messages.json?PageSize=50&Page=1&PageToken=PASM1",
          "page_size": 50,
          "start": 50,
          "next_page_uri": "/2010-04-01/Accounts/AC123/Messages.json?PageSize=50&Page=2&PageToken=PASM2",
          "page": 1
        }
        "#;

        let meta = decode_page_meta(json).unwrap();
        assert_eq!(meta.page, 1);
        assert_eq!(meta.page_size, 50);
        assert_eq!(meta.start, 50);
        assert_eq!(meta.end, 99);
        assert!(!meta.is_last());
        assert_eq!(
            meta.next_page_uri.as_deref(),
            Some("/2010-04-01/Accounts/AC123/Messages.json?PageSize=50&Page=2&PageToken=PASM2")
        );
    }

    #[test]
    fn null_or_empty_next_page_marks_last_page() {
        let meta = decode_page_meta(br#"{"page": 0, "page_size": 50, "start": 0, "end": 3, "next_page_uri": null}"#)
            .unwrap();
        assert!(meta.is_last());

        let meta = decode_page_meta(br#"{"page": 0, "page_size": 50, "start": 0, "end": 3, "next_page_uri": ""}"#)
            .unwrap();
        assert!(meta.is_last());
    }

    #[test]
    fn negative_start_is_rejected() {
        let err = decode_page_meta(br#"{"start": -50}"#).unwrap_err();
        assert_eq!(err.field(), Some("start"));
    }
}
