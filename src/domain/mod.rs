//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{BuyNumber, PageQuery, SEND_MESSAGE_MAX_MEDIA_URLS, SendMessage, Sender};
pub use response::{
    Capabilities, IncomingPhoneNumber, Media, Message, MessageError, Page, PageMeta,
};
pub use validation::ValidationError;
pub use value::{
    AreaCode, Direction, ErrorCode, KnownErrorCode, MessageBody, PageSize, PhoneNumber, Secret,
    Sid, Status, Timestamp, friendly_price,
};

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    fn number(value: &str) -> PhoneNumber {
        PhoneNumber::new(value).unwrap()
    }

    #[test]
    fn sid_rejects_empty() {
        assert!(matches!(
            Sid::new("   "),
            Err(ValidationError::Empty { field: Sid::FIELD })
        ));
    }

    #[test]
    fn page_query_keeps_parameter_order() {
        let query = PageQuery::new()
            .param("To", "+19253245555")
            .param("From", "+14155238886")
            .page_size(PageSize::new(50).unwrap());
        assert_eq!(
            query.params(),
            &[
                ("To".to_owned(), "+19253245555".to_owned()),
                ("From".to_owned(), "+14155238886".to_owned()),
            ]
        );
        assert_eq!(query.requested_page_size(), Some(PageSize::new(50).unwrap()));
    }

    #[test]
    fn send_message_requires_body_or_media() {
        let err = SendMessage::media(
            Sender::Number(number("+14155238886")),
            number("+19253245555"),
            None,
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingContent);
    }

    #[test]
    fn send_message_media_limit_is_enforced() {
        let url = Url::parse("https://example.com/cat.png").unwrap();
        let urls = vec![url.clone(); SEND_MESSAGE_MAX_MEDIA_URLS + 1];
        let err = SendMessage::media(
            Sender::Number(number("+14155238886")),
            number("+19253245555"),
            None,
            urls,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::TooManyMediaUrls { .. }));

        let mut request = SendMessage::text(
            number("+14155238886"),
            number("+19253245555"),
            MessageBody::new("hi").unwrap(),
        );
        for _ in 0..SEND_MESSAGE_MAX_MEDIA_URLS {
            request = request.with_media(url.clone()).unwrap();
        }
        assert!(request.with_media(url).is_err());
    }

    #[test]
    fn message_error_has_message_treats_empty_as_unset() {
        let err = MessageError {
            code: ErrorCode::new(30005),
            message: String::new(),
        };
        assert!(!err.has_message());

        let err = MessageError {
            code: ErrorCode::new(30005),
            message: "Unknown destination handset".to_owned(),
        };
        assert!(err.has_message());
    }
}
