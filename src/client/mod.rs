//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod context;
mod iterator;

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

pub use context::{Cancelled, RequestContext};
pub use iterator::{IteratorState, PageIterator};

use crate::domain::{
    BuyNumber, IncomingPhoneNumber, Media, Message, Page, PageQuery, PageSize, Secret,
    SendMessage, Sid, ValidationError,
};
use crate::transport::{DecodeError, ListResource, ServiceError};

const DEFAULT_BASE_URL: &str = "https://api.twilio.com";
const API_VERSION: &str = "2010-04-01";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone)]
struct HttpRequest {
    method: HttpMethod,
    url: Url,
    form: Vec<(String, String)>,
    username: String,
    password: Secret,
    /// `false` returns a 3xx response as is, with its `Location`.
    follow_redirects: bool,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    location: Option<String>,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, BoxError>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
    no_redirect: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let client = if request.follow_redirects {
                &self.client
            } else {
                &self.no_redirect
            };
            let builder = match request.method {
                HttpMethod::Get => client.get(request.url),
                HttpMethod::Post => client.post(request.url).form(&request.form),
            };
            let response = builder
                .basic_auth(request.username, Some(request.password.as_str()))
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?;
            let status = response.status().as_u16();
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await?;
            Ok(HttpResponse {
                status,
                location,
                body,
            })
        })
    }
}

#[derive(Debug, Clone)]
/// Credentials for the REST API, sent as HTTP basic auth.
///
/// Use [`Auth::auth_token`] with the account's primary token, or [`Auth::api_key`]
/// with a revocable API key.
pub enum Auth {
    /// Account SID + auth token.
    AuthToken { account_sid: Sid, auth_token: Secret },
    /// API key SID + secret, acting on `account_sid`.
    ApiKey {
        account_sid: Sid,
        key_sid: Sid,
        secret: Secret,
    },
}

impl Auth {
    /// Create [`Auth::AuthToken`], validating both parts.
    pub fn auth_token(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::AuthToken {
            account_sid: Sid::new(account_sid)?,
            auth_token: Secret::new(auth_token)?,
        })
    }

    /// Create [`Auth::ApiKey`], validating all parts.
    pub fn api_key(
        account_sid: impl Into<String>,
        key_sid: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::ApiKey {
            account_sid: Sid::new(account_sid)?,
            key_sid: Sid::new(key_sid)?,
            secret: Secret::new(secret)?,
        })
    }

    /// The account whose resources are addressed.
    pub fn account_sid(&self) -> &Sid {
        match self {
            Self::AuthToken { account_sid, .. } | Self::ApiKey { account_sid, .. } => account_sid,
        }
    }

    fn basic_auth(&self) -> (String, Secret) {
        match self {
            Self::AuthToken {
                account_sid,
                auth_token,
            } => (account_sid.as_str().to_owned(), auth_token.clone()),
            Self::ApiKey {
                key_sid, secret, ..
            } => (key_sid.as_str().to_owned(), secret.clone()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`TwilioClient`] and [`PageIterator`].
///
/// Match on the variant, or on [`TwilioError::kind`] when only the category matters.
/// Running out of pages is not an error: [`PageIterator::next`] returns `Ok(None)`.
pub enum TwilioError {
    /// HTTP client / transport failure (DNS, TLS, client timeout, etc).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The request context was cancelled or passed its deadline.
    #[error("{0}")]
    Cancelled(#[from] Cancelled),

    /// Non-2xx response, decoded from the service's error body.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// Response body could not be decoded into the expected resource.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// [`PageIterator::next`] was called again after it returned an error.
    #[error("page iterator stopped after an earlier error")]
    IteratorFailed,
}

/// Category of a [`TwilioError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Cancelled,
    Service,
    Decode,
    Validation,
    IteratorFailed,
}

impl TwilioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            Self::Service(_) => ErrorKind::Service,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Validation(_) => ErrorKind::Validation,
            Self::IteratorFailed => ErrorKind::IteratorFailed,
        }
    }

    /// The decoded service error, for non-2xx responses.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`TwilioClient`].
///
/// Use this when you need to customize the base URL, timeout, or user-agent.
pub struct TwilioClientBuilder {
    auth: Auth,
    base_url: Option<Url>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TwilioClientBuilder {
    /// Create a builder with the default base URL and no timeout/user-agent override.
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            base_url: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API host (`https://api.twilio.com`), e.g. to point at a test server.
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set an HTTP client timeout applied to every request, on top of any
    /// [`RequestContext`] deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`TwilioClient`].
    pub fn build(self) -> Result<TwilioClient, TwilioError> {
        let base_url = match self.base_url {
            Some(base_url) => base_url,
            None => default_base_url()?,
        };
        if base_url.cannot_be_a_base() {
            return Err(ValidationError::InvalidBaseUrl {
                input: base_url.to_string(),
            }
            .into());
        }

        let http = ReqwestTransport {
            client: http_client(self.timeout, self.user_agent.clone(), true)?,
            no_redirect: http_client(self.timeout, self.user_agent, false)?,
        };

        Ok(TwilioClient {
            auth: self.auth,
            base_url,
            http: Arc::new(http),
        })
    }
}

fn http_client(
    timeout: Option<Duration>,
    user_agent: Option<String>,
    follow_redirects: bool,
) -> Result<reqwest::Client, TwilioError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(user_agent) = user_agent {
        builder = builder.user_agent(user_agent);
    }
    if !follow_redirects {
        builder = builder.redirect(reqwest::redirect::Policy::none());
    }
    builder
        .build()
        .map_err(|err| TwilioError::Transport(Box::new(err)))
}

fn default_base_url() -> Result<Url, TwilioError> {
    Url::parse(DEFAULT_BASE_URL).map_err(|err| TwilioError::Transport(Box::new(err)))
}

#[derive(Clone)]
/// High-level REST client for messages, media and incoming phone numbers.
///
/// Every call takes a [`RequestContext`] that bounds how long it may run.
/// Cloning is cheap; clones share the underlying connection pool.
pub struct TwilioClient {
    auth: Auth,
    base_url: Url,
    http: Arc<dyn HttpTransport>,
}

impl fmt::Debug for TwilioClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioClient")
            .field("auth", &self.auth)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl TwilioClient {
    /// Create a client using the default base URL.
    ///
    /// For more customization, use [`TwilioClient::builder`].
    pub fn new(auth: Auth) -> Result<Self, TwilioError> {
        TwilioClientBuilder::new(auth).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(auth: Auth) -> TwilioClientBuilder {
        TwilioClientBuilder::new(auth)
    }

    pub fn account_sid(&self) -> &Sid {
        self.auth.account_sid()
    }

    /// Fetch one message by SID.
    pub async fn get_message(
        &self,
        ctx: &RequestContext,
        sid: &Sid,
    ) -> Result<Message, TwilioError> {
        let url = self.account_url(&["Messages", &json_segment(sid)]);
        let body = self.send(ctx, HttpMethod::Get, url, Vec::new()).await?;
        Ok(Message::decode(body.as_bytes())?)
    }

    /// Fetch the first page of messages matching `query`.
    pub async fn list_messages(
        &self,
        ctx: &RequestContext,
        query: &PageQuery,
    ) -> Result<Page<Message>, TwilioError> {
        let url = with_query(self.account_url(&["Messages.json"]), query);
        self.fetch_page(ctx, url).await
    }

    /// Iterate over every page of messages matching `query`.
    pub fn message_pages(&self, query: PageQuery) -> PageIterator<Message> {
        let url = with_query(self.account_url(&["Messages.json"]), &query);
        PageIterator::new(self.clone(), url, query.requested_page_size())
    }

    /// Send a message.
    ///
    /// Errors:
    /// - [`TwilioError::Service`] when the service rejects the message (bad number, no permission),
    /// - [`TwilioError::Cancelled`] when `ctx` ends first. The message may still have been sent.
    pub async fn send_message(
        &self,
        ctx: &RequestContext,
        request: SendMessage,
    ) -> Result<Message, TwilioError> {
        let url = self.account_url(&["Messages.json"]);
        let form = crate::transport::encode_send_message_form(&request);
        let body = self.send(ctx, HttpMethod::Post, url, form).await?;
        Ok(Message::decode(body.as_bytes())?)
    }

    /// Fetch the first page of media attached to a message.
    pub async fn list_media(
        &self,
        ctx: &RequestContext,
        message_sid: &Sid,
        query: &PageQuery,
    ) -> Result<Page<Media>, TwilioError> {
        let url = with_query(self.media_list_url(message_sid), query);
        self.fetch_page(ctx, url).await
    }

    /// Iterate over every page of media attached to a message.
    pub fn media_pages(&self, message_sid: &Sid, query: PageQuery) -> PageIterator<Media> {
        let url = with_query(self.media_list_url(message_sid), &query);
        PageIterator::new(self.clone(), url, query.requested_page_size())
    }

    /// Hosted URL of one media item's content.
    ///
    /// The API answers a request for the content with a redirect to where the
    /// file is hosted. The redirect is not followed; its `Location` is returned.
    pub async fn media_url(&self, ctx: &RequestContext, media: &Media) -> Result<Url, TwilioError> {
        let url = self.resolve("uri", media.content_path())?;
        let response = self
            .dispatch(ctx, HttpMethod::Get, url.clone(), Vec::new(), false)
            .await?;

        if !(200..=399).contains(&response.status) {
            return Err(crate::transport::decode_service_error(response.status, &response.body).into());
        }
        let location = match response.location {
            Some(location) if (300..=399).contains(&response.status) => location,
            _ => {
                return Err(DecodeError::InvalidField {
                    field: "Location",
                    reason: format!(
                        "expected a redirect to the media content, got status {}",
                        response.status
                    ),
                }
                .into());
            }
        };
        let hosted = url.join(&location).map_err(|err| DecodeError::InvalidField {
            field: "Location",
            reason: format!("{location:?} is not a valid URI: {err}"),
        })?;
        Ok(hosted)
    }

    /// Hosted URLs of every media item attached to a message, in list order.
    pub async fn media_urls(
        &self,
        ctx: &RequestContext,
        message_sid: &Sid,
    ) -> Result<Vec<Url>, TwilioError> {
        let mut pages = self.media_pages(message_sid, PageQuery::new());
        let mut urls = Vec::new();
        while let Some(page) = pages.next(ctx).await? {
            for media in &page.items {
                urls.push(self.media_url(ctx, media).await?);
            }
        }
        Ok(urls)
    }

    /// Fetch one incoming phone number by SID.
    pub async fn get_incoming_number(
        &self,
        ctx: &RequestContext,
        sid: &Sid,
    ) -> Result<IncomingPhoneNumber, TwilioError> {
        let url = self.account_url(&["IncomingPhoneNumbers", &json_segment(sid)]);
        let body = self.send(ctx, HttpMethod::Get, url, Vec::new()).await?;
        Ok(IncomingPhoneNumber::decode(body.as_bytes())?)
    }

    /// Fetch the first page of the account's phone numbers.
    pub async fn list_incoming_numbers(
        &self,
        ctx: &RequestContext,
        query: &PageQuery,
    ) -> Result<Page<IncomingPhoneNumber>, TwilioError> {
        let url = with_query(self.account_url(&["IncomingPhoneNumbers.json"]), query);
        self.fetch_page(ctx, url).await
    }

    /// Iterate over every page of the account's phone numbers.
    pub fn incoming_number_pages(&self, query: PageQuery) -> PageIterator<IncomingPhoneNumber> {
        let url = with_query(self.account_url(&["IncomingPhoneNumbers.json"]), &query);
        PageIterator::new(self.clone(), url, query.requested_page_size())
    }

    /// Buy a phone number for the account.
    ///
    /// An unavailable or malformed number surfaces as [`TwilioError::Service`] with
    /// status 400 and the service's explanation as title.
    pub async fn buy_number(
        &self,
        ctx: &RequestContext,
        request: BuyNumber,
    ) -> Result<IncomingPhoneNumber, TwilioError> {
        let url = self.account_url(&["IncomingPhoneNumbers.json"]);
        let form = crate::transport::encode_buy_number_form(&request);
        let body = self.send(ctx, HttpMethod::Post, url, form).await?;
        Ok(IncomingPhoneNumber::decode(body.as_bytes())?)
    }

    async fn fetch_page<T: ListResource>(
        &self,
        ctx: &RequestContext,
        url: Url,
    ) -> Result<Page<T>, TwilioError> {
        let body = self.send(ctx, HttpMethod::Get, url, Vec::new()).await?;
        Ok(T::decode_page(body.as_bytes())?)
    }

    /// Resolve a server-supplied URI against the base URL. Host-relative URIs
    /// (`/2010-04-01/...`) keep the base URL's path prefix.
    fn resolve(&self, field: &'static str, uri: &str) -> Result<Url, DecodeError> {
        let joined = self
            .base_url
            .join(uri)
            .map_err(|err| DecodeError::InvalidField {
                field,
                reason: format!("{uri:?} is not a valid URI: {err}"),
            })?;
        if !uri.starts_with('/') || uri.starts_with("//") {
            return Ok(joined);
        }

        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{prefix}{}", joined.path()));
        url.set_query(joined.query());
        url.set_fragment(None);
        Ok(url)
    }

    fn account_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push(API_VERSION)
                .push("Accounts")
                .push(self.auth.account_sid().as_str())
                .extend(segments);
        }
        url
    }

    fn media_list_url(&self, message_sid: &Sid) -> Url {
        self.account_url(&["Messages", message_sid.as_str(), "Media.json"])
    }

    async fn send(
        &self,
        ctx: &RequestContext,
        method: HttpMethod,
        url: Url,
        form: Vec<(String, String)>,
    ) -> Result<String, TwilioError> {
        let response = self.dispatch(ctx, method, url, form, true).await?;

        if !(200..=299).contains(&response.status) {
            return Err(crate::transport::decode_service_error(response.status, &response.body).into());
        }

        Ok(response.body)
    }

    async fn dispatch(
        &self,
        ctx: &RequestContext,
        method: HttpMethod,
        url: Url,
        form: Vec<(String, String)>,
        follow_redirects: bool,
    ) -> Result<HttpResponse, TwilioError> {
        let (username, password) = self.auth.basic_auth();
        tracing::debug!(method = ?method, url = %url, "sending request");

        let request = HttpRequest {
            method,
            url,
            form,
            username,
            password,
            follow_redirects,
        };
        let response = ctx
            .run(self.http.execute(request))
            .await?
            .map_err(TwilioError::Transport)?;

        tracing::debug!(status = response.status, "received response");
        Ok(response)
    }
}

fn json_segment(sid: &Sid) -> String {
    format!("{}.json", sid.as_str())
}

fn with_query(mut url: Url, query: &PageQuery) -> Url {
    if query.params().is_empty() && query.requested_page_size().is_none() {
        return url;
    }
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query.params() {
            pairs.append_pair(key, value);
        }
        if let Some(page_size) = query.requested_page_size() {
            pairs.append_pair(PageSize::FIELD, &page_size.value().to_string());
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::domain::{AreaCode, MessageBody, PhoneNumber, Status};
    use crate::transport::DELIVERED_MESSAGE;

    use super::*;

    pub(super) const ACCOUNT_SID: &str = "AC58f1e8f2b1c6b88ca90a012a4be0c279";
    const HOSTED: &str =
        "https://s3-external-1.amazonaws.com/media.twiliocdn.com/AC58f1e8f2b1c6b88ca90a012a4be0c279";

    #[derive(Debug, Clone)]
    pub(super) enum FakeReply {
        Respond(u16, String),
        /// `302 Found` with this `Location`.
        Redirect(String),
        Hang,
    }

    #[derive(Debug, Clone)]
    pub(super) struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug, Default)]
    struct FakeTransportState {
        requests: Vec<HttpRequest>,
        replies: VecDeque<FakeReply>,
    }

    impl FakeTransport {
        pub(super) fn new(replies: impl IntoIterator<Item = FakeReply>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    requests: Vec::new(),
                    replies: replies.into_iter().collect(),
                })),
            }
        }

        pub(super) fn respond(status: u16, body: impl Into<String>) -> Self {
            Self::new([FakeReply::Respond(status, body.into())])
        }

        pub(super) fn urls(&self) -> Vec<String> {
            let state = self.state.lock().unwrap();
            state
                .requests
                .iter()
                .map(|request| request.url.to_string())
                .collect()
        }

        fn last_request(&self) -> HttpRequest {
            let state = self.state.lock().unwrap();
            state.requests.last().cloned().unwrap()
        }
    }

    impl HttpTransport for FakeTransport {
        fn execute(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, BoxError>> {
            Box::pin(async move {
                let reply = {
                    let mut state = self.state.lock().unwrap();
                    state.requests.push(request);
                    state.replies.pop_front()
                };
                match reply {
                    Some(FakeReply::Respond(status, body)) => Ok(HttpResponse {
                        status,
                        location: None,
                        body,
                    }),
                    Some(FakeReply::Redirect(location)) => Ok(HttpResponse {
                        status: 302,
                        location: Some(location),
                        body: String::new(),
                    }),
                    Some(FakeReply::Hang) => std::future::pending().await,
                    None => Err("no scripted reply left".into()),
                }
            })
        }
    }

    pub(super) fn make_client(transport: FakeTransport) -> TwilioClient {
        make_client_at(transport, "https://example.invalid")
    }

    pub(super) fn make_client_at(transport: FakeTransport, base_url: &str) -> TwilioClient {
        TwilioClient {
            auth: Auth::auth_token(ACCOUNT_SID, "token").unwrap(),
            base_url: Url::parse(base_url).unwrap(),
            http: Arc::new(transport),
        }
    }

    fn assert_param(params: &[(String, String)], key: &str, value: &str) {
        assert!(
            params.iter().any(|(k, v)| k == key && v == value),
            "missing param {key}={value}; got: {params:?}"
        );
    }

    fn ctx() -> RequestContext {
        RequestContext::with_timeout(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn get_message_uses_account_path_and_basic_auth() {
        let transport = FakeTransport::respond(200, DELIVERED_MESSAGE);
        let client = make_client(transport.clone());
        let sid = Sid::new("SM26b3b00f8def53be77c5697183bfe95e").unwrap();

        let msg = client.get_message(&ctx(), &sid).await.unwrap();
        assert_eq!(msg.sid, sid);

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url.as_str(),
            "https://example.invalid/2010-04-01/Accounts/AC58f1e8f2b1c6b88ca90a012a4be0c279/Messages/SM26b3b00f8def53be77c5697183bfe95e.json"
        );
        assert_eq!(request.username, ACCOUNT_SID);
        assert_eq!(request.password.as_str(), "token");
    }

    #[tokio::test]
    async fn api_key_auth_uses_key_sid_as_username() {
        let transport = FakeTransport::respond(200, DELIVERED_MESSAGE);
        let client = TwilioClient {
            auth: Auth::api_key(ACCOUNT_SID, "SK123", "secret").unwrap(),
            ..make_client(transport.clone())
        };
        let sid = Sid::new("SM26b3b00f8def53be77c5697183bfe95e").unwrap();

        client.get_message(&ctx(), &sid).await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.username, "SK123");
        assert_eq!(request.password.as_str(), "secret");
        assert!(request.url.path().contains(ACCOUNT_SID));
    }

    #[tokio::test]
    async fn send_message_posts_form_and_decodes_message() {
        let transport = FakeTransport::respond(201, DELIVERED_MESSAGE);
        let client = make_client(transport.clone());
        let request = SendMessage::text(
            PhoneNumber::new("+19253920364").unwrap(),
            PhoneNumber::new("+19252717005").unwrap(),
            MessageBody::new("Welcome to ZomboCom.").unwrap(),
        );

        let msg = client.send_message(&ctx(), request).await.unwrap();
        assert_eq!(msg.body, "Welcome to ZomboCom.");
        assert_eq!(msg.num_segments, 1);
        assert_eq!(msg.status, Status::Delivered);

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.url.as_str().ends_with("/Messages.json"));
        assert_param(&request.form, "To", "+19252717005");
        assert_param(&request.form, "From", "+19253920364");
        assert_param(&request.form, "Body", "Welcome to ZomboCom.");
    }

    #[tokio::test]
    async fn list_messages_encodes_filters_and_page_size() {
        let body = r#"{"page": 0, "page_size": 5, "start": 0, "end": 0, "next_page_uri": null, "messages": []}"#;
        let transport = FakeTransport::respond(200, body);
        let client = make_client(transport.clone());
        let query = PageQuery::new()
            .param("To", "+19252717005")
            .page_size(PageSize::new(5).unwrap());

        let page = client.list_messages(&ctx(), &query).await.unwrap();
        assert!(page.items.is_empty());
        assert!(page.meta.is_last());

        let request = transport.last_request();
        assert_eq!(
            request.url.query(),
            Some("To=%2B19252717005&PageSize=5")
        );
    }

    #[tokio::test]
    async fn buy_number_maps_service_error() {
        let body = r#"
        {
          "code": 21421,
          "message": "+1foobar is not a valid number",
          "more_info": "https://www.twilio.com/docs/errors/21421",
          "status": 400
        }
        "#;
        let transport = FakeTransport::respond(400, body);
        let client = make_client(transport.clone());

        let err = client
            .buy_number(
                &ctx(),
                BuyNumber::PhoneNumber(PhoneNumber::new("+1foobar").unwrap()),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Service);
        let service = err.service_error().unwrap();
        assert_eq!(service.title, "+1foobar is not a valid number");
        assert_eq!(service.status, 400);

        let request = transport.last_request();
        assert!(request.url.as_str().ends_with("/IncomingPhoneNumbers.json"));
        assert_param(&request.form, "PhoneNumber", "+1foobar");
    }

    #[tokio::test]
    async fn buy_number_by_area_code() {
        let body = r#"
        {
          "account_sid": "AC58f1e8f2b1c6b88ca90a012a4be0c279",
          "phone_number": "+19253920364",
          "sid": "PN2a0747eba6abf96b7e3c3ff0b4530f6e",
          "uri": "/2010-04-01/Accounts/AC58f1e8f2b1c6b88ca90a012a4be0c279/IncomingPhoneNumbers/PN2a0747eba6abf96b7e3c3ff0b4530f6e.json"
        }
        "#;
        let transport = FakeTransport::respond(201, body);
        let client = make_client(transport.clone());

        let number = client
            .buy_number(&ctx(), BuyNumber::AreaCode(AreaCode::new("925").unwrap()))
            .await
            .unwrap();
        assert_eq!(number.phone_number.raw(), "+19253920364");
        assert_param(&transport.last_request().form, "AreaCode", "925");
    }

    #[tokio::test]
    async fn non_success_status_without_json_keeps_body() {
        let transport = FakeTransport::respond(503, "oops");
        let client = make_client(transport);
        let sid = Sid::new("SM1").unwrap();

        let err = client.get_message(&ctx(), &sid).await.unwrap_err();
        match err {
            TwilioError::Service(service) => {
                assert_eq!(service.status, 503);
                assert_eq!(service.title, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_maps_to_decode_error() {
        let transport = FakeTransport::respond(200, "{ not json }");
        let client = make_client(transport);
        let sid = Sid::new("SM1").unwrap();

        let err = client.get_message(&ctx(), &sid).await.unwrap_err();
        assert!(matches!(err, TwilioError::Decode(DecodeError::Json(_))));
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn transport_failure_maps_to_transport_error() {
        let transport = FakeTransport::new([]);
        let client = make_client(transport);
        let sid = Sid::new("SM1").unwrap();

        let err = client.get_message(&ctx(), &sid).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn expired_context_cancels_in_flight_request() {
        let transport = FakeTransport::new([FakeReply::Hang]);
        let client = make_client(transport.clone());
        let sid = Sid::new("SM1").unwrap();

        let ctx = RequestContext::with_timeout(Duration::from_millis(20));
        let err = client.get_message(&ctx, &sid).await.unwrap_err();
        assert!(matches!(
            err,
            TwilioError::Cancelled(Cancelled::DeadlineExceeded)
        ));
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(transport.urls().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_context_sends_nothing() {
        let transport = FakeTransport::respond(200, DELIVERED_MESSAGE);
        let client = make_client(transport.clone());
        let sid = Sid::new("SM1").unwrap();

        let ctx = RequestContext::new();
        ctx.cancel();
        let err = client.get_message(&ctx, &sid).await.unwrap_err();
        assert!(matches!(err, TwilioError::Cancelled(Cancelled::Canceled)));
        assert!(transport.urls().is_empty());
    }

    #[tokio::test]
    async fn media_urls_follow_every_page() {
        let first = r#"
        {
          "page": 0, "page_size": 1, "start": 0, "end": 0,
          "next_page_uri": "/2010-04-01/Accounts/AC58f1e8f2b1c6b88ca90a012a4be0c279/Messages/MM1/Media.json?PageSize=1&Page=1&PageToken=PAME1",
          "media_list": [{
            "sid": "ME1", "parent_sid": "MM1", "account_sid": "AC58f1e8f2b1c6b88ca90a012a4be0c279",
            "content_type": "image/png",
            "uri": "/2010-04-01/Accounts/AC58f1e8f2b1c6b88ca90a012a4be0c279/Messages/MM1/Media/ME1.json"
          }]
        }
        "#;
        let second = r#"
        {
          "page": 1, "page_size": 1, "start": 1, "end": 1,
          "next_page_uri": null,
          "media_list": [{
            "sid": "ME2", "parent_sid": "MM1", "account_sid": "AC58f1e8f2b1c6b88ca90a012a4be0c279",
            "content_type": "image/jpeg",
            "uri": "/2010-04-01/Accounts/AC58f1e8f2b1c6b88ca90a012a4be0c279/Messages/MM1/Media/ME2.json"
          }]
        }
        "#;
        let transport = FakeTransport::new([
            FakeReply::Respond(200, first.to_owned()),
            FakeReply::Redirect(format!("{HOSTED}/ME1")),
            FakeReply::Respond(200, second.to_owned()),
            FakeReply::Redirect(format!("{HOSTED}/ME2")),
        ]);
        let client = make_client_at(transport.clone(), "https://example.invalid/proxy/");

        let urls = client
            .media_urls(&ctx(), &Sid::new("MM1").unwrap())
            .await
            .unwrap();
        assert_eq!(
            urls.iter().map(Url::as_str).collect::<Vec<_>>(),
            vec![format!("{HOSTED}/ME1"), format!("{HOSTED}/ME2")]
        );
        assert_eq!(
            transport.urls(),
            vec![
                "https://example.invalid/proxy/2010-04-01/Accounts/AC58f1e8f2b1c6b88ca90a012a4be0c279/Messages/MM1/Media.json".to_owned(),
                "https://example.invalid/proxy/2010-04-01/Accounts/AC58f1e8f2b1c6b88ca90a012a4be0c279/Messages/MM1/Media/ME1".to_owned(),
                "https://example.invalid/proxy/2010-04-01/Accounts/AC58f1e8f2b1c6b88ca90a012a4be0c279/Messages/MM1/Media.json?PageSize=1&Page=1&PageToken=PAME1".to_owned(),
                "https://example.invalid/proxy/2010-04-01/Accounts/AC58f1e8f2b1c6b88ca90a012a4be0c279/Messages/MM1/Media/ME2".to_owned(),
            ]
        );
        assert!(!transport.last_request().follow_redirects);
    }

    fn media_item() -> Media {
        Media::decode(
            br#"{
              "sid": "ME1", "parent_sid": "MM1", "account_sid": "AC58f1e8f2b1c6b88ca90a012a4be0c279",
              "uri": "/2010-04-01/Accounts/AC58f1e8f2b1c6b88ca90a012a4be0c279/Messages/MM1/Media/ME1.json"
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn media_url_without_redirect_is_a_decode_error() {
        let transport = FakeTransport::respond(200, "PNG");
        let client = make_client(transport);

        let err = client.media_url(&ctx(), &media_item()).await.unwrap_err();
        match err {
            TwilioError::Decode(decode) => assert_eq!(decode.field(), Some("Location")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn media_url_not_found_is_a_service_error() {
        let transport = FakeTransport::respond(
            404,
            r#"{"code": 20404, "message": "The requested resource was not found", "status": 404}"#,
        );
        let client = make_client(transport);

        let err = client.media_url(&ctx(), &media_item()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(err.service_error().unwrap().status, 404);
    }

    #[test]
    fn resolve_keeps_base_path_prefix() {
        let client = make_client_at(FakeTransport::new([]), "https://example.invalid/proxy/");
        let url = client
            .resolve(
                "next_page_uri",
                "/2010-04-01/Accounts/AC1/Messages.json?PageSize=50&Page=1&PageToken=PASM1",
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.invalid/proxy/2010-04-01/Accounts/AC1/Messages.json?PageSize=50&Page=1&PageToken=PASM1"
        );

        let client = make_client(FakeTransport::new([]));
        let url = client.resolve("uri", "/2010-04-01/Accounts/AC1/Messages.json").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.invalid/2010-04-01/Accounts/AC1/Messages.json"
        );

        let url = client
            .resolve("uri", "https://media.example.com/ME1")
            .unwrap();
        assert_eq!(url.as_str(), "https://media.example.com/ME1");
    }

    #[test]
    fn auth_constructors_validate_inputs() {
        assert!(Auth::auth_token("   ", "token").is_err());
        assert!(Auth::auth_token(ACCOUNT_SID, "").is_err());
        assert!(Auth::api_key(ACCOUNT_SID, "", "secret").is_err());
    }

    #[test]
    fn builder_base_url_override_is_applied() {
        let client = TwilioClient::builder(Auth::auth_token(ACCOUNT_SID, "token").unwrap())
            .base_url(Url::parse("http://127.0.0.1:8080/proxy/").unwrap())
            .build()
            .unwrap();
        assert_eq!(
            client.account_url(&["Messages.json"]).as_str(),
            "http://127.0.0.1:8080/proxy/2010-04-01/Accounts/AC58f1e8f2b1c6b88ca90a012a4be0c279/Messages.json"
        );

        let client = TwilioClient::new(Auth::auth_token(ACCOUNT_SID, "token").unwrap()).unwrap();
        assert_eq!(client.base_url.as_str(), "https://api.twilio.com/");
        assert!(!format!("{client:?}").contains("token\""));
    }

    #[test]
    fn builder_rejects_cannot_be_a_base_url() {
        let err = TwilioClient::builder(Auth::auth_token(ACCOUNT_SID, "token").unwrap())
            .base_url(Url::parse("mailto:ops@example.com").unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            TwilioError::Validation(ValidationError::InvalidBaseUrl { .. })
        ));
    }
}
