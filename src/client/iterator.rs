//! Stateful pagination over list endpoints.

use std::fmt;

use url::Url;

use super::{RequestContext, TwilioClient, TwilioError};
use crate::domain::{Page, PageSize};
use crate::transport::ListResource;

/// Where a [`PageIterator`] stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IteratorState {
    /// The next call fetches a page.
    Ready,
    /// A fetch was started and not finished; the next call repeats it.
    Fetching,
    /// The last page was returned; every further call yields `Ok(None)`.
    Exhausted,
    /// A fetch failed; every further call yields [`TwilioError::IteratorFailed`].
    Failed,
}

#[derive(Debug, Clone)]
enum Cursor {
    Ready(Url),
    Fetching(Url),
    Exhausted,
    Failed,
}

/// Walks a list endpoint page by page, following `next_page_uri`.
///
/// `next` takes `&mut self`, so a single iterator can never have two fetches
/// in flight. Dropping the future returned by `next` before it resolves leaves
/// the iterator on the same page, and the following call fetches it again.
pub struct PageIterator<T> {
    client: TwilioClient,
    cursor: Cursor,
    page_size: Option<PageSize>,
    last_start: Option<u64>,
    _items: std::marker::PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for PageIterator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageIterator")
            .field("cursor", &self.cursor)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl<T: ListResource> PageIterator<T> {
    pub(super) fn new(client: TwilioClient, first: Url, page_size: Option<PageSize>) -> Self {
        Self {
            client,
            cursor: Cursor::Ready(first),
            page_size,
            last_start: None,
            _items: std::marker::PhantomData,
        }
    }

    pub fn state(&self) -> IteratorState {
        match self.cursor {
            Cursor::Ready(_) => IteratorState::Ready,
            Cursor::Fetching(_) => IteratorState::Fetching,
            Cursor::Exhausted => IteratorState::Exhausted,
            Cursor::Failed => IteratorState::Failed,
        }
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once the previous page had no `next_page_uri`, and keeps
    /// returning it. After an error the iterator is spent: later calls return
    /// [`TwilioError::IteratorFailed`] without touching the network.
    pub async fn next(&mut self, ctx: &RequestContext) -> Result<Option<Page<T>>, TwilioError> {
        let url = match &self.cursor {
            Cursor::Ready(url) | Cursor::Fetching(url) => url.clone(),
            Cursor::Exhausted => return Ok(None),
            Cursor::Failed => return Err(TwilioError::IteratorFailed),
        };
        self.cursor = Cursor::Fetching(url.clone());

        match self.advance(ctx, url).await {
            Ok((page, next)) => {
                self.cursor = match next {
                    Some(next) => Cursor::Ready(next),
                    None => Cursor::Exhausted,
                };
                tracing::debug!(
                    page = page.meta.page,
                    items = page.items.len(),
                    state = ?self.state(),
                    "page fetched"
                );
                Ok(Some(page))
            }
            Err(err) => {
                tracing::warn!(error = %err, "page iterator stopped");
                self.cursor = Cursor::Failed;
                Err(err)
            }
        }
    }

    async fn advance(
        &mut self,
        ctx: &RequestContext,
        url: Url,
    ) -> Result<(Page<T>, Option<Url>), TwilioError> {
        let page: Page<T> = self.client.fetch_page(ctx, url).await?;
        self.check_progress(&page);

        let next = match page.meta.next_page_uri.as_deref() {
            Some(uri) => Some(self.client.resolve("next_page_uri", uri)?),
            None => None,
        };
        Ok((page, next))
    }

    fn check_progress(&mut self, page: &Page<T>) {
        let start = page.meta.start;
        if let Some(previous) = self.last_start {
            if start <= previous {
                tracing::warn!(previous, start, "page start did not advance");
            } else if let Some(page_size) = self.page_size {
                let step = start - previous;
                if step > u64::from(page_size.value()) {
                    tracing::warn!(
                        previous,
                        start,
                        page_size = page_size.value(),
                        "page start skipped past the requested page size"
                    );
                }
            }
        }
        self.last_start = Some(start);
    }
}
