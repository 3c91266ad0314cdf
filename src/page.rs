use futures::future::BoxFuture;
use serde::Deserialize;

use crate::error::Result;

/// Wire envelope for list endpoints: the items for one page, an optional
/// total count, and an optional continuation cursor.
#[derive(Debug, Deserialize)]
pub(crate) struct Listing<T> {
    #[serde(default)]
    pub(crate) count: Option<u64>,
    pub(crate) data: Vec<T>,
    #[serde(default)]
    pub(crate) next: Option<String>,
}

type FetchNext<T> = Box<dyn FnOnce() -> BoxFuture<'static, Result<Page<T>>> + Send>;

/// One page of a list response.
///
/// Pages are one-shot and forward-only: [`fetch_next`](Page::fetch_next)
/// consumes the page and is present only when the server reported more
/// results. Re-reading page N means replaying the cursor chain from the
/// start.
pub struct Page<T> {
    items: Vec<T>,
    count: Option<u64>,
    next: Option<FetchNext<T>>,
}

impl<T> Page<T> {
    /// Wrap a list envelope. `fetch` re-invokes the originating query with
    /// the server's continuation cursor; it is only called when the envelope
    /// carried one.
    pub(crate) fn from_listing<F>(listing: Listing<T>, fetch: F) -> Self
    where
        F: FnOnce(String) -> BoxFuture<'static, Result<Page<T>>> + Send + 'static,
    {
        let next = listing
            .next
            .map(|cursor| Box::new(move || fetch(cursor)) as FetchNext<T>);
        Self {
            items: listing.data,
            count: listing.count,
            next,
        }
    }

    /// Items on this page.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Server-reported total result count, when the endpoint provides one.
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    /// Whether the server indicated more results exist.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Fetch the next page. Returns `None` when the result set is exhausted;
    /// that is not an error.
    pub fn fetch_next(self) -> Option<BoxFuture<'static, Result<Page<T>>>> {
        self.next.map(|fetch| fetch())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Page<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("items", &self.items)
            .field("count", &self.count)
            .field("has_next", &self.next.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn last_page<T: Send + 'static>(items: Vec<T>) -> Page<T> {
        Page::from_listing(
            Listing {
                count: None,
                data: items,
                next: None,
            },
            |_| unreachable!("exhausted listing must not fetch"),
        )
    }

    #[test]
    fn listing_deserializes_with_optional_fields() {
        let listing: Listing<u32> = serde_json::from_value(serde_json::json!({
            "data": [1, 2, 3]
        }))
        .unwrap();
        assert_eq!(listing.data, vec![1, 2, 3]);
        assert!(listing.count.is_none());
        assert!(listing.next.is_none());

        let listing: Listing<u32> = serde_json::from_value(serde_json::json!({
            "count": 42,
            "data": [],
            "next": "cursor123"
        }))
        .unwrap();
        assert_eq!(listing.count, Some(42));
        assert_eq!(listing.next.as_deref(), Some("cursor123"));
    }

    #[test]
    fn exhausted_listing_has_no_continuation() {
        let page = last_page(vec![1, 2]);
        assert_eq!(page.items(), &[1, 2]);
        assert!(!page.has_next());
        assert!(page.fetch_next().is_none());
    }

    #[tokio::test]
    async fn fetch_next_replays_the_query_with_the_cursor() {
        let page = Page::from_listing(
            Listing {
                count: Some(3),
                data: vec![1, 2],
                next: Some("cursor123".to_string()),
            },
            |cursor| {
                Box::pin(async move {
                    assert_eq!(cursor, "cursor123");
                    Ok(last_page(vec![3]))
                })
            },
        );

        assert_eq!(page.count(), Some(3));
        assert!(page.has_next());

        let next = page.fetch_next().expect("continuation present").await.unwrap();
        assert_eq!(next.items(), &[3]);
        assert!(!next.has_next());
    }
}
