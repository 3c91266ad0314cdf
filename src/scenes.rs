//! Scene metadata endpoints.

use std::collections::BTreeMap;

use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::client::Client;
use crate::error::Result;
use crate::page::{Listing, Page};
use crate::request::RequestConfig;
use crate::urls;

/// Scene kind used when callers have no reason to pick another.
pub const DEFAULT_KIND: &str = "ortho";

/// Metadata for one captured scene.
///
/// Link hrefs are rewritten absolute against the client base URL; all other
/// fields the server reports are kept verbatim in `metadata`.
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    pub id: String,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Get metadata for a single scene.
pub async fn get(client: &Client, kind: &str, id: &str) -> Result<Scene> {
    let envelope = client.get(urls::scene(kind, id)).await?;
    let mut scene: Scene = envelope.decode()?;
    urls::augment_links(&mut scene.links, client.base_url());
    Ok(scene)
}

/// Get a page of scene metadata matching a query.
///
/// The returned [`Page`] exposes a continuation when the server reported
/// more results; following it replays this query with the server's cursor.
pub async fn find(client: &Client, kind: &str, query: &[(&str, &str)]) -> Result<Page<Scene>> {
    let query: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    find_page(client.clone(), kind.to_string(), query, None).await
}

fn find_page(
    client: Client,
    kind: String,
    query: Vec<(String, String)>,
    cursor: Option<String>,
) -> BoxFuture<'static, Result<Page<Scene>>> {
    Box::pin(async move {
        let mut config = RequestConfig::new(urls::scenes(&kind)).with_query(query.iter().cloned());
        if let Some(cursor) = &cursor {
            config = config.with_query_param("cursor", cursor.clone());
        }

        let envelope = client.request(config).await?;
        let mut listing: Listing<Scene> = envelope.decode()?;
        for scene in &mut listing.data {
            urls::augment_links(&mut scene.links, client.base_url());
        }

        Ok(Page::from_listing(listing, move |next| {
            find_page(client, kind, query, Some(next))
        }))
    })
}
