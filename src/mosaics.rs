//! Mosaic metadata endpoints.

use std::collections::BTreeMap;

use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::client::Client;
use crate::error::Result;
use crate::page::{Listing, Page};
use crate::request::RequestConfig;
use crate::urls;

/// Metadata for one mosaic.
#[derive(Debug, Clone, Deserialize)]
pub struct Mosaic {
    pub name: String,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Get metadata for a single mosaic.
pub async fn get(client: &Client, name: &str) -> Result<Mosaic> {
    let envelope = client.get(urls::mosaic(name)).await?;
    let mut mosaic: Mosaic = envelope.decode()?;
    urls::augment_links(&mut mosaic.links, client.base_url());
    Ok(mosaic)
}

/// Get a page of mosaic metadata matching a query.
pub async fn find(client: &Client, query: &[(&str, &str)]) -> Result<Page<Mosaic>> {
    let query: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    find_page(client.clone(), query, None).await
}

fn find_page(
    client: Client,
    query: Vec<(String, String)>,
    cursor: Option<String>,
) -> BoxFuture<'static, Result<Page<Mosaic>>> {
    Box::pin(async move {
        let mut config = RequestConfig::new(urls::mosaics()).with_query(query.iter().cloned());
        if let Some(cursor) = &cursor {
            config = config.with_query_param("cursor", cursor.clone());
        }

        let envelope = client.request(config).await?;
        let mut listing: Listing<Mosaic> = envelope.decode()?;
        for mosaic in &mut listing.data {
            urls::augment_links(&mut mosaic.links, client.base_url());
        }

        Ok(Page::from_listing(listing, move |next| {
            find_page(client, query, Some(next))
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mosaic_deserializes_without_links() {
        let mosaic: Mosaic = serde_json::from_value(serde_json::json!({
            "name": "global_monthly_2025_07",
            "resolution": 4.77
        }))
        .unwrap();
        assert_eq!(mosaic.name, "global_monthly_2025_07");
        assert!(mosaic.links.is_empty());
    }
}
