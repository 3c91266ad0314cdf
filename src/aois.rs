//! Area-of-interest endpoints: listing, metadata, and JSON uploads.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::client::Client;
use crate::error::Result;
use crate::request::{FilePayload, RequestConfig};
use crate::urls;

/// Metadata for one uploaded area of interest.
#[derive(Debug, Clone, Deserialize)]
pub struct Aoi {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Get metadata for a single uploaded AOI.
pub async fn get(client: &Client, id: &str) -> Result<Aoi> {
    let envelope = client.get(urls::aoi(id)).await?;
    envelope.decode()
}

/// List all previously uploaded AOIs. This listing is not paged.
pub async fn list(client: &Client) -> Result<Vec<Aoi>> {
    let envelope = client.get(urls::aois()).await?;
    envelope.decode()
}

/// Create a new AOI from an uploaded JSON file.
///
/// The file is sent as a single-part `multipart/form-data` body; contents
/// are text only.
pub async fn create(client: &Client, file: FilePayload) -> Result<Aoi> {
    let config = RequestConfig::new(urls::aois()).with_file(file);
    let envelope = client.post(config).await?;
    envelope.decode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aoi_tolerates_sparse_metadata() {
        let aoi: Aoi = serde_json::from_value(serde_json::json!({
            "name": "harvest-2025",
            "geometry": {"type": "Polygon", "coordinates": []}
        }))
        .unwrap();
        assert!(aoi.id.is_none());
        assert_eq!(aoi.name.as_deref(), Some("harvest-2025"));
        assert!(aoi.metadata.contains_key("geometry"));
    }
}
