use anyhow::{Context, Result};
use stratusapi::{Client, FilePayload, aois};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: upload_aoi <path-to-geojson>")?;
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {path}"))?;

    let client = Client::from_env()?;

    let name = std::path::Path::new(&path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("aoi.json");
    let created = aois::create(&client, FilePayload::new(name, contents)).await?;

    match created.id {
        Some(id) => println!("Created AOI {id}"),
        None => println!("Created AOI (no id reported)"),
    }
    Ok(())
}
