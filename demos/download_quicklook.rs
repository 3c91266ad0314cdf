use std::io::Write;

use anyhow::{Context, Result, bail};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use stratusapi::{Client, RequestConfig, scenes};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let id = std::env::args()
        .nth(1)
        .context("usage: download_quicklook <scene-id>")?;

    let client = Client::from_env()?;

    let scene = scenes::get(&client, scenes::DEFAULT_KIND, &id).await?;
    let Some(href) = scene
        .links
        .get("quicklook")
        .or_else(|| scene.links.get("full"))
    else {
        bail!("scene {id} reports no quicklook or full link");
    };

    let envelope = client
        .get(RequestConfig::new(href.clone()).with_stream(true))
        .await?;
    let raw = envelope
        .raw
        .context("stream mode should carry the raw response")?;

    let total = raw.content_length().unwrap_or(0);
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {bytes}/{total_bytes} ({bytes_per_sec}) {wide_bar} {eta}",
        )?
        .progress_chars("=>-"),
    );

    let target = format!("{id}.png");
    let mut out = std::fs::File::create(&target)
        .with_context(|| format!("failed to create {target}"))?;

    let mut stream = raw.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        out.write_all(&chunk)?;
        pb.inc(chunk.len() as u64);
    }
    out.flush()?;
    pb.finish_and_clear();

    println!("Saved {target}");
    Ok(())
}
