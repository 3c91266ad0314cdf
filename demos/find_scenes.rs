use anyhow::Result;
use stratusapi::{Client, scenes};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Example program that calls the library API.
    // Configure authentication via env vars or a `.stratusrc` file.
    let client = Client::from_env()?;

    let query = [("limit", "20"), ("acquired.gte", "2025-07-01T00:00:00Z")];
    let mut page = scenes::find(&client, scenes::DEFAULT_KIND, &query).await?;

    if let Some(count) = page.count() {
        println!("Found {count} scenes");
    }

    let mut fetched = 0usize;
    loop {
        for scene in page.items() {
            println!("{}", scene.id);
        }
        fetched += page.items().len();

        // Stop after a few pages; the full result set may be large.
        if fetched >= 100 {
            break;
        }
        match page.fetch_next() {
            Some(next) => page = next.await?,
            None => break,
        }
    }

    Ok(())
}
