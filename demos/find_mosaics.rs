use anyhow::Result;
use stratusapi::{Client, mosaics};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = Client::from_env()?;

    let mut page = mosaics::find(&client, &[("limit", "50")]).await?;
    loop {
        for mosaic in page.items() {
            println!("{}", mosaic.name);
        }
        match page.fetch_next() {
            Some(next) => page = next.await?,
            None => break,
        }
    }

    Ok(())
}
