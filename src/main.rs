use anyhow::Result;
use nafas::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
