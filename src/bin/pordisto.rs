use anyhow::Result;
use pordisto::cli;

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    let action = cli::start()?;

    action.execute().await?;

    // Flush any spans still in the batch queue
    cli::telemetry::shutdown_tracer();

    Ok(())
}
