use aggregator_quote::source::{measure_end, measure_start, QuoteWorkflow, RateLimit};
use anyhow::{Context, Result};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut workflow = QuoteWorkflow::new(reqwest::Client::new());
    if let Ok(base_url) = std::env::var("AGGREGATOR_API_URL") {
        workflow = workflow.with_base_url(base_url);
    }
    if let Ok(delay_ms) = std::env::var("QUOTE_DELAY_MS") {
        let delay_ms: u64 = delay_ms.parse().context("QUOTE_DELAY_MS")?;
        workflow = workflow.with_rate_limit(RateLimit::fixed(Duration::from_millis(delay_ms)));
    }

    let start = measure_start("get_quote");
    let payload = workflow.run(&args).await?;
    measure_end(start);

    println!("{}", payload);

    Ok(())
}
