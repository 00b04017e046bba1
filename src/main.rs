use anyhow::{Result, bail};
use clap::Parser;
use sample_view::config::ServiceConfig;
use sample_view::domain::sample::{Sample, SampleQuery};
use sample_view::services::{SharedCapability, StaticSampleService, sample_adapter};
use sample_view::ui::{FetchPhase, SamplesView};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

#[derive(Parser, Debug)]
#[command(name = "sample-view")]
#[command(about = "Fetch samples once and print them")]
#[command(version)]
struct Cli {
    /// Serve samples from the built-in catalogue instead of the HTTP service
    #[arg(long)]
    offline: bool,

    /// Only fetch samples with this tag
    #[arg(long)]
    tag: Option<String>,

    /// Maximum number of samples (defaults to the configured limit)
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ServiceConfig::load()?;

    let mut query = SampleQuery::default().with_limit(cli.limit.unwrap_or(config.default_limit));
    query.tag = cli.tag;

    let capability: Option<SharedCapability<SampleQuery, Vec<Sample>>> = if cli.offline {
        Some(Arc::new(sample_adapter(
            Arc::new(StaticSampleService::demo()),
            Handle::current(),
        )))
    } else {
        None
    };

    let mut view = SamplesView::create(query, capability, &config)?;
    view.trigger();

    // The adapter enforces the configured timeout; this only guards against
    // a capability that never answers.
    let limit = Duration::from_secs(config.timeout_seconds + 1);
    if !view.settled_within(limit).await {
        bail!("No response from sample service within {:?}", limit);
    }

    let state = view.state();
    match state.phase() {
        FetchPhase::Displayed => {
            for sample in state.result().into_iter().flatten() {
                println!("{}", sample);
            }
            Ok(())
        }
        FetchPhase::Failed => match state.error() {
            Some(error) => bail!("Fetch failed: {}", error),
            None => bail!("Fetch failed"),
        },
        phase => bail!("Unexpected view phase {:?}", phase),
    }
}
