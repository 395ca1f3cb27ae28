use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use g28_filler::config::{FillerBuilder, DEFAULT_TARGET_URL};
use g28_filler::{telemetry, ApplicantRecord, FormFiller, LlmConfig, OpenAiChat};

#[derive(Parser, Debug)]
#[command(name = "g28-filler")]
#[command(about = "Fill the G-28 representation form from an applicant record", long_about = None)]
struct Cli {
    /// Form URL
    #[arg(long, default_value = DEFAULT_TARGET_URL)]
    url: String,

    /// Applicant record as JSON (built-in sample if not given)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Run the browser without a window
    #[arg(long)]
    headless: bool,

    /// Chrome/Chromium executable to launch
    #[arg(long)]
    chrome_path: Option<String>,

    /// Log level or filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Close the browser as soon as the form is filled
    #[arg(long)]
    exit_when_done: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;

    let record = match &cli.data {
        Some(path) => ApplicantRecord::from_json_file(path)
            .with_context(|| format!("failed to load applicant record from {}", path.display()))?,
        None => ApplicantRecord::sample(),
    };

    let llm_config = LlmConfig::from_env()?;

    let mut builder = FillerBuilder::new()
        .target_url(cli.url)
        .headless(cli.headless)
        .hold_open(!cli.exit_when_done);
    if let Some(path) = cli.chrome_path {
        builder = builder.chrome_path(path);
    }

    let filler = FormFiller::new(builder.build(), OpenAiChat::new(llm_config), record);
    let report = filler.run().await?;
    info!("done: {}", report.summary());
    Ok(())
}
