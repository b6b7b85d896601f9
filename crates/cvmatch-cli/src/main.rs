//! cvmatch CLI: submit a résumé and a job posting for fit analysis.
//!
//! Reads CVMATCH_API_URL, CVMATCH_REQUEST_TIMEOUT_SECS, CVMATCH_ANALYSIS_TIMEOUT_SECS
//! and CVMATCH_LOCALE (a `.env` file is honoured); flags override them.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cvmatch_api_client::ApiClient;
use cvmatch_cli::init_tracing;
use cvmatch_cli::input::{load_document, load_job_text};
use cvmatch_cli::progress::submit_with_progress;
use cvmatch_cli::render::{render, OutputFormat};
use cvmatch_core::models::{JobId, SubmissionInput};
use cvmatch_core::{
    AnalysisService, ClientConfig, ConfigOverrides, Locale, View, WorkflowController,
    WorkflowSettings,
};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "cvmatch", about = "Résumé / job posting fit analysis client")]
struct Cli {
    /// Base URL of the analysis service
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Message language: en or tr
    #[arg(long, global = true)]
    locale: Option<Locale>,
    /// Give up on an analysis after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a CV and a job posting, then show the fit analysis
    Analyze {
        /// CV document (PDF or DOCX)
        #[arg(long, value_name = "PATH")]
        cv: Option<PathBuf>,
        /// Job posting text
        #[arg(long, conflicts_with = "job_file")]
        job: Option<String>,
        /// File containing the job posting text
        #[arg(long, value_name = "PATH")]
        job_file: Option<PathBuf>,
    },
    /// Show a previously submitted analysis by ID
    Show {
        /// Analysis ID
        id: String,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_url: self.api_url.clone(),
            locale: self.locale,
            analysis_timeout_secs: self.timeout,
        }
    }
}

fn print_view(view: &View, locale: Locale, format: OutputFormat) -> anyhow::Result<()> {
    let out = render(view, locale, format)?;
    print!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = ClientConfig::load_env().context("Failed to load configuration")?;
    config.apply_overrides(cli.overrides());
    config.validate()?;

    let client = ApiClient::from_config(&config).context(
        "Failed to create API client. Check CVMATCH_API_URL and CVMATCH_REQUEST_TIMEOUT_SECS",
    )?;

    match cli.command {
        Commands::Analyze { cv, job, job_file } => {
            let document = match cv {
                Some(path) => Some(load_document(&path).await?),
                None => None,
            };
            let job_text = load_job_text(job, job_file).await?;
            analyze(
                client,
                &config,
                SubmissionInput::new(document, job_text),
                cli.format,
            )
            .await?;
        }
        Commands::Show { id } => {
            let id = JobId::from(id.as_str());
            let result = client
                .fetch_analysis(&id)
                .await
                .with_context(|| format!("Failed to fetch analysis {}", id))?;
            print_view(
                &View::for_result(&result, config.locale),
                config.locale,
                cli.format,
            )?;
        }
    }

    Ok(())
}

async fn analyze(
    client: ApiClient,
    config: &ClientConfig,
    input: SubmissionInput,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let locale = config.locale;
    let controller = WorkflowController::new(client, WorkflowSettings::from(config));

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let outcome = submit_with_progress(&controller, input, cancel, locale, |label| {
        eprintln!("{}", label)
    })
    .await;
    interrupt.abort();

    print_view(&controller.view(), locale, format)?;
    outcome
        .map(|_| ())
        .context("Analysis did not complete")
}
