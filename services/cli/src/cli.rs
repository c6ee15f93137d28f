use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use loan_wizard::config::{ApiConfig, AppConfig};
use loan_wizard::error::AppError;
use loan_wizard::telemetry;
use loan_wizard::workflows::loan_application::{
    validate_step, HttpApplicationApi, StepKey, SubmissionSequencer,
};
use tracing::info;

use crate::console::{self, ConsoleNotifier};
use crate::draft::{advance_to_review, DraftFile};
use crate::interactive;

pub(crate) type ConsoleSequencer = SubmissionSequencer<HttpApplicationApi, ConsoleNotifier>;

#[derive(Parser, Debug)]
#[command(
    name = "loan-wizard",
    about = "Fill in, review and submit loan applications from the command line",
    version
)]
struct Cli {
    /// Override the configured loan API base URL
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill in an application step by step (default command)
    Apply(ApplyArgs),
    /// Submit a completed draft file
    Submit(DraftArgs),
    /// Print the review summary of a draft file
    Review(ReviewArgs),
    /// Validate every step of a draft file
    Validate(DraftArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ApplyArgs {
    /// Pre-fill the wizard from a JSON draft
    #[arg(long)]
    pub(crate) draft: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DraftArgs {
    /// JSON draft with `application` fields and `documents`
    #[arg(long)]
    draft: PathBuf,
}

#[derive(Args, Debug)]
struct ReviewArgs {
    /// JSON draft with `application` fields and `documents`
    #[arg(long)]
    draft: PathBuf,
    /// Write the summary as CSV to this path instead of printing it
    #[arg(long)]
    csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Apply(ApplyArgs::default()));

    let mut config = AppConfig::load()?;
    if let Some(base_url) = cli.api_base_url {
        config.api = ApiConfig::new(base_url)?;
    }
    let log_filter = telemetry::init(&config.telemetry)?;
    info!(
        ?config.environment,
        base_url = config.api.base_url(),
        %log_filter,
        "loan wizard starting"
    );

    match command {
        Command::Apply(args) => interactive::run(args, sequencer(&config)).await,
        Command::Submit(args) => submit(args, sequencer(&config)).await,
        Command::Review(args) => review(args),
        Command::Validate(args) => validate(args),
    }
}

fn sequencer(config: &AppConfig) -> ConsoleSequencer {
    SubmissionSequencer::new(
        Arc::new(HttpApplicationApi::new(&config.api)),
        Arc::new(ConsoleNotifier),
    )
}

async fn submit(args: DraftArgs, sequencer: ConsoleSequencer) -> Result<(), AppError> {
    let mut wizard = DraftFile::load(&args.draft)?.into_wizard();
    advance_to_review(&mut wizard)?;

    let receipt = sequencer.submit(&mut wizard).await?;
    console::print_receipt(&receipt);
    Ok(())
}

fn review(args: ReviewArgs) -> Result<(), AppError> {
    let summary = DraftFile::load(&args.draft)?.into_wizard().review();

    match args.csv {
        Some(path) => {
            summary.write_csv(File::create(&path)?)?;
            println!("Review exported to {}", path.display());
        }
        None => print!("{summary}"),
    }
    Ok(())
}

fn validate(args: DraftArgs) -> Result<(), AppError> {
    let draft = DraftFile::load(&args.draft)?;

    let mut first_failure = None;
    for step in StepKey::FORM_STEPS {
        let outcome = validate_step(step, &draft.application);
        if outcome.is_valid() {
            println!("{step}: ok");
            continue;
        }
        console::print_blocked(step, &outcome.errors);
        if first_failure.is_none() {
            first_failure = Some(step);
        }
    }

    match first_failure {
        Some(step) => Err(AppError::Blocked(step)),
        None => Ok(()),
    }
}
