use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use combobox_engine::{CandidatePool, load_pool};
use combobox_tui::replay::{load_script, replay};
use combobox_tui::{CallSite, SubmitFormState};
use combobox_types::{Choice, ComboboxConfig};
use tracing::{debug, info};

/// Combobox validator: scripted replay and an interactive demo form
#[derive(Parser)]
#[command(name = "combobox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script of form events and print a JSON transcript
    Replay(ReplayArgs),
    /// Open the interactive form in the terminal
    Run(RunArgs),
}

#[derive(Args)]
struct FormArgs {
    /// Candidate pool file (YAML or JSON)
    #[arg(long)]
    candidates: PathBuf,

    /// Where the form is hosted
    #[arg(long, default_value = "business-service")]
    site: CallSite,

    /// Config file; defaults to $COMBOBOX_CONFIG_PATH or the user config dir
    #[arg(long)]
    config: Option<PathBuf>,

    /// Id of the value already committed when the form first opens
    #[arg(long)]
    committed: Option<String>,
}

#[derive(Args)]
struct ReplayArgs {
    #[command(flatten)]
    form: FormArgs,

    /// Script of events (YAML or JSON)
    #[arg(long)]
    script: PathBuf,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    form: FormArgs,

    /// Delay every candidate fetch by this many milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // The interactive form owns the terminal, so it only logs when asked to.
    let default_filter = match cli.command {
        Commands::Run(_) => "off",
        Commands::Replay(_) => "info",
    };
    init_tracing(default_filter);

    match cli.command {
        Commands::Replay(args) => run_replay(args),
        Commands::Run(args) => run_interactive(args).await,
    }
}

fn init_tracing(default_filter: &str) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

struct FormInputs {
    site: CallSite,
    config: ComboboxConfig,
    pool: CandidatePool,
    committed: Option<Choice>,
}

fn load_form_inputs(args: &FormArgs) -> Result<FormInputs> {
    let config = match &args.config {
        Some(path) => ComboboxConfig::load_from(path),
        None => ComboboxConfig::load(),
    }
    .context("loading combobox config")?;
    let pool = load_pool(&args.candidates)?;
    let committed = match &args.committed {
        Some(id) => Some(find_committed(&pool, id, &args.candidates)?),
        None => None,
    };
    debug!(site = %args.site, candidates = pool.universe().len(), "form inputs loaded");
    Ok(FormInputs {
        site: args.site,
        config,
        pool,
        committed,
    })
}

fn find_committed(pool: &CandidatePool, id: &str, source: &Path) -> Result<Choice> {
    match pool.universe().get(id) {
        Some(choice) => Ok(choice.clone()),
        None => bail!("committed value '{}' is not a candidate in {}", id, source.display()),
    }
}

fn run_replay(args: ReplayArgs) -> Result<()> {
    let inputs = load_form_inputs(&args.form)?;
    let events = load_script(&args.script)?;

    let mut form = SubmitFormState::new(inputs.site, &inputs.config, inputs.pool).with_committed(inputs.committed);
    form.open();
    let reports = replay(&mut form, &events);
    info!(site = %inputs.site, steps = reports.len(), display = form.display(), "replay finished");

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

async fn run_interactive(args: RunArgs) -> Result<()> {
    let inputs = load_form_inputs(&args.form)?;
    let latency = args.latency_ms.map(Duration::from_millis);
    combobox_tui::run(inputs.pool, inputs.site, inputs.config, inputs.committed, latency).await
}
