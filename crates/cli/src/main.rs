use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formbridge_engine::{
    BindingContext, FieldBinder, FormBridgeConfig, FormProcessor, StateBlob, StaticSource, load_config, load_config_from_path,
    parse_form_file, resolve_or,
};
use formbridge_types::{DataSourceKind, FieldStateMap, FormId, Submission};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "formbridge", version, about = "Reconcile, resolve, and validate MDP-backed form submissions")]
struct Cli {
    /// Configuration file (defaults to $FORMBRIDGE_CONFIG_PATH or the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Authorize widget JSON inside a submission's state blob
    Reconcile {
        #[arg(long)]
        form_id: FormId,
        /// Submission JSON file (flat key/value object)
        #[arg(long)]
        submission: PathBuf,
    },
    /// Resolve a field path against an MDP payload
    Resolve {
        #[arg(long)]
        payload: PathBuf,
        #[arg(long)]
        path: String,
        #[arg(long, default_value = "person_profile")]
        kind: DataSourceKind,
        #[arg(long, default_value = "")]
        fallback: String,
    },
    /// Run reconciliation, widget binding, and validation for a submission
    Validate {
        /// Form definition (YAML or JSON)
        #[arg(long)]
        form: PathBuf,
        #[arg(long)]
        submission: PathBuf,
    },
    /// Seal a field state map into a fresh state blob
    Seal {
        /// Field state map JSON, e.g. '{"5":"abc"}'
        #[arg(long)]
        states: String,
    },
    /// Populate MDP-bound fields from payload files
    Populate {
        #[arg(long)]
        form: PathBuf,
        #[arg(long)]
        person: Option<PathBuf>,
        #[arg(long)]
        person_uuid: Option<String>,
        #[arg(long)]
        organization: Option<PathBuf>,
        #[arg(long)]
        organization_uuid: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    }
    .context("failed to load configuration")?;
    debug!(alternate_prefixes = config.alternate_input_prefixes.len(), "configuration loaded");

    let output = run_command(cli.command, config)?;
    println!("{output}");
    Ok(())
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_command(command: Command, config: FormBridgeConfig) -> Result<String> {
    match command {
        Command::Reconcile { form_id, submission } => {
            let processor = FormProcessor::new(config)?;
            let raw = read_submission(&submission)?;
            let reconciled = processor.reconciler().reconcile(&raw, form_id);
            Ok(serde_json::to_string_pretty(&reconciled)?)
        }
        Command::Resolve {
            payload,
            path,
            kind,
            fallback,
        } => {
            let payload = read_json(&payload)?;
            Ok(resolve_or(Some(&payload), &path, kind, &fallback))
        }
        Command::Validate { form, submission } => {
            let processor = FormProcessor::new(config)?;
            let form = parse_form_file(&form)?;
            let raw = read_submission(&submission)?;
            let processed = processor.process(&form, &raw);
            Ok(serde_json::to_string_pretty(&processed)?)
        }
        Command::Seal { states } => {
            let map = FieldStateMap::from_json(&states).context("invalid field state map")?;
            let blob = StateBlob::seal(&map, &config.hasher()?)?;
            Ok(blob.encode()?)
        }
        Command::Populate {
            form,
            person,
            person_uuid,
            organization,
            organization_uuid,
        } => {
            let form = parse_form_file(&form)?;
            let source = StaticSource::new(read_optional_json(person)?, read_optional_json(organization)?);
            let context = BindingContext {
                person_uuid,
                organization_uuid,
            };
            let values: IndexMap<_, _> = FieldBinder::new(&source, &config).populate(&form, &context);
            Ok(serde_json::to_string_pretty(&values)?)
        }
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn read_optional_json(path: Option<PathBuf>) -> Result<Option<Value>> {
    path.as_deref().map(read_json).transpose()
}

fn read_submission(path: &Path) -> Result<Submission> {
    let value = read_json(path)?;
    serde_json::from_value(value).with_context(|| format!("{} is not a flat submission object", path.display()))
}
