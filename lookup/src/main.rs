//! Command-line lookups against the RNAcentral domain of EBI Search.
//!
//! Prints dictionary info, entries by id, or text matches as pretty JSON.

mod transport;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rnacentral_core::{
    Dictionary, DictionaryConfig, EntryOptions, MatchOptions, RnaCentralClient,
    RnaCentralDictionary, ZSelector,
};
use tracing_subscriber::EnvFilter;

use crate::transport::UreqTransport;

#[derive(Debug, Parser)]
#[command(name = "rnacentral-lookup", version, about = "Look up RNAcentral records through EBI Search")]
struct Cli {
    /// EBI Search base URL for the rnacentral domain.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// JSON configuration file; `--base-url` overrides its base.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the dictionary record.
    Info,
    /// Fetch entries by id, or browse all entries when no id is given.
    Entries {
        /// Record id or record URL. Repeatable.
        #[arg(long = "id")]
        ids: Vec<String>,
        /// `id`, `dictID` or `str`.
        #[arg(long)]
        sort: Option<String>,
        #[command(flatten)]
        paging: Paging,
    },
    /// Search entries by free text.
    Match {
        text: String,
        #[command(flatten)]
        paging: Paging,
    },
}

#[derive(Debug, Args)]
struct Paging {
    #[arg(long)]
    page: Option<usize>,
    #[arg(long)]
    per_page: Option<usize>,
    /// Extra field to keep (`obsolete`, `databases`, `RNAtype`, `species`).
    /// Repeatable; all are kept when omitted.
    #[arg(long = "z")]
    z: Vec<String>,
}

impl Paging {
    fn selector(&self) -> ZSelector {
        if self.z.is_empty() {
            ZSelector::All
        } else {
            ZSelector::only(self.z.iter().cloned())
        }
    }
}

fn load_config(cli: &Cli) -> Result<DictionaryConfig> {
    let config = match &cli.config {
        Some(path) => {
            let doc = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            DictionaryConfig::from_json(&doc).with_context(|| format!("parsing {}", path.display()))?
        }
        None => DictionaryConfig::default(),
    };
    Ok(match &cli.base_url {
        Some(base_url) => config.rebased(base_url),
        None => config,
    })
}

fn run(cli: Cli) -> Result<serde_json::Value> {
    let config = load_config(&cli)?;
    let dict = RnaCentralDictionary::new(RnaCentralClient::new(config), UreqTransport::new());

    let output = match cli.command {
        Command::Info => serde_json::to_value(dict.dictionary_info())?,
        Command::Entries { ids, sort, paging } => {
            let options = EntryOptions {
                sort,
                page: paging.page,
                per_page: paging.per_page,
                z: paging.selector(),
                ..EntryOptions::with_ids(ids)
            };
            serde_json::to_value(dict.get_entries(&options).context("entry lookup failed")?)?
        }
        Command::Match { text, paging } => {
            let options = MatchOptions {
                page: paging.page,
                per_page: paging.per_page,
                z: paging.selector(),
            };
            serde_json::to_value(
                dict.get_matches_for_text(&text, &options)
                    .context("text search failed")?,
            )?
        }
    };
    Ok(output)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let output = run(Cli::parse())?;
    if let Some(items) = output.get("items").and_then(|items| items.as_array()) {
        tracing::info!(results = items.len(), "done");
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
