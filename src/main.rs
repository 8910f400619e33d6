use std::path::PathBuf;

use clap::{Parser, Subcommand};

use yarn_mappings::config::{MappingsConfig, log_path};
use yarn_mappings::mapping::{EntryKind, MappingEntry, NamingScheme};
use yarn_mappings::yarn::handler::MappingHandler;

#[derive(Parser)]
#[command(name = "yarn-mappings")]
#[command(version, about = "Look up Yarn mappings for a product version")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find mapping entries by name
    Lookup {
        /// Product version, e.g. 1.20.1
        version: String,
        /// class, method or field
        kind: EntryKind,
        /// Name (or name suffix) to look for
        text: String,
        /// Only match names in this scheme (official, intermediary, named)
        #[arg(long)]
        scheme: Option<NamingScheme>,
        /// Case-insensitive full-name match instead of suffix match
        #[arg(long)]
        exact: bool,
    },
    /// Make sure the mappings of a version are downloaded and cached
    Refresh {
        version: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => MappingsConfig::load(path)?,
        None => MappingsConfig::default(),
    };
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir;
    }

    let _guard = yarn_mappings::logging::init(&log_path(&config.data_dir()))?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(config, cli.command))
}

async fn run(config: MappingsConfig, command: Command) -> anyhow::Result<()> {
    let handler = MappingHandler::from_config(&config);

    match command {
        Command::Lookup {
            version,
            kind,
            text,
            scheme,
            exact,
        } => {
            let hits = if exact {
                handler.lookup_exact(scheme, kind, &version, &text).await?
            } else {
                handler.lookup_suffix(scheme, kind, &version, &text).await?
            };

            if hits.is_empty() {
                println!("No {} mappings matching {:?} in {}", kind, text, version);
            }
            for entry in &hits {
                println!("{}", format_entry(entry));
            }
        }
        Command::Refresh { version } => {
            let entries = handler.coordinator().ensure_fresh(&version).await?;
            println!("{} mapping entries cached for {}", entries.len(), version);
        }
    }

    Ok(())
}

fn format_entry(entry: &MappingEntry) -> String {
    let name = |scheme: NamingScheme| scheme.name_of(entry).unwrap_or("-").to_string();
    let mut line = format!(
        "{}\t{}\t{}\t{}",
        entry.kind,
        name(NamingScheme::Official),
        name(NamingScheme::Intermediary),
        name(NamingScheme::Named)
    );
    if let Some(owner) = &entry.owner {
        line.push_str(&format!("\tin {}", owner));
    }
    line
}
