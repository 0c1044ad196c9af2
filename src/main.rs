use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use chatrisk::config::{self, ChatRiskConfig};
use chatrisk::ingest;
use chatrisk::output::{json as json_out, table};
use chatrisk::pipeline::filters::{parse_date, RecordFilters, TimeWindow};
use chatrisk::pipeline::{EnrichedRecord, Pipeline};

#[derive(Parser)]
#[command(name = "chatrisk", version, about = "Risk triage over helpline chat transcripts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to config file (default: ~/.chatrisk/config.toml)
    #[arg(long, global = true, env = "CHATRISK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct Input {
    /// Files, directories or glob patterns to read chats from
    paths: Vec<String>,

    /// Read chats from stdin
    #[arg(long)]
    stdin: bool,

    /// Force format: json, yaml, text
    #[arg(long)]
    format: Option<String>,
}

#[derive(Args)]
struct FilterArgs {
    /// Created on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Created on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,

    /// Time-of-day window, may wrap midnight (e.g. 21:00-02:00)
    #[arg(long)]
    time: Option<String>,

    /// Filter by antenna
    #[arg(long)]
    antenna: Option<String>,

    /// Filter by volunteer location
    #[arg(long)]
    location: Option<String>,

    /// Case-insensitive text search in the transcript
    #[arg(long)]
    search: Option<String>,

    /// Restrict to one chat id
    #[arg(long)]
    chat: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Preliminary keyword scan: shortlist potentially abusive chats
    Flag {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        filters: FilterArgs,

        /// Maximum shortlist entries to show
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Full risk analysis of selected chats
    Analyze {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        filters: FilterArgs,

        /// Chat ids to analyze (comma separated)
        #[arg(long, value_delimiter = ',')]
        ids: Vec<i64>,

        /// Analyze every flagged chat instead of explicit ids
        #[arg(long, conflicts_with = "ids")]
        all_flagged: bool,

        /// With --all-flagged, minimum preliminary score
        #[arg(long, default_value = "1")]
        min_score: usize,
    },

    /// Resolve an operator id to name and volunteer location
    Operator {
        /// Operator id as found in the export
        id: String,
    },

    /// Resolve the antenna a chat was routed from
    Antenna {
        /// Department label of the chat
        #[arg(long)]
        department: String,

        /// System routing message
        #[arg(long)]
        message: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a commented template to ~/.chatrisk/config.toml
    Init,
    /// Print the effective configuration
    Show,
    /// Print the default config file path
    Path,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_output = cli.json;

    if let Commands::Config { action } = &cli.command {
        return run_config(action, cli.config.as_deref(), json_output);
    }

    let config = ChatRiskConfig::load(cli.config.as_deref())?;
    let pipeline = Pipeline::new(&config).context("Invalid configuration")?;

    match cli.command {
        Commands::Flag {
            input,
            filters,
            limit,
        } => {
            let records = load_records(&pipeline, &input, &filters)?;
            let mut shortlist = pipeline.shortlist(&records);
            shortlist.entries.truncate(limit);
            if json_output {
                json_out::print_json(&shortlist)?;
            } else {
                table::print_shortlist(&shortlist);
            }
        }

        Commands::Analyze {
            input,
            filters,
            ids,
            all_flagged,
            min_score,
        } => {
            let records = load_records(&pipeline, &input, &filters)?;
            let selected: Vec<i64> = if all_flagged {
                pipeline
                    .shortlist(&records)
                    .entries
                    .iter()
                    .filter(|e| e.candidate.preliminary_score >= min_score)
                    .map(|e| e.candidate.id)
                    .collect()
            } else if ids.is_empty() {
                bail!("No chats selected. Use --ids 1,2,3 or --all-flagged.");
            } else {
                ids
            };

            let analyses = pipeline.analyze_selected(&records, &selected);
            if json_output {
                json_out::print_json(&analyses)?;
            } else {
                table::print_analyses(&analyses);
            }
        }

        Commands::Operator { id } => {
            let identity = pipeline.identity().resolve_operator_str(&id);
            if json_output {
                json_out::print_json(&identity)?;
            } else {
                match id.trim().parse::<i64>() {
                    Ok(n) => table::print_operator(n, &identity),
                    Err(_) => println!("{} ({})", identity.canonical_name, identity.branch_label),
                }
            }
        }

        Commands::Antenna {
            department,
            message,
        } => {
            let antenna = pipeline.resolve_antenna(message.as_deref(), Some(department.as_str()));
            if json_output {
                json_out::print_json(&serde_json::json!({
                    "department": department,
                    "message": message,
                    "antenna": antenna,
                }))?;
            } else {
                println!("{antenna}");
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn run_config(action: &ConfigAction, path: Option<&std::path::Path>, json_output: bool) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let target = config::config_path()?;
            if config::init_config()? {
                println!("Created {}", target.display());
            } else {
                println!("Config already exists: {}", target.display());
            }
        }
        ConfigAction::Show => {
            let config = ChatRiskConfig::load(path)?;
            if json_output {
                json_out::print_json(&config)?;
            } else {
                print!("{}", config.to_toml()?);
            }
        }
        ConfigAction::Path => {
            let target = match path {
                Some(p) => p.to_path_buf(),
                None => config::config_path()?,
            };
            println!("{}", target.display());
        }
    }
    Ok(())
}

fn load_records(pipeline: &Pipeline, input: &Input, filters: &FilterArgs) -> Result<Vec<EnrichedRecord>> {
    let format = input
        .format
        .as_deref()
        .map(|f| {
            ingest::Format::parse(f).with_context(|| format!("Unknown format: {f}. Use: json, yaml, text"))
        })
        .transpose()?;

    let records = if input.stdin {
        ingest::load_stdin(format)?
    } else if input.paths.is_empty() {
        bail!("No paths provided. Use --stdin to read from stdin.");
    } else {
        ingest::load_paths(&input.paths, format)?
    };

    let filters = RecordFilters {
        from_date: filters.from.as_deref().map(parse_date).transpose()?,
        to_date: filters.to.as_deref().map(parse_date).transpose()?,
        time_window: filters.time.as_deref().map(str::parse::<TimeWindow>).transpose()?,
        antenna: filters.antenna.clone(),
        volunteer_location: filters.location.clone(),
        text: filters.search.clone(),
        chat_id: filters.chat,
    };
    Ok(filters.apply(pipeline.enrich(records)))
}
