use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mdframe::config::{get_settings_path, Config, MetadataFormat, Settings};
use mdframe::output;
use mdframe::query::{collect, Mode, Query};
use mdframe::record::load_records_with_progress;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mdframe")]
#[command(about = "Query food-scan metadata files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v warn, -vv info, -vvv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and print every record
    Show {
        #[command(flatten)]
        source: SourceArgs,

        /// Print records as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Print identifiers of records matching a query
    Query {
        #[command(flatten)]
        source: SourceArgs,

        /// Field -> value mapping as JSON, e.g. '{"weight": 321}'
        #[arg(short, long, conflicts_with = "query_file", required_unless_present = "query_file")]
        query: Option<String>,

        /// Read the JSON query from a file
        #[arg(short = 'f', long)]
        query_file: Option<PathBuf>,

        /// Every field must match (default)
        #[arg(long, conflicts_with_all = ["or", "mode"])]
        and: bool,

        /// At least one field must match
        #[arg(long, conflicts_with = "mode")]
        or: bool,

        /// Combination mode by name (and/all, or/any)
        #[arg(long, value_name = "MODE")]
        mode: Option<Mode>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that every metadata file loads and satisfies the schema
    Validate {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Show or change persisted settings
    Settings {
        /// Default schema path
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Forget the default schema path
        #[arg(long, conflicts_with = "schema")]
        clear_schema: bool,

        /// Descend into subdirectories by default
        #[arg(long)]
        recursive: Option<bool>,

        /// Colored output
        #[arg(long)]
        color: Option<bool>,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Directory containing the metadata files
    #[arg(short = 'd', long, default_value = ".")]
    directory: PathBuf,

    /// JSON schema used to validate metadata files
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Extension of the metadata files
    #[arg(short = 'm', long, default_value = "toml", value_parser = parse_metadata_ext)]
    metadata_ext: MetadataFormat,
}

impl SourceArgs {
    fn to_config(&self, settings: &Settings) -> Config {
        let mut config = Config::new(&self.directory)
            .with_format(self.metadata_ext)
            .with_recursive(self.recursive);
        if let Some(schema) = &self.schema {
            config = config.with_schema(schema);
        }
        settings.apply(&mut config);
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load()?;
    let color = settings.color && !cli.no_color;

    match cli.command {
        Commands::Show { source, json } => {
            let config = source.to_config(&settings);
            let records = load_records_with_progress(&config, json)?;
            if json {
                output::print_records_json(&records)?;
            } else {
                output::print_records(&records, color)?;
            }
        }
        Commands::Query {
            source,
            query,
            query_file,
            and: _,
            or,
            mode,
            json,
        } => {
            let mode = match mode {
                Some(mode) => mode,
                None if or => Mode::Or,
                None => Mode::And,
            };
            let raw = match (query, query_file) {
                (Some(raw), _) => raw,
                (None, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read query file {}", path.display()))?,
                (None, None) => anyhow::bail!("No query given"),
            };
            let query = Query::parse(mode, &raw)?;

            let config = source.to_config(&settings);
            let records = load_records_with_progress(&config, true)?;
            let outcome = collect(&records, &query);

            if json {
                output::print_outcome_json(&outcome)?;
            } else {
                output::print_outcome(&outcome, color)?;
            }
        }
        Commands::Validate { source } => {
            let config = source.to_config(&settings);
            let records = load_records_with_progress(&config, false)?;
            println!(
                "{} records in {} are valid",
                records.len(),
                config.data_dir.display()
            );
        }
        Commands::Settings {
            schema,
            clear_schema,
            recursive,
            color,
        } => {
            let mut settings = settings;
            let changed = schema.is_some() || clear_schema || recursive.is_some() || color.is_some();

            if let Some(path) = schema {
                settings.schema_path = Some(path);
            }
            if clear_schema {
                settings.schema_path = None;
            }
            if let Some(recursive) = recursive {
                settings.recursive = recursive;
            }
            if let Some(color) = color {
                settings.color = color;
            }
            if changed {
                settings.save()?;
            }

            println!("Settings file: {}", get_settings_path()?.display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

fn parse_metadata_ext(ext: &str) -> std::result::Result<MetadataFormat, String> {
    MetadataFormat::from_extension(ext.trim_start_matches('.'))
        .ok_or_else(|| format!("unsupported metadata extension `{}` (expected toml)", ext))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
