use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use vultr_lookup::config::Config;
use vultr_lookup::resource::{self, AttributeType, FilterClause, FilterSpec, Kind, LookupError};
use vultr_lookup::vultr::auth::VultrCredentials;
use vultr_lookup::vultr::client::VultrClient;
use vultr_lookup::vultr::http::format_api_error;

/// Resolve a single Vultr resource from attribute filters
#[derive(Parser, Debug)]
#[command(name = "vultr-lookup", version = vultr_lookup::VERSION, about, long_about = None)]
struct Args {
    /// Vultr API key (defaults to $VULTR_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Vultr API endpoint (defaults to $VULTR_API_URL or https://api.vultr.com/v2)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find exactly one resource matching every filter
    Lookup {
        /// Resource kind (see `kinds`)
        kind: Kind,

        /// Filter as NAME=VALUE[,VALUE...]; repeat to AND filters together.
        /// A bare NAME= matches the empty string
        #[arg(short, long = "filter", value_name = "NAME=VALUES")]
        filters: Vec<FilterClause>,

        /// Parent scope for scoped kinds (the domain for dns_record)
        #[arg(long)]
        scope: Option<String>,
    },

    /// Read one resource by id
    Get {
        /// Resource kind (see `kinds`)
        kind: Kind,

        /// Resource id
        id: String,

        /// Parent scope for scoped kinds (the domain for dns_record)
        #[arg(long)]
        scope: Option<String>,
    },

    /// List supported resource kinds and their filterable attributes
    Kinds,

    /// Persist settings to the config file
    Config {
        /// Page size for list calls
        #[arg(long)]
        per_page: Option<u32>,

        /// Hard cap on pages per lookup
        #[arg(long)]
        max_pages: Option<usize>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

/// One row of `kinds` output
#[derive(Serialize)]
struct KindSummary {
    kind: &'static str,
    display_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'static str>,
    readable_by_id: bool,
    attributes: Vec<AttributeSummary>,
}

#[derive(Serialize)]
struct AttributeSummary {
    name: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let rust_log = std::env::var("RUST_LOG").ok().filter(|s| !s.is_empty());
    let filter = match (rust_log, level.to_tracing_level()) {
        (Some(directives), _) => EnvFilter::new(directives),
        (None, Some(tracing_level)) => EnvFilter::default().add_directive(LevelFilter::from_level(tracing_level).into()),
        (None, None) => return None,
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("vultr-lookup {} started with log level: {:?}", vultr_lookup::VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("vultr-lookup").join("vultr-lookup.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".vultr-lookup").join("vultr-lookup.log");
    }
    PathBuf::from("vultr-lookup.log")
}

fn print_output<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn build_client(args: &Args, config: &Config) -> Result<VultrClient> {
    let credentials =
        VultrCredentials::resolve(args.api_key.as_deref(), config.api_key.as_deref())?;
    let base_url = config.effective_base_url(args.base_url.as_deref());
    tracing::info!("Using Vultr API at {}", base_url);
    VultrClient::new(credentials, &base_url, config.effective_timeout())
}

/// Attach the short API hint (e.g. "Check VULTR_API_KEY") to an error
fn with_api_hint(error: anyhow::Error) -> anyhow::Error {
    let hint = format_api_error(&error);
    error.context(hint)
}

fn attribute_type_name(kind: AttributeType) -> &'static str {
    match kind {
        AttributeType::String => "string",
        AttributeType::Int => "int",
        AttributeType::Float => "float",
        AttributeType::Bool => "bool",
        AttributeType::List => "list",
    }
}

fn kind_summaries() -> Vec<KindSummary> {
    resource::get_all_resource_keys()
        .into_iter()
        .filter_map(|key| resource::get_resource(key).map(|def| (key, def)))
        .map(|(key, def)| KindSummary {
            kind: key,
            display_name: &def.display_name,
            scope: def.scope.as_deref(),
            readable_by_id: def.get_key.is_some(),
            attributes: def
                .attributes
                .iter()
                .map(|a| AttributeSummary {
                    name: &a.name,
                    kind: attribute_type_name(a.kind),
                })
                .collect(),
        })
        .collect()
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();

    match &args.command {
        Command::Lookup {
            kind,
            filters,
            scope,
        } => {
            // Validate the filter before touching credentials or the network
            let spec: FilterSpec = filters.iter().cloned().collect();
            let def = resource::definition(kind.key())?;
            resource::Predicate::compile_for(&spec, kind.key(), &def.attribute_names())?;

            let client = build_client(&args, &config)?;
            let state = match resource::lookup_kind(
                *kind,
                &client,
                scope.as_deref(),
                &spec,
                config.lookup_options(),
            )
            .await
            {
                Ok(state) => state,
                Err(e @ LookupError::UpstreamList { .. }) => return Err(with_api_hint(e.into())),
                Err(e) => return Err(e.into()),
            };
            print_output(&state, args.output)
        }
        Command::Get { kind, id, scope } => {
            let client = build_client(&args, &config)?;
            match resource::read_kind(*kind, &client, scope.as_deref(), id).await {
                Ok(Some(state)) => print_output(&state, args.output),
                Ok(None) => anyhow::bail!("{} {} not found", kind, id),
                Err(e) => Err(with_api_hint(e)),
            }
        }
        Command::Kinds => print_output(&kind_summaries(), args.output),
        Command::Config {
            per_page,
            max_pages,
            timeout_secs,
        } => {
            if let Some(base_url) = &args.base_url {
                config.base_url = Some(base_url.clone());
            }
            if per_page.is_some() {
                config.per_page = *per_page;
            }
            if max_pages.is_some() {
                config.max_pages = *max_pages;
            }
            if timeout_secs.is_some() {
                config.timeout_secs = *timeout_secs;
            }
            config.save().context("Failed to save configuration")?;
            let shown = Config {
                api_key: None,
                ..config
            };
            print_output(&shown, args.output)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
