use crate::config::{ExportConfig, DEFAULT_MAX_DEPTH};
use crate::error::Error;
use crate::exporter::Exporter;
use crate::introspection::source::SourceIntrospector;
use crate::introspection::ProviderChain;
use crate::parser::AstParser;
use crate::registry::RouteRegistry;
use crate::scanner::SourceScanner;
use crate::serializer::{serialize_json, serialize_yaml};
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::str::FromStr;

/// API Inspector - export REST routes as a Postman collection
#[derive(Parser, Debug)]
#[command(name = "api-inspector")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect the API surface and export it (only `rest` is supported)
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// API type to inspect
    #[arg(value_name = "TYPE")]
    pub api_type: String,

    /// Route registry file (YAML, or JSON with a .json extension)
    #[arg(short = 'r', long = "registry", value_name = "FILE", default_value = "webapi.yaml")]
    pub registry: PathBuf,

    /// Rust source file or directory declaring the service and data types (repeatable)
    #[arg(short = 's', long = "source", value_name = "PATH")]
    pub sources: Vec<PathBuf>,

    /// Directory the collection file is written to
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = "var")]
    pub output_dir: PathBuf,

    /// Collection name
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Maximum nesting depth of example request bodies
    #[arg(long = "max-depth", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Print the collection itself instead of the path it was written to
    #[arg(long = "stdout")]
    pub stdout: bool,

    /// Format of the collection printed with --stdout (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON format, as written to the collection file
    Json,
    /// YAML format
    Yaml,
}

/// Kinds of API the inspector can export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    Rest,
}

impl FromStr for ApiKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let kind = s.trim().to_lowercase();
        match kind.as_str() {
            "rest" => Ok(ApiKind::Rest),
            _ => Err(Error::UnsupportedRequestKind(kind)),
        }
    }
}

/// Run the parsed command
pub fn run(args: CliArgs) -> Result<()> {
    debug!("Parsed arguments: {:?}", args);

    match args.command {
        Command::Inspect(inspect) => {
            let output = run_inspect(&inspect)?;
            println!("{}", output);
        }
    }
    Ok(())
}

/// Runs `inspect` and returns what should be printed
pub fn run_inspect(args: &InspectArgs) -> Result<String> {
    let kind: ApiKind = args.api_type.parse()?;
    info!("Inspecting {:?} API", kind);

    let registry = RouteRegistry::from_path(&args.registry)?;

    // registry-declared types answer first, source code fills in the rest
    let mut provider = ProviderChain::new();
    if !registry.type_table().is_empty() {
        provider.push(Box::new(registry.type_table().clone()));
    }
    if !args.sources.is_empty() {
        info!("Scanning {} source path(s)...", args.sources.len());
        let scan = SourceScanner::new(args.sources.clone()).scan()?;
        for warning in &scan.warnings {
            warn!("{}", warning);
        }
        let parsed = AstParser::parse_all(&scan.source_files);
        let introspector = SourceIntrospector::new(&parsed);
        info!(
            "Indexed {} types from {} files",
            introspector.type_count(),
            parsed.len()
        );
        provider.push(Box::new(introspector));
    }
    if provider.is_empty() {
        warn!("No type information available; request bodies will be empty");
    }

    let mut config = ExportConfig::default()
        .with_output_dir(args.output_dir.clone())
        .with_max_depth(args.max_depth);
    if let Some(name) = &args.name {
        config = config.with_collection_name(name.clone());
    }

    let exporter = Exporter::new(&registry, &provider, config);

    if args.stdout {
        let document = exporter.build_collection();
        info!("Serializing to {:?} format...", args.output_format);
        let content = match args.output_format {
            OutputFormat::Json => serialize_json(&document)?,
            OutputFormat::Yaml => serialize_yaml(&document)?,
        };
        return Ok(content);
    }

    let path = exporter.export()?;
    info!("Collection written to {}", path.display());
    Ok(serde_json::to_string(&path.display().to_string())?)
}
