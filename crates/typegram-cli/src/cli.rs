//! Command-line interface for the typegram utility
//!
//! Reads a JSON type manifest and renders, classifies or validates it.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::debug;

use typegram::core::logging::init_logging;
use typegram::plugins::orchestrator::Orchestrator;
use typegram::plugins::plantuml::{AdmissionFilter, NameFormatter, TypeClassifier};
use typegram::{Category, TypeUniverse};

/// Typegram - Turn type manifests into PlantUML class diagrams
#[derive(Parser)]
#[command(name = "typegram")]
#[command(about = "Render a type manifest as a PlantUML class diagram")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a type manifest as a PlantUML class diagram
    Render {
        /// Input manifest (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the diagram (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List exported types with their category
    Classify {
        /// Input manifest (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Load and validate a type manifest
    Validate {
        /// Input manifest to validate (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

/// One row of `classify` output
#[derive(Debug, Serialize)]
pub struct ClassifiedType {
    pub namespace: Option<String>,
    pub name: String,
    pub category: Category,
    pub admitted: bool,
    pub stereotypes: Vec<String>,
}

/// Main CLI application
pub struct TypegramApp {
    orchestrator: Orchestrator,
}

impl TypegramApp {
    pub fn new() -> Self {
        Self {
            orchestrator: Orchestrator::new(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("TYPEGRAM_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("TYPEGRAM_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Typegram v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render { input, output } => self.render_command(input, output, cli.verbose),
            Commands::Classify { input, json } => self.classify_command(input, json, cli.verbose),
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
        }
    }

    fn render_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let diagram = self.orchestrator.process(&content)?;
        if verbose {
            eprintln!("Rendered {} diagram lines", diagram.lines().count());
        }
        self.write_output(output, &diagram)
    }

    fn classify_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let universe = self.orchestrator.load(&content)?;
        let rows = classify(&universe)?;
        debug!(rows = rows.len(), "Classified exported types");

        if json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            for row in &rows {
                let marker = if row.admitted { ' ' } else { '-' };
                let qualified = match &row.namespace {
                    Some(namespace) => format!("{}.{}", namespace, row.name),
                    None => row.name.clone(),
                };
                let mut line = format!("{} {:<15} {}", marker, row.category.keyword(), qualified);
                if !row.stereotypes.is_empty() {
                    line.push(' ');
                    line.push_str(&row.stereotypes.concat());
                }
                println!("{}", line);
            }
        }
        Ok(())
    }

    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        match self.orchestrator.load(&content) {
            Ok(universe) => {
                println!(
                    "✓ Valid manifest: {} modules, {} types",
                    universe.modules().len(),
                    universe.len()
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid manifest: {:#}", e);
                Err(e)
            }
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

impl Default for TypegramApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify every exported type, in module order
pub fn classify(universe: &TypeUniverse) -> Result<Vec<ClassifiedType>> {
    let names = NameFormatter::new(universe);
    let classifier = TypeClassifier::new(universe);
    let admission = AdmissionFilter::new(universe);

    universe
        .exported_types()
        .into_iter()
        .map(|id| {
            let descriptor = universe.get(id)?;
            let category = classifier.classify(id)?;
            Ok(ClassifiedType {
                namespace: descriptor.namespace.clone(),
                name: names.format(id)?,
                category,
                admitted: admission.admits_type(Some(id))
                    && AdmissionFilter::admits_namespace(descriptor.namespace.as_deref()),
                stereotypes: classifier
                    .stereotypes(id, category)?
                    .iter()
                    .map(|stereotype| stereotype.to_string())
                    .collect(),
            })
        })
        .collect()
}
