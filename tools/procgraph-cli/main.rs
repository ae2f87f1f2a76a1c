use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use procgraph::format::{Importer, export_to_with};
use procgraph::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// CLI-specific format enums for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormatCli {
    Native,
    Markup,
    Bpmn,
    Csv,
}

impl From<ExportFormatCli> for ExportFormat {
    fn from(format: ExportFormatCli) -> Self {
        match format {
            ExportFormatCli::Native => ExportFormat::Native,
            ExportFormatCli::Markup => ExportFormat::Markup,
            ExportFormatCli::Bpmn => ExportFormat::Interchange,
            ExportFormatCli::Csv => ExportFormat::Tabular,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImportFormatCli {
    Native,
    Markup,
}

impl From<ImportFormatCli> for ImportFormat {
    fn from(format: ImportFormatCli) -> Self {
        match format {
            ImportFormatCli::Native => ImportFormat::Native,
            ImportFormatCli::Markup => ImportFormat::Markup,
        }
    }
}

/// Validate, convert and compare process definitions
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional TOML engine configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Read inputs as editor canvas graphs (`{"nodes": [...], "edges": [...]}`)
    #[arg(long, global = true)]
    canvas: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a definition and print the report
    Validate { file: PathBuf },
    /// Export a definition to another format
    Export {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value = "native")]
        format: ExportFormatCli,
        /// Output path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a native or markup document and print the result
    Import {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value = "native")]
        format: ImportFormatCli,
        #[arg(long)]
        auto_correct: bool,
        #[arg(long)]
        validate: bool,
    },
    /// Show what changed between two definitions
    Diff { before: PathBuf, after: PathBuf },
    /// Print an SVG data URI preview
    Thumbnail {
        file: PathBuf,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EngineConfig::default(),
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(config.log.level.as_str()))
        .init();

    match cli.command {
        Command::Validate { file } => run_validate(&config, &file, cli.canvas),
        Command::Export {
            file,
            format,
            output,
        } => run_export(&config, &file, cli.canvas, format.into(), output),
        Command::Import {
            file,
            format,
            auto_correct,
            validate,
        } => {
            let mut options = config.import_options();
            options.auto_correct |= auto_correct;
            options.validate_on_import |= validate;
            run_import(&config, &file, format.into(), options)
        }
        Command::Diff { before, after } => {
            let before = load_definition(&before, cli.canvas);
            let after = load_definition(&after, cli.canvas);
            print_json(&compare(&before, &after));
        }
        Command::Thumbnail {
            file,
            width,
            height,
        } => {
            let definition = load_definition(&file, cli.canvas);
            let width = width.unwrap_or(config.thumbnail.width);
            let height = height.unwrap_or(config.thumbnail.height);
            println!("{}", generate_thumbnail(&definition, width, height));
        }
    }
}

fn run_validate(config: &EngineConfig, file: &Path, canvas: bool) {
    let definition = load_definition(file, canvas);
    let start = Instant::now();
    let report = config.validator().validate_definition(&definition);
    let duration = start.elapsed();

    for finding in report.findings() {
        println!("{}", finding);
    }
    println!("\n--- Validation Summary ---");
    println!("Nodes:     {}", definition.nodes.len());
    println!("Flows:     {}", definition.flows.len());
    println!("Errors:    {}", report.errors.len());
    println!("Warnings:  {}", report.warnings.len());
    println!("Score:     {}", report.score);
    println!("Duration:  {:?}", duration);

    if !report.is_valid {
        std::process::exit(2);
    }
}

fn run_export(
    config: &EngineConfig,
    file: &Path,
    canvas: bool,
    format: ExportFormat,
    output: Option<PathBuf>,
) {
    let (definition, metadata) = load_document(file, canvas);
    let encoded = export_to_with(
        format,
        &definition,
        metadata.as_ref(),
        &config.export_options(),
        &config.validator(),
    )
    .unwrap_or_else(|e| exit_with_error(&format!("Export failed: {}", e)));

    match output {
        Some(path) => {
            fs::write(&path, encoded).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path.display(), e))
            });
            eprintln!("Wrote {} ({})", path.display(), format.mime_type());
        }
        None => println!("{}", encoded),
    }
}

fn run_import(config: &EngineConfig, file: &Path, format: ImportFormat, options: ImportOptions) {
    let content = read_file(file);
    let result = Importer::new(options)
        .with_validator(config.validator())
        .import(format, &content);
    print_json(&result);
    if !result.success {
        std::process::exit(2);
    }
}

fn read_file(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read '{}': {}", path.display(), e))
    })
}

fn load_definition(path: &Path, canvas: bool) -> ProcessDefinition {
    load_document(path, canvas).0
}

/// Loads a native document, or a canvas graph when `canvas` is set.
fn load_document(path: &Path, canvas: bool) -> (ProcessDefinition, Option<ProcessMetadata>) {
    let content = read_file(path);
    if canvas {
        let graph: VisualGraph = serde_json::from_str(&content).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to parse canvas graph '{}': {}", path.display(), e))
        });
        let definition = graph
            .into_process()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert canvas graph: {}", e)));
        return (definition, None);
    }

    let result = import_from(ImportFormat::Native, &content, &ImportOptions::default());
    for warning in &result.warnings {
        eprintln!("warning: {}", warning);
    }
    match result.definition {
        Some(definition) => (definition, result.metadata),
        None => exit_with_error(&format!(
            "Failed to load '{}': {}",
            path.display(),
            result.errors.join("; ")
        )),
    }
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with_error(&format!("Failed to serialize output: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
