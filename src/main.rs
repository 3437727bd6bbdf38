use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use svgjsx::{Config, ConvertOptions, Converter, StatmProbe};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "svgjsx")]
#[command(about = "Turn SVG files into React components", long_about = None)]
struct Cli {
    /// Input file (use - for stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output file (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Write the extracted CSS module here
    #[arg(long)]
    css_output: Option<PathBuf>,

    /// Load conversion options from a JSON file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Component name (non-alphanumerics are removed)
    #[arg(short, long)]
    name: Option<String>,

    /// Precision for decimal values (0-4)
    #[arg(short, long)]
    precision: Option<u8>,

    /// Disable duplicate element removal
    #[arg(long)]
    no_remove_duplicates: bool,

    /// Disable unused definition cleanup
    #[arg(long)]
    no_cleanup_definitions: bool,

    /// Disable precision rounding
    #[arg(long)]
    no_optimize_precision: bool,

    /// Disable path simplification
    #[arg(long)]
    no_simplify_paths: bool,

    /// Disable rgb() to hex conversion
    #[arg(long)]
    no_optimize_colors: bool,

    /// Disable text trimming
    #[arg(long)]
    no_normalize_whitespace: bool,

    /// Disable empty style removal
    #[arg(long)]
    no_remove_unused_styles: bool,

    /// Merge sibling paths with the same paint (lossy)
    #[arg(long)]
    merge_paths: bool,

    /// Emit plain JSX instead of TypeScript
    #[arg(long)]
    no_typescript: bool,

    /// Do not wrap the export in memo()
    #[arg(long)]
    no_memo: bool,

    /// Keep id attributes
    #[arg(long)]
    keep_ids: bool,

    /// Keep comments as JSX comments
    #[arg(long)]
    keep_comments: bool,

    /// Leave the markup on one line
    #[arg(long)]
    no_format: bool,

    /// Keep styles inline instead of writing a CSS module
    #[arg(long)]
    no_extract_css: bool,

    /// Keep editor metadata and empty groups
    #[arg(long)]
    no_pre_optimize: bool,

    /// Use single quotes for values that contain double quotes
    #[arg(long)]
    loose_quotes: bool,

    /// Largest accepted input in bytes
    #[arg(long, env = "SVGJSX_MAX_FILE_SIZE", default_value_t = Config::default().max_document_size)]
    max_file_size: usize,

    /// Streaming chunk size in bytes (reserved)
    #[arg(long, env = "SVGJSX_CHUNK_SIZE", default_value_t = Config::default().chunk_size)]
    chunk_size: usize,

    /// Run large conversions on a worker thread
    #[arg(long, env = "SVGJSX_WORKER", default_value_t = true, action = clap::ArgAction::Set)]
    worker: bool,

    /// Print size comparison and metrics
    #[arg(short, long)]
    stats: bool,

    /// Print the full conversion report as JSON to stderr
    #[arg(long)]
    json_report: bool,

    /// Log pass details (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.config {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => ConvertOptions::default(),
        };

        let cleaning = &mut options.cleaning;
        if let Some(precision) = self.precision {
            cleaning.precision = precision;
        }
        cleaning.remove_duplicates &= !self.no_remove_duplicates;
        cleaning.cleanup_definitions &= !self.no_cleanup_definitions;
        cleaning.optimize_precision &= !self.no_optimize_precision;
        cleaning.simplify_paths &= !self.no_simplify_paths;
        cleaning.optimize_colors &= !self.no_optimize_colors;
        cleaning.normalize_whitespace &= !self.no_normalize_whitespace;
        cleaning.remove_unused_styles &= !self.no_remove_unused_styles;
        cleaning.merge_paths |= self.merge_paths;

        let generation = &mut options.generation;
        if let Some(name) = &self.name {
            generation.component_name = name.clone();
        }
        generation.emit_type_annotations &= !self.no_typescript;
        generation.wrap_in_memoization &= !self.no_memo;
        generation.strip_identifiers &= !self.keep_ids;
        generation.strip_comments &= !self.keep_comments;
        generation.pretty_print &= !self.no_format;
        generation.extract_stylesheet &= !self.no_extract_css;
        generation.pre_optimize &= !self.no_pre_optimize;
        generation.normalize_quoting &= !self.loose_quotes;

        Ok(options)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    // Read input
    let input = if cli.input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&cli.input)?
    };

    let options = cli.options()?;
    let config = Config {
        max_document_size: cli.max_file_size,
        chunk_size: cli.chunk_size,
        enable_worker: cli.worker,
        ..Config::default()
    };
    let converter = Converter::new(config).with_probe(StatmProbe);

    let conversion = converter.convert(&input, &options)?;
    let artifact = &conversion.artifact;

    // Write output
    if cli.output.as_os_str() == "-" {
        io::stdout().write_all(artifact.component.as_bytes())?;
    } else {
        fs::write(&cli.output, &artifact.component)?;
    }

    match (&cli.css_output, &artifact.stylesheet) {
        (Some(path), Some(css)) => fs::write(path, css)?,
        (None, Some(_)) => {
            tracing::warn!("Styles were extracted but --css-output was not given; the CSS module is discarded")
        }
        _ => {}
    }

    if cli.stats {
        if let Some(cleaning) = &conversion.cleaning {
            eprintln!(
                "{} -> {} bytes ({:.1}% smaller), {} elements removed",
                input.len(),
                cleaning.cleaned_svg.len(),
                cleaning.size_reduction,
                cleaning.removed_elements
            );
            for optimization in &cleaning.optimizations {
                eprintln!("  {}", optimization);
            }
        }
        let (before, after) = (&conversion.input_metrics, &conversion.output_metrics);
        eprintln!(
            "elements {} -> {}, paths {} -> {}, groups {} -> {}",
            before.element_count,
            after.element_count,
            before.path_count,
            after.path_count,
            before.group_count,
            after.group_count
        );
    }

    if cli.json_report {
        eprintln!("{}", serde_json::to_string_pretty(&conversion)?);
    }

    Ok(())
}
