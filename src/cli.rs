use crate::config::{Config, load_config};
use crate::render::write_output_svg;
use crate::render_languages_svg;
use crate::theme::CardTheme;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "langcloud", version, about = "Render a most-used-languages word-cloud card")]
pub struct Args {
    /// Language data JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file (theme, themeVariables, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Account name shown in the attribution line
    #[arg(short = 'u', long = "user")]
    pub user: String,

    /// Theme preset (dark or light)
    #[arg(short = 't', long = "theme")]
    pub theme: Option<String>,

    /// Card title
    #[arg(long = "title")]
    pub title: Option<String>,

    /// Card width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Card height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Maximum number of languages shown
    #[arg(short = 'l', long = "limit")]
    pub limit: Option<usize>,

    /// Seed for the random placement phase
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Log layout decisions to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&args, &mut config);

    let input = read_input(args.input.as_deref())?;
    let svg = render_languages_svg(&input, &args.user, &config)?;
    info!(user = %args.user, bytes = svg.len(), "card rendered");

    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &config)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "langcloud=debug"
    } else {
        "langcloud=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    // SVG goes to stdout, so logs stay on stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn apply_overrides(args: &Args, config: &mut Config) {
    if let Some(theme) = args.theme.as_deref() {
        config.theme = CardTheme::named(theme);
    }
    if let Some(title) = &args.title {
        config.render.title = title.clone();
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(limit) = args.limit {
        config.render.limit = limit;
    }
    if let Some(seed) = args.seed {
        config.layout.random_seed = seed;
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
