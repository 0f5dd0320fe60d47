mod document;
mod error;
mod model;
mod parser;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use tracing::info;

use settings::Settings;

#[derive(Parser)]
#[command(
    name = "directive-extractor",
    about = "Extract component directives from API documentation pages"
)]
struct Cli {
    /// Language of the docs, e.g. zh-CN or en-US (default: MAGIC_LANG or the config file)
    #[arg(short, long)]
    lang: Option<String>,
    /// Settings file overriding the built-in rule tables
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
    /// Doc files or glob patterns, processed in the given order
    #[arg(required = true)]
    paths: Vec<String>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    let lang = cli
        .lang
        .or_else(|| settings.lang.clone())
        .context("no language given (use --lang or MAGIC_LANG)")?;

    let paths = expand_paths(&cli.paths)?;
    if paths.is_empty() {
        eprintln!("No documents matched.");
        return Ok(());
    }
    info!("Extracting {} documents ({})", paths.len(), lang);

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    let directives = parser::make_directives_with(&lang, &paths, &settings.rules, |path| {
        pb.set_message(path.display().to_string());
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    let json = if cli.pretty {
        serde_json::to_string_pretty(&directives)?
    } else {
        serde_json::to_string(&directives)?
    };
    match &cli.output {
        Some(out) => std::fs::write(out, json)
            .with_context(|| format!("failed to write {}", out.display()))?,
        None => println!("{}", json),
    }

    eprintln!(
        "Extracted {} directives from {} files in {:.1}s",
        directives.len(),
        paths.len(),
        t0.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Expand glob patterns in place; plain paths pass through. A file named
/// twice is only processed the first time.
fn expand_paths(args: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for arg in args {
        if arg.contains(['*', '?', '[']) {
            let entries =
                glob::glob(arg).with_context(|| format!("invalid glob pattern {}", arg))?;
            for entry in entries {
                out.push(entry?);
            }
        } else {
            out.push(PathBuf::from(arg));
        }
    }
    Ok(out.into_iter().unique().collect())
}
