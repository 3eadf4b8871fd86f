mod config;
mod errors;
mod layout;
mod loader;
mod models;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::errors::CvError;
use crate::layout::{build_story, create_styles, default_page_config, resolve_links, PALETTE};
use crate::render::{background_painter, render_document, DocumentMeta};

/// Render a résumé described in YAML (or JSON) as a styled, paginated PDF.
#[derive(Debug, Parser)]
#[command(name = "cvgen", version, about)]
struct Cli {
    /// Résumé file to read. Defaults to `cv_data.yaml` (or `CV_DEFAULT_INPUT`).
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    let config = Config::from_env();

    // Logs go to stderr; stdout carries only the result line
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let input = cli.input.unwrap_or_else(|| config.default_input.clone());
    info!("cvgen v{} reading {}", env!("CARGO_PKG_VERSION"), input.display());

    let record = match loader::load_resume(&input) {
        Ok(record) => record,
        Err(CvError::InputNotFound(path)) => {
            println!("ERROR: File '{}' not found.", path.display());
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let page = default_page_config();
    let styles = create_styles(PALETTE);
    let links = resolve_links(&record.contact, &config.links);
    let story = build_story(&record, &styles, &page, &links);

    let meta = DocumentMeta {
        title: record.name.clone(),
        author: Some(record.name.clone()),
    };
    let bytes = render_document(
        &story,
        &styles,
        &page,
        &background_painter(styles.palette.background),
        &meta,
    )
    .map_err(CvError::from)?;

    std::fs::write(&config.output, &bytes)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    println!("PDF successfully generated: {}", config.output.display());
    Ok(())
}
