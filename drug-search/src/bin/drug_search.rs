use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use drug_search::{
    Activation, ClientConfig, HttpTransport, InMemoryPage, SearchHandler, render_document,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Look up a brand drug against the search endpoint and print the rendered result
#[derive(Parser, Debug)]
#[command(name = "drug-search", version, about)]
struct Args {
    /// Brand drug name typed into the search box
    #[arg(default_value = "")]
    query: String,

    /// Search endpoint (defaults to DRUG_SEARCH_ENDPOINT or http://localhost:5000/search)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Also write a standalone HTML page with the result to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "drug_search=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args
        .endpoint
        .map(ClientConfig::new)
        .unwrap_or_else(ClientConfig::from_env);
    info!("Using search endpoint {}", config.endpoint);

    let page = Arc::new(InMemoryPage::with_query(args.query.clone()));
    let handler = SearchHandler::new(page.clone(), Arc::new(HttpTransport::new(&config)));

    let activation = handler.activate().await;
    if let Activation::Rejected = activation {
        for notice in page.notices() {
            eprintln!("{}", notice);
        }
        return Ok(ExitCode::from(exit_status(&activation)));
    }

    let target = page.target();
    println!("{}", target.as_str());

    if let Some(path) = args.output {
        let document = render_document(args.query.trim(), &target)?;
        std::fs::write(&path, document)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote result page to {}", path.display());
    }

    Ok(ExitCode::from(exit_status(&activation)))
}

/// 0 when result boxes were rendered, 1 when an error text was rendered, 2 for an empty query
fn exit_status(activation: &Activation) -> u8 {
    match activation {
        Activation::Rendered | Activation::Superseded => 0,
        Activation::Failed(_) => 1,
        Activation::Rejected => 2,
    }
}
