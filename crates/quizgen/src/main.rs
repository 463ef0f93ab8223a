//! Quiz deck generator.
//!
//! **Usage:**
//! ```bash
//! flashdeck-quizgen --type dogbreeds --limit 30 --lang cs --output output
//! ```
//!
//! Writes `{output}/decks/{id}.json` plus pictures under `{output}/media/`.

use std::path::PathBuf;

use anyhow::Context;
use clap::builder::PossibleValuesParser;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flashdeck_quizgen::downloader::Downloader;
use flashdeck_quizgen::generator::{self, generator_for, QuizOptions};
use flashdeck_quizgen::sparql::SparqlClient;

/// Generate quiz decks from Wikidata
#[derive(Parser, Debug)]
#[command(name = "flashdeck-quizgen", version)]
struct Args {
    /// Quiz type
    #[arg(
        long = "type",
        env = "QUIZ_TYPE",
        default_value = "capitals",
        value_parser = PossibleValuesParser::new(["capitals", "dogbreeds", "catbreeds"])
    )]
    kind: String,

    /// Number of quiz items
    #[arg(long, env = "QUIZ_LIMIT", default_value_t = 50)]
    limit: usize,

    /// Label language (English is the fallback)
    #[arg(long, env = "QUIZ_LANG", default_value = "cs")]
    lang: String,

    /// Output directory
    #[arg(long, env = "QUIZ_OUTPUT", default_value = "output")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flashdeck_quizgen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.limit > 0, "--limit must be at least 1");

    let sparql = SparqlClient::new().context("building SPARQL client")?;
    let downloader = Downloader::new().context("building download client")?;
    let quiz = generator_for(&args.kind, sparql, downloader)?;

    let opts = QuizOptions {
        limit: args.limit,
        language: args.lang,
    };

    let summary = generator::run(&*quiz, &opts, &args.output)
        .await
        .with_context(|| format!("generating {} quiz", args.kind))?;

    tracing::info!(
        deck_id = %summary.deck_id,
        cards = summary.cards,
        with_picture = summary.with_picture,
        deck = %summary.deck_path.display(),
        media = %summary.media_dir.display(),
        "Quiz deck written"
    );

    Ok(())
}
