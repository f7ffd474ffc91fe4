//! eco-score: command-line entrypoint.
//! Scores place-details payloads, prints baselines and checks stored records for
//! staleness. Output is JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

use eco_score_engine::{
    get_default_eco_scores, logging, score_place, EcoCategory, EcoScoreAnalyzer, EngineConfig,
    PlaceDetails, ScoreMetadata, VenueType,
};

#[derive(Parser, Debug)]
#[command(
    name = "eco-score",
    about = "Keyword-weighted eco scoring for eco-tourism venues",
    version
)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Config file (TOML or JSON); defaults to $ECO_SCORING_CONFIG_PATH or config/eco_scoring.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a place-details JSON payload (`-` reads stdin)
    Analyze(AnalyzeArgs),
    /// Score one text against one category
    Category {
        /// e.g. waste_management, localSourcing
        category: EcoCategory,
        text: String,
    },
    /// Print the baseline scores for a venue type
    Defaults {
        #[arg(default_value = "hotel")]
        venue_type: String,
    },
    /// Check whether a stored metadata record needs recomputing
    Stale {
        /// JSON file with a `metadata` object or the metadata itself (`-` reads stdin)
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    file: PathBuf,
    /// Fall back to venue-type baseline scores when nothing can be scored
    #[arg(long)]
    fallback: bool,
    /// Venue type for the fallback (inferred from the payload when omitted)
    #[arg(long)]
    venue_type: Option<VenueType>,
}

fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let cfg = match &cli.config {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::load_default()?,
    };

    match cli.command {
        Command::Analyze(args) => {
            let analyzer = EcoScoreAnalyzer::from_config(&cfg)?;
            let place = PlaceDetails::from_json_str(&read_input(&args.file)?)?;
            let result = if args.fallback {
                score_place(&analyzer, &place, args.venue_type)
            } else {
                analyzer.analyze(&place.reviews, Some(place.context()))
            };
            info!(
                target: "eco_score",
                confidence = result.metadata.confidence_level,
                scored = result.metadata.valid_scores,
                "analysis finished"
            );
            print_json(&result)
        }
        Command::Category { category, text } => {
            let analyzer = EcoScoreAnalyzer::from_config(&cfg)?;
            let keywords = analyzer.lexicon().category(category);
            let score = cfg.scoring.score(&text, keywords, analyzer.match_mode());
            print_json(&score)
        }
        Command::Defaults { venue_type } => print_json(&get_default_eco_scores(&venue_type)),
        Command::Stale { file } => {
            let raw: serde_json::Value = serde_json::from_str(&read_input(&file)?)
                .context("parsing stored record JSON")?;
            let meta_value = raw.get("metadata").cloned().unwrap_or(raw);
            let meta: ScoreMetadata =
                serde_json::from_value(meta_value).context("reading score metadata")?;
            let reason = cfg.refresh.refresh_reason(&meta, Utc::now());
            print_json(&serde_json::json!({
                "stale": reason.is_some(),
                "reason": reason,
            }))
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
