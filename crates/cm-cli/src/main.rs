use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use cm_common::catalog::{
    distinct_brands, find_by_ids, search, BrandCache, BrandCacheConfig, BrandCacheError,
    CarDraft, CarValidationError, CatalogQuery,
};
use cm_common::comparison::{compare, ComparisonSelection, FavoriteSet};
use cm_common::deep_links::{mercado_livre_url, olx_url, webmotors_url};
use cm_common::feedback::{FeedbackError, FeedbackRequest};
use cm_common::logging::{init_tracing_subscriber, install_tracing_panic_hook, LogConfig};
use cm_common::scoring::ScoreSet;
use cm_common::Car;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

const APP_NAME: &str = "cm-cli";

#[derive(Debug, Parser)]
#[command(name = "cm-cli", about = "Score, rank and compare the car catalog")]
struct Cli {
    /// Catalog JSON file (array of car records with raw measurements)
    #[arg(long, env = "CM_CATALOG_PATH", default_value = "demos/catalog.json")]
    catalog: PathBuf,

    /// Brand list cache TTL in seconds (falls back to CM_BRAND_CACHE_TTL_SECS)
    #[arg(long)]
    brand_cache_ttl_secs: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the normalized scores of every car
    Score,
    /// Filter and order the catalog like the results page
    Rank {
        /// Results page query string, e.g. `w_economy=90&w_space=10&mode=match`
        #[arg(long, default_value = "")]
        query: String,
        /// Keep only the first N cars
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Compare two cars attribute by attribute
    Compare { left: String, right: String },
    /// List the distinct brands of the catalog
    Brands,
    /// Marketplace search links for one car
    Links { id: String },
    /// Validate a feedback body (`{"carId":..,"thumbs":..,"weights":{..}}`)
    Feedback { body: String },
    /// Show the saved cars of a garage
    Garage { ids: Vec<String> },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read catalog {path}: {source}")]
    ReadCatalog {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid query string: {0}")]
    Query(#[from] serde_urlencoded::de::Error),
    #[error("catalog entry {id} is invalid: {source}")]
    InvalidEntry {
        id: String,
        source: CarValidationError,
    },
    #[error("unknown car id: {0}")]
    UnknownCar(String),
    #[error("comparison needs two distinct cars")]
    NotEnoughCars,
    #[error(transparent)]
    Brands(#[from] BrandCacheError),
    #[error("feedback rejected: {0}")]
    Feedback(#[from] FeedbackError),
}

/// One catalog file record: an id plus the same fields the catalog form
/// accepts. Scores are always recomputed on load.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
    #[serde(flatten)]
    draft: CarDraft,
}

#[derive(Debug, Serialize)]
struct ScoreLine<'a> {
    id: &'a str,
    brand: &'a str,
    model: &'a str,
    scores: &'a ScoreSet,
}

#[derive(Debug, Serialize)]
struct Links {
    webmotors: String,
    olx: String,
    mercado_livre: String,
}

fn main() -> ExitCode {
    dotenv().ok();

    let log_config = LogConfig::from_env();
    init_tracing_subscriber(APP_NAME, &log_config);
    install_tracing_panic_hook(APP_NAME, &log_config);

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    let cars = load_catalog(&cli.catalog, Utc::now().year())?;
    info!(path = %cli.catalog.display(), cars = cars.len(), "catalog loaded");

    let config = cli
        .brand_cache_ttl_secs
        .map(BrandCacheConfig::with_ttl_secs)
        .unwrap_or_else(BrandCacheConfig::from_env);
    execute(cli.command, cars, config)
}

fn execute(command: Command, cars: Vec<Car>, config: BrandCacheConfig) -> Result<String, CliError> {
    let output = match command {
        Command::Score => {
            let lines: Vec<ScoreLine<'_>> = cars
                .iter()
                .filter_map(|car| {
                    car.scores().map(|scores| ScoreLine {
                        id: &car.id,
                        brand: &car.brand,
                        model: &car.model,
                        scores,
                    })
                })
                .collect();
            serde_json::to_string_pretty(&lines)?
        }
        Command::Rank { query, limit } => {
            let pairs = parse_query_string(&query)?;
            let query = CatalogQuery::from_query(&pairs);
            let mut outcome = search(cars, &query);
            if let Some(limit) = limit {
                outcome.cars.truncate(limit);
            }
            serde_json::to_string_pretty(&outcome)?
        }
        Command::Compare { left, right } => {
            let mut selection = ComparisonSelection::new();
            selection.add(left.as_str());
            selection.add(right.as_str());
            if !selection.is_ready() {
                return Err(CliError::NotEnoughCars);
            }

            let found = find_by_ids(&cars, &selection.to_param());
            for id in selection.ids() {
                if !found.iter().any(|car| &car.id == id) {
                    return Err(CliError::UnknownCar(id.clone()));
                }
            }
            serde_json::to_string_pretty(&compare(found[0], found[1]))?
        }
        Command::Brands => {
            let mut cache = BrandCache::new(config);
            let brands = cache.get_or_refresh(|| Ok::<_, Infallible>(distinct_brands(&cars)))?;
            serde_json::to_string_pretty(&brands)?
        }
        Command::Links { id } => {
            let car = cars
                .iter()
                .find(|car| car.id == id)
                .ok_or(CliError::UnknownCar(id))?;
            serde_json::to_string_pretty(&Links {
                webmotors: webmotors_url(&car.brand, &car.model),
                olx: olx_url(&car.brand, &car.model),
                mercado_livre: mercado_livre_url(&car.brand, &car.model),
            })?
        }
        Command::Feedback { body } => {
            let request: FeedbackRequest = serde_json::from_str(&body)?;
            let feedback = request.validate(&cars, Utc::now())?;
            info!(
                car_id = %feedback.car_id,
                feedback_type = feedback.feedback_type.as_str(),
                weights = %feedback.weights_json()?,
                "match feedback accepted"
            );
            serde_json::to_string_pretty(&feedback)?
        }
        Command::Garage { ids } => {
            let mut favorites = FavoriteSet::new();
            for id in ids {
                favorites.add(id);
            }
            let saved = favorites.resolve(&cars);
            if saved.len() < favorites.ids().len() {
                warn!(
                    saved = favorites.ids().len(),
                    found = saved.len(),
                    "some saved cars are no longer in the catalog"
                );
            }
            serde_json::to_string_pretty(&saved)?
        }
    };
    Ok(output)
}

fn load_catalog(path: &Path, current_year: i32) -> Result<Vec<Car>, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ReadCatalog {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&raw, current_year)
}

fn parse_catalog(raw: &str, current_year: i32) -> Result<Vec<Car>, CliError> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(raw)?;
    entries
        .into_iter()
        .map(|entry| {
            let id = entry.id;
            entry
                .draft
                .validate(id.clone(), current_year)
                .map_err(|source| CliError::InvalidEntry { id, source })
        })
        .collect()
}

/// Decode a results page query string (with or without the leading `?`)
/// into pairs, in order.
fn parse_query_string(raw: &str) -> Result<Vec<(String, String)>, CliError> {
    Ok(serde_urlencoded::from_str(raw.trim_start_matches('?'))?)
}
