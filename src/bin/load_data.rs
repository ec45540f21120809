//! # 재료/태그 적재 도구
//!
//! ```text
//! load_data <ingredients.json> [tags.json]
//! ```
//!
//! - `ingredients.json`: `[{ "name": "...", "measurement_unit": "..." }, ...]`
//! - `tags.json`: `[{ "name": "...", "color": "#E26C2D", "slug": "..." }, ...]` (`slug`는 생략 가능)
//!
//! `DATABASE_URL`은 서버와 같은 환경변수(.env)에서 읽습니다.
//! 이미 있는 재료/태그는 건너뛰므로 여러 번 실행해도 안전합니다.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{value_parser, Arg, Command};
use foodgram::{
    db,
    models::{NewIngredient, NewTag},
    services::loader,
};
use serde::de::DeserializeOwned;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodgram=info,load_data=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let matches = Command::new("load_data")
        .about("Load ingredients and tags from JSON files into the Foodgram database")
        .arg(
            Arg::new("ingredients")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON array of {name, measurement_unit}"),
        )
        .arg(
            Arg::new("tags")
                .value_parser(value_parser!(PathBuf))
                .help("JSON array of {name, color, slug?}"),
        )
        .get_matches();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = db::connect(&database_url, 1).await?;
    db::migrate(&pool).await?;

    if let Some(path) = matches.get_one::<PathBuf>("ingredients") {
        let ingredients: Vec<NewIngredient> = read_json(path).await?;
        let report = loader::load_ingredients(&pool, &ingredients).await?;
        tracing::info!(
            created = report.created,
            skipped = report.skipped,
            "ingredients loaded from {}",
            path.display()
        );
    }

    if let Some(path) = matches.get_one::<PathBuf>("tags") {
        let tags: Vec<NewTag> = read_json(path).await?;
        let report = loader::load_tags(&pool, &tags).await?;
        tracing::info!(
            created = report.created,
            skipped = report.skipped,
            "tags loaded from {}",
            path.display()
        );
    }

    pool.close().await;
    Ok(())
}
