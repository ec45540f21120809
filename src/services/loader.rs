//! # 재료/태그 일괄 적재
//!
//! `load_data` 바이너리가 JSON 파일에서 읽은 목록을 DB에 넣습니다.
//!
//! - 재료: 같은 (이름, 단위)가 이미 있으면 건너뜁니다
//! - 태그: 같은 slug가 이미 있으면 건너뜁니다
//!
//! 따라서 같은 파일로 여러 번 실행해도 결과가 같습니다.

use sqlx::SqlitePool;

use crate::{
    db,
    error::AppError,
    models::{NewIngredient, NewTag},
};

/// 적재 결과 요약
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub created: usize,
    pub skipped: usize,
}

pub async fn load_ingredients(
    pool: &SqlitePool,
    ingredients: &[NewIngredient],
) -> Result<LoadReport, AppError> {
    let mut report = LoadReport::default();

    for item in ingredients {
        let name = item.name.trim();
        let unit = item.measurement_unit.trim();
        if name.is_empty() || unit.is_empty() {
            tracing::warn!(?item, "skipping ingredient with blank name or unit");
            report.skipped += 1;
            continue;
        }

        if db::find_ingredient(pool, name, unit).await?.is_some() {
            report.skipped += 1;
            continue;
        }

        db::create_ingredient(
            pool,
            &NewIngredient {
                name: name.to_string(),
                measurement_unit: unit.to_string(),
            },
        )
        .await?;
        report.created += 1;
    }

    Ok(report)
}

pub async fn load_tags(pool: &SqlitePool, tags: &[NewTag]) -> Result<LoadReport, AppError> {
    let mut report = LoadReport::default();

    for tag in tags {
        if db::get_tag_by_slug(pool, &tag.resolved_slug()).await?.is_some() {
            report.skipped += 1;
            continue;
        }

        db::create_tag(pool, tag).await?;
        report.created += 1;
    }

    Ok(report)
}
