//! # 재료 데이터베이스 쿼리 모듈
//!
//! 재료 목록 조회(이름 접두사 검색 포함), 단건 조회, 적재용 생성 함수입니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 재료 목록을 이름순으로 조회합니다.
///
/// `name_prefix`가 있으면 대소문자를 구분하지 않는 접두사 일치만 남깁니다.
/// SQLite의 `LIKE`/`lower()`는 ASCII만 대소문자를 접어주므로(키릴 문자 재료명이 대부분),
/// 비교는 Rust의 `to_lowercase()`로 수행합니다.
pub async fn list_ingredients(
    pool: &SqlitePool,
    name_prefix: Option<&str>,
) -> Result<Vec<Ingredient>, AppError> {
    let ingredients = sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, measurement_unit FROM ingredients ORDER BY name, measurement_unit",
    )
    .fetch_all(pool)
    .await?;

    let Some(prefix) = name_prefix.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(ingredients);
    };

    let prefix = prefix.to_lowercase();
    Ok(ingredients
        .into_iter()
        .filter(|ingredient| ingredient.name.to_lowercase().starts_with(&prefix))
        .collect())
}

/// ID로 재료 하나를 조회합니다.
pub async fn get_ingredient(pool: &SqlitePool, id: &str) -> Result<Option<Ingredient>, AppError> {
    let ingredient = sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, measurement_unit FROM ingredients WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(ingredient)
}

/// 같은 (이름, 단위) 재료를 조회합니다. 적재를 여러 번 실행해도 중복이 생기지 않게 합니다.
pub async fn find_ingredient(
    pool: &SqlitePool,
    name: &str,
    measurement_unit: &str,
) -> Result<Option<Ingredient>, AppError> {
    let ingredient = sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, measurement_unit FROM ingredients WHERE name = ? AND measurement_unit = ?",
    )
    .bind(name)
    .bind(measurement_unit)
    .fetch_optional(pool)
    .await?;

    Ok(ingredient)
}

/// 새 재료를 생성하고 반환합니다.
pub async fn create_ingredient(
    pool: &SqlitePool,
    new_ingredient: &NewIngredient,
) -> Result<Ingredient, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO ingredients (id, name, measurement_unit) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(&new_ingredient.name)
        .bind(&new_ingredient.measurement_unit)
        .execute(pool)
        .await?;

    get_ingredient(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created ingredient".to_string()))
}
