//! # 재료 API 라우트 핸들러
//!
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/ingredients/?name=<접두사> | `list_ingredients` | 재료 목록 (이름 접두사 검색) |
//! | GET | /api/ingredients/{id}/ | `get_ingredient` | 재료 상세 |

use crate::{db, error::AppError, models::*, routes::AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};

/// `Query(query)`: `?name=мук` 같은 쿼리 문자열을 `IngredientQuery`로 파싱합니다.
/// `name`이 없으면 전체 목록을 반환합니다.
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> Result<Json<Vec<Ingredient>>, AppError> {
    let ingredients = db::list_ingredients(&state.pool, query.name.as_deref()).await?;
    Ok(Json(ingredients))
}

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ingredient>, AppError> {
    let ingredient = db::get_ingredient(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(ingredient))
}
