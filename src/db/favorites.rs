//! # 즐겨찾기 데이터베이스 쿼리 모듈
//!
//! 사용자-레시피 즐겨찾기 관계(`favorites`)를 다룹니다.
//!
//! - 추가: 이미 있으면 `Conflict` (멱등 아님. 두 번째 추가는 사용자에게 보이는 에러)
//! - 삭제: 없으면 `false`를 돌려주고, 라우트가 400으로 바꿉니다

use crate::error::AppError;
use sqlx::SqlitePool;

/// 사용자가 레시피를 즐겨찾기에 넣었는지 확인합니다.
pub async fn is_favorited(pool: &SqlitePool, user_id: &str, recipe_id: &str) -> Result<bool, AppError> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM favorites WHERE user_id = ? AND recipe_id = ?")
            .bind(user_id)
            .bind(recipe_id)
            .fetch_optional(pool)
            .await?;

    Ok(found.is_some())
}

/// 즐겨찾기를 추가합니다.
///
/// 사전 SELECT 없이 INSERT 한 번으로 처리하고,
/// UNIQUE(user_id, recipe_id) 제약조건 위반을 `Conflict`로 변환합니다.
/// 같은 요청이 동시에 여러 개 들어와도 하나만 성공하고 나머지는 `Conflict`가 됩니다.
pub async fn add_favorite(pool: &SqlitePool, user_id: &str, recipe_id: &str) -> Result<(), AppError> {
    sqlx::query("INSERT INTO favorites (id, user_id, recipe_id) VALUES (?, ?, ?)")
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "Recipe is already in favorites"))?;

    Ok(())
}

/// 즐겨찾기를 삭제합니다.
///
/// ## 반환값
/// - `true`: 삭제 성공
/// - `false`: 해당 즐겨찾기가 없음
pub async fn remove_favorite(pool: &SqlitePool, user_id: &str, recipe_id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND recipe_id = ?")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
