//! # 장바구니 데이터베이스 쿼리 모듈
//!
//! 사용자-레시피 장바구니 관계(`shopping_cart`)와 쇼핑 목록 합산 쿼리입니다.
//!
//! ## 쇼핑 목록 합산
//! 장바구니에 담긴 모든 레시피의 재료 수량을 (재료 이름, 단위) 기준으로 묶어 합칩니다.
//! ```text
//! 레시피 1: 밀가루 200g          ┐
//! 레시피 2: 밀가루 300g, 설탕 50g ┘ → 밀가루 (g) 500, 설탕 (g) 50
//! ```

use crate::error::AppError;
use crate::models::CartLine;
use sqlx::SqlitePool;

/// 사용자의 장바구니에 레시피가 있는지 확인합니다.
pub async fn is_in_shopping_cart(
    pool: &SqlitePool,
    user_id: &str,
    recipe_id: &str,
) -> Result<bool, AppError> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM shopping_cart WHERE user_id = ? AND recipe_id = ?")
            .bind(user_id)
            .bind(recipe_id)
            .fetch_optional(pool)
            .await?;

    Ok(found.is_some())
}

/// 장바구니에 레시피를 추가합니다. 이미 있으면 `Conflict`.
pub async fn add_to_shopping_cart(
    pool: &SqlitePool,
    user_id: &str,
    recipe_id: &str,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO shopping_cart (id, user_id, recipe_id) VALUES (?, ?, ?)")
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "Recipe is already in the shopping cart"))?;

    Ok(())
}

/// 장바구니에서 레시피를 뺍니다. 없었으면 `false`.
pub async fn remove_from_shopping_cart(
    pool: &SqlitePool,
    user_id: &str,
    recipe_id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM shopping_cart WHERE user_id = ? AND recipe_id = ?")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 사용자의 장바구니 재료를 (이름, 단위)별로 합산해 이름순으로 돌려줍니다.
///
/// 읽기 전용 쿼리이며 아무것도 변경하지 않습니다.
/// 장바구니가 비어 있으면 빈 Vec을 반환합니다.
pub async fn aggregate_cart(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<CartLine>, AppError> {
    let lines = sqlx::query_as::<_, CartLine>(
        r#"
        SELECT i.name AS name,
               i.measurement_unit AS measurement_unit,
               CAST(SUM(ri.amount) AS INTEGER) AS amount
        FROM shopping_cart sc
        JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE sc.user_id = ?
        GROUP BY i.name, i.measurement_unit
        ORDER BY i.name, i.measurement_unit
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(lines)
}
