//! # 레시피 데이터베이스 쿼리 모듈
//!
//! 레시피 조회와 **트랜잭션 기반 쓰기**를 담당합니다.
//!
//! ## 쓰기 규칙
//! - 생성: 레시피 행 → 재료 수량 행들 → 태그 연결을 하나의 트랜잭션으로 기록
//! - 수정: 기존 재료 수량 행과 태그 연결을 모두 지우고 요청의 집합으로 다시 기록한 뒤
//!   스칼라 필드를 갱신 (병합(merge)이 아닌 전체 교체)
//! - 어느 단계에서든 에러가 나면 트랜잭션이 커밋되지 않고 drop되어 모두 롤백됩니다
//!
//! ```text
//! BEGIN
//!   DELETE FROM recipe_ingredients WHERE recipe_id = ?
//!   DELETE FROM recipe_tags        WHERE recipe_id = ?
//!   INSERT INTO recipe_ingredients ... (항목마다)
//!   INSERT INTO recipe_tags        ... (태그마다)
//!   UPDATE recipes SET name = COALESCE(?, name), ...
//! COMMIT
//! ```

use crate::error::AppError;
use crate::models::*;
use sqlx::{SqliteConnection, SqlitePool};

const RECIPE_COLUMNS: &str = "r.id, r.author_id, r.name, r.image, r.text, r.cooking_time, r.pub_date";

/// ID로 레시피 하나를 조회합니다.
pub async fn get_recipe(pool: &SqlitePool, id: &str) -> Result<Option<Recipe>, AppError> {
    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(recipe)
}

/// 필터를 적용해 레시피 목록을 최신순으로 조회합니다.
///
/// `viewer_id`가 None(익명)이면 `is_favorited`/`is_in_shopping_cart` 필터는 무시합니다.
///
/// 필터 조합에 따라 WHERE 절을 동적으로 구성합니다.
/// 값은 문자열에 직접 넣지 않고 `bindings`에 모아 `?` 자리에 순서대로 바인딩합니다.
pub async fn list_recipes(
    pool: &SqlitePool,
    filter: &RecipeFilter,
    viewer_id: Option<&str>,
) -> Result<Vec<Recipe>, AppError> {
    let mut query = format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE 1 = 1");
    let mut bindings: Vec<&str> = Vec::new();

    if let Some(author) = &filter.author {
        query.push_str(" AND r.author_id = ?");
        bindings.push(author.as_str());
    }

    if !filter.tags.is_empty() {
        // 태그 slug 중 하나라도 일치하면 포함 (OR). EXISTS로 중복 행이 생기지 않게 합니다.
        let placeholders = vec!["?"; filter.tags.len()].join(", ");
        query.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
             WHERE rt.recipe_id = r.id AND t.slug IN ({placeholders}))"
        ));
        bindings.extend(filter.tags.iter().map(String::as_str));
    }

    if let Some(viewer) = viewer_id {
        if filter.is_favorited {
            query.push_str(
                " AND EXISTS (SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = ?)",
            );
            bindings.push(viewer);
        }
        if filter.is_in_shopping_cart {
            query.push_str(
                " AND EXISTS (SELECT 1 FROM shopping_cart s WHERE s.recipe_id = r.id AND s.user_id = ?)",
            );
            bindings.push(viewer);
        }
    }

    query.push_str(" ORDER BY r.pub_date DESC, r.id DESC");

    let mut query_builder = sqlx::query_as::<_, Recipe>(&query);
    for binding in bindings {
        query_builder = query_builder.bind(binding);
    }

    Ok(query_builder.fetch_all(pool).await?)
}

/// 레시피에 포함된 재료를 이름순으로 조회합니다 (재료 이름/단위를 JOIN).
pub async fn get_recipe_ingredients(
    pool: &SqlitePool,
    recipe_id: &str,
) -> Result<Vec<RecipeIngredientRow>, AppError> {
    let rows = sqlx::query_as::<_, RecipeIngredientRow>(
        r#"
        SELECT i.id, i.name, i.measurement_unit, ri.amount
        FROM recipe_ingredients ri
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = ?
        ORDER BY i.name
        "#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// 작성자의 레시피를 최신순으로 조회합니다. `limit`이 있으면 그 개수까지만 가져옵니다.
pub async fn list_author_recipes(
    pool: &SqlitePool,
    author_id: &str,
    limit: Option<i64>,
) -> Result<Vec<Recipe>, AppError> {
    // SQLite에서 LIMIT -1은 "제한 없음"을 뜻합니다
    let recipes = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.author_id = ? \
         ORDER BY r.pub_date DESC, r.id DESC LIMIT ?"
    ))
    .bind(author_id)
    .bind(limit.unwrap_or(-1))
    .fetch_all(pool)
    .await?;

    Ok(recipes)
}

/// 작성자의 전체 레시피 수를 셉니다.
pub async fn count_author_recipes(pool: &SqlitePool, author_id: &str) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE author_id = ?")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// 레시피를 생성합니다. 레시피 행, 재료 수량, 태그 연결이 하나의 트랜잭션입니다.
///
/// `fields`의 모든 값이 채워져 있어야 합니다 (검증기가 보장).
/// `tag_ids`와 `ingredients`는 검증기를 통과한 값이어야 합니다.
pub async fn create_recipe(
    pool: &SqlitePool,
    author_id: &str,
    fields: &RecipeFields,
    tag_ids: &[String],
    ingredients: &[IngredientAmount],
) -> Result<Recipe, AppError> {
    let (Some(name), Some(image), Some(text), Some(cooking_time)) = (
        fields.name.as_deref(),
        fields.image.as_deref(),
        fields.text.as_deref(),
        fields.cooking_time,
    ) else {
        return Err(AppError::Internal(
            "create_recipe called with incomplete fields".to_string(),
        ));
    };

    let id = uuid::Uuid::now_v7().to_string();

    // pool.begin(): 트랜잭션 시작. commit() 전에 drop되면 자동으로 롤백됩니다.
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO recipes (id, author_id, name, image, text, cooking_time)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(author_id)
    .bind(name)
    .bind(image)
    .bind(text)
    .bind(cooking_time)
    .execute(&mut *tx)
    .await?;

    insert_ingredients(&mut *tx, &id, ingredients).await?;
    insert_tags(&mut *tx, &id, tag_ids).await?;

    tx.commit().await?;
    tracing::debug!(recipe_id = %id, author_id, "recipe created");

    get_recipe(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created recipe".to_string()))
}

/// 레시피를 수정합니다 (재료·태그 전체 교체 + 스칼라 필드 부분 갱신).
///
/// ## 반환값
/// - `Ok(Some(Recipe))`: 수정 성공
/// - `Ok(None)`: 해당 ID의 레시피가 없음
pub async fn update_recipe(
    pool: &SqlitePool,
    id: &str,
    fields: &RecipeFields,
    tag_ids: &[String],
    ingredients: &[IngredientAmount],
) -> Result<Option<Recipe>, AppError> {
    // 첫 문장이 쓰기(UPDATE)여야 트랜잭션이 처음부터 쓰기 잠금을 잡습니다.
    let mut tx = pool.begin().await?;

    // COALESCE(?, col): 바인딩 값이 NULL(None)이면 기존 값을 유지합니다
    let updated = sqlx::query(
        r#"
        UPDATE recipes
        SET name = COALESCE(?, name),
            image = COALESCE(?, image),
            text = COALESCE(?, text),
            cooking_time = COALESCE(?, cooking_time)
        WHERE id = ?
        "#,
    )
    .bind(fields.name.as_deref())
    .bind(fields.image.as_deref())
    .bind(fields.text.as_deref())
    .bind(fields.cooking_time)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        return Ok(None);
    }

    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    insert_ingredients(&mut *tx, id, ingredients).await?;
    insert_tags(&mut *tx, id, tag_ids).await?;

    tx.commit().await?;
    tracing::debug!(recipe_id = %id, "recipe updated");

    get_recipe(pool, id).await
}

/// 레시피를 삭제합니다. 재료 수량, 태그, 즐겨찾기, 장바구니 행은 `ON DELETE CASCADE`로 함께 지워집니다.
pub async fn delete_recipe(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 트랜잭션 안에서 재료 수량 행들을 삽입합니다.
///
/// `conn: &mut SqliteConnection`: `&mut Transaction`은 역참조(deref)로 연결 참조가 되므로
/// 트랜잭션을 그대로 넘길 수 있습니다.
async fn insert_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: &str,
    ingredients: &[IngredientAmount],
) -> Result<(), AppError> {
    for item in ingredients {
        sqlx::query(
            "INSERT INTO recipe_ingredients (id, recipe_id, ingredient_id, amount) VALUES (?, ?, ?, ?)",
        )
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(recipe_id)
        .bind(&item.id)
        .bind(item.amount)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "Ingredients must be unique"))?;
    }

    Ok(())
}

/// 트랜잭션 안에서 태그 연결을 삽입합니다. 같은 태그가 두 번 오면 한 번만 연결됩니다.
async fn insert_tags(
    conn: &mut SqliteConnection,
    recipe_id: &str,
    tag_ids: &[String],
) -> Result<(), AppError> {
    for tag_id in tag_ids {
        sqlx::query("INSERT OR IGNORE INTO recipe_tags (recipe_id, tag_id) VALUES (?, ?)")
            .bind(recipe_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}
