//! # 태그 데이터베이스 쿼리 모듈
//!
//! 태그 조회·적재와 레시피-태그 관계 조회를 담당하는 SQL 쿼리 함수들입니다.
//! 모든 함수는 `SqlitePool` 참조를 받아 비동기로 실행됩니다.
//!
//! ## 테이블 구조
//! - `tags`: 태그 엔티티 (id, name, color, slug)
//! - `recipe_tags`: 레시피와 태그의 다대다(N:M) 관계 테이블
//!
//! 레시피-태그 관계의 *쓰기*는 레시피 트랜잭션 안에서 이뤄지므로
//! `db::recipes` 모듈에 있습니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 모든 태그를 이름순으로 조회합니다.
///
/// `sqlx::query_as::<_, Tag>(sql)`: SQL 결과를 Tag 구조체로 자동 변환합니다.
/// `<_, Tag>`에서 `_`는 DB 드라이버(SQLite)를 컴파일러가 추론하게 합니다.
pub async fn list_tags(pool: &SqlitePool) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(tags)
}

/// ID로 태그 하나를 조회합니다.
///
/// `fetch_optional`은 결과가 0행이면 None, 1행이면 Some(Tag)을 반환합니다.
pub async fn get_tag(pool: &SqlitePool, id: &str) -> Result<Option<Tag>, AppError> {
    let tag = sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(tag)
}

/// slug로 태그 하나를 조회합니다. 적재 도구가 중복 적재를 피할 때 사용합니다.
pub async fn get_tag_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Tag>, AppError> {
    let tag = sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    Ok(tag)
}

/// 새 태그를 생성하고 생성된 태그를 반환합니다.
///
/// ## 처리 흐름
/// 1. 색상 코드 형식 검사. 잘못되면 `color` 필드 검증 에러
/// 2. slug가 없으면 이름으로부터 생성
/// 3. UUIDv7으로 ID를 만들고 INSERT
/// 4. 방금 생성한 태그를 다시 조회하여 반환
///
/// 이름이나 slug가 이미 있으면 UNIQUE 제약조건 위반이 `Conflict`로 변환됩니다.
pub async fn create_tag(pool: &SqlitePool, new_tag: &NewTag) -> Result<Tag, AppError> {
    if !is_valid_color(&new_tag.color) {
        return Err(AppError::field(
            "color",
            "Color must be a hex code, for example #FFFFFF",
        ));
    }

    let slug = new_tag.resolved_slug();
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO tags (id, name, color, slug) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(&new_tag.name)
        .bind(&new_tag.color)
        .bind(&slug)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "Tag with this name or slug already exists"))?;

    get_tag(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created tag".to_string()))
}

/// 특정 레시피에 연결된 모든 태그를 이름순으로 조회합니다.
///
/// ```sql
/// tags ←── recipe_tags ──→ recipes
///  (1)        (N:M)          (1)
/// ```
pub async fn get_recipe_tags(pool: &SqlitePool, recipe_id: &str) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.name, t.color, t.slug
        FROM tags t
        JOIN recipe_tags rt ON rt.tag_id = t.id
        WHERE rt.recipe_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(tags)
}
