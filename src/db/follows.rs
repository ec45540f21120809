//! # 구독(팔로우) 데이터베이스 쿼리 모듈
//!
//! `follows` 테이블은 "구독자(follower) → 작성자(author)" 방향의 간선을 저장합니다.
//!
//! ## 규칙
//! - 자기 자신은 구독할 수 없음 (DB 접근 전에 검사)
//! - 같은 간선은 한 번만 존재 (UNIQUE(follower_id, author_id))
//! - 없는 간선을 삭제하면 `false` → 라우트에서 400

use crate::error::AppError;
use crate::models::User;
use sqlx::SqlitePool;

/// `follower_id`가 `author_id`를 구독 중인지 확인합니다.
pub async fn is_following(
    pool: &SqlitePool,
    follower_id: &str,
    author_id: &str,
) -> Result<bool, AppError> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM follows WHERE follower_id = ? AND author_id = ?")
            .bind(follower_id)
            .bind(author_id)
            .fetch_optional(pool)
            .await?;

    Ok(found.is_some())
}

/// 구독 간선을 만듭니다.
///
/// ## 에러
/// - `follower_id == author_id` → `Conflict("You cannot follow yourself")`
/// - 이미 구독 중 → `Conflict("Already following this author")`
pub async fn create_follow(
    pool: &SqlitePool,
    follower_id: &str,
    author_id: &str,
) -> Result<(), AppError> {
    if follower_id == author_id {
        return Err(AppError::Conflict("You cannot follow yourself".to_string()));
    }

    sqlx::query("INSERT INTO follows (id, follower_id, author_id) VALUES (?, ?, ?)")
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(follower_id)
        .bind(author_id)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "Already following this author"))?;

    tracing::debug!(follower_id, author_id, "follow created");
    Ok(())
}

/// 구독 간선을 지웁니다. 간선이 없었으면 `false`.
pub async fn delete_follow(
    pool: &SqlitePool,
    follower_id: &str,
    author_id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND author_id = ?")
        .bind(follower_id)
        .bind(author_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// `follower_id`가 구독 중인 작성자들을 사용자 이름순으로 조회합니다.
pub async fn list_followed_authors(
    pool: &SqlitePool,
    follower_id: &str,
) -> Result<Vec<User>, AppError> {
    let authors = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.email, u.username, u.first_name, u.last_name,
               u.password_hash, u.created_at, u.updated_at
        FROM users u
        JOIN follows f ON f.author_id = u.id
        WHERE f.follower_id = ?
        ORDER BY u.username
        "#,
    )
    .bind(follower_id)
    .fetch_all(pool)
    .await?;

    Ok(authors)
}

