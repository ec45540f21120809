//! # 태그 API 라우트 핸들러
//!
//! 태그는 적재 도구(`load_data`)로만 만들어지므로 API는 읽기 전용입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/tags/ | `list_tags` | 전체 태그 목록 (이름순) |
//! | GET | /api/tags/{id}/ | `get_tag` | 태그 상세 |

use crate::{db, error::AppError, models::*, routes::AppState};
use axum::{
    extract::{Path, State},
    Json,
};

/// 전체 태그 목록을 조회합니다.
///
/// `GET /api/tags/` → `[{ "id", "name", "color", "slug" }, ...]`
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, AppError> {
    let tags = db::list_tags(&state.pool).await?;
    Ok(Json(tags))
}

/// 태그 하나를 조회합니다. 없으면 404.
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tag>, AppError> {
    let tag = db::get_tag(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(tag))
}
