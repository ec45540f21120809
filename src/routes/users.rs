//! # 사용자와 구독 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/users/`                      → 회원가입
//! - `GET    /api/users/`                      → 사용자 목록
//! - `GET    /api/users/me/`                   → 내 정보
//! - `POST   /api/users/set_password/`         → 비밀번호 변경
//! - `GET    /api/users/{id}/`                 → 사용자 상세
//! - `GET    /api/users/subscriptions/`        → 내가 구독한 작성자 목록
//! - `POST   /api/users/{id}/subscribe/`       → 구독
//! - `DELETE /api/users/{id}/subscribe/`       → 구독 취소
//!
//! 사용자 응답의 `is_subscribed`는 요청한 사용자 기준으로 계산되며, 익명이면 항상 false입니다.

use std::sync::LazyLock;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use regex::Regex;
use sqlx::SqlitePool;

use crate::{
    db::{self, users as db_users},
    error::{AppError, FieldErrors},
    middleware::{
        auth::{AuthUser, MaybeAuthUser},
        json::AppJson,
    },
    models::*,
    routes::{
        auth::{hash_password, verify_password},
        AppState,
    },
};

/// 사용자 이름: 문자, 숫자, `.@+-_`만 허용
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username regex is valid"));

const MIN_PASSWORD_LEN: usize = 8;
const MAX_NAME_LEN: usize = 150;

/// 요청자 기준 `is_subscribed`를 채워 사용자 응답을 만듭니다.
pub(crate) async fn user_response(
    pool: &SqlitePool,
    user: User,
    viewer_id: Option<&str>,
) -> Result<UserResponse, AppError> {
    let is_subscribed = match viewer_id {
        Some(viewer) if viewer != user.id => db::is_following(pool, viewer, &user.id).await?,
        _ => false,
    };
    Ok(UserResponse::new(user, is_subscribed))
}

/// 구독 응답: 작성자 정보 + 최신 레시피(최대 `limit`개) + 전체 레시피 수
async fn subscription_view(
    pool: &SqlitePool,
    author: User,
    limit: Option<i64>,
) -> Result<SubscriptionView, AppError> {
    let recipes = db::list_author_recipes(pool, &author.id, limit).await?;
    let recipes_count = db::count_author_recipes(pool, &author.id).await?;

    Ok(SubscriptionView {
        user: UserResponse::new(author, true),
        recipes: recipes.into_iter().map(RecipeShort::new).collect(),
        recipes_count,
    })
}

fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    let mut fields = FieldErrors::new();

    let email = req.email.trim();
    if email.is_empty() || !email.contains('@') {
        fields.insert("email".to_string(), "Invalid email address".to_string());
    }
    if req.username.chars().count() > MAX_NAME_LEN || !USERNAME_RE.is_match(&req.username) {
        fields.insert(
            "username".to_string(),
            "Username may contain only letters, digits and .@+-_".to_string(),
        );
    }
    if req.username.eq_ignore_ascii_case("me") {
        fields.insert("username".to_string(), "This username is reserved".to_string());
    }
    if req.first_name.chars().count() > MAX_NAME_LEN {
        fields.insert("first_name".to_string(), "First name is too long".to_string());
    }
    if req.last_name.chars().count() > MAX_NAME_LEN {
        fields.insert("last_name".to_string(), "Last name is too long".to_string());
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        fields.insert(
            "password".to_string(),
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(fields))
    }
}

/// `POST /users/`: 회원가입
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    validate_registration(&req)?;
    let email = req.email.trim();

    if db_users::find_by_username(&state.pool, &req.username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }
    if db_users::find_by_email(&state.pool, email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user_id = uuid::Uuid::now_v7().to_string();
    let user = db_users::create_user(
        &state.pool,
        &user_id,
        email,
        &req.username,
        &req.first_name,
        &req.last_name,
        &password_hash,
    )
    .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `GET /users/`
pub async fn list_users(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = db_users::list_users(&state.pool).await?;

    let mut responses = Vec::with_capacity(users.len());
    for user in users {
        responses.push(user_response(&state.pool, user, viewer.user_id()).await?);
    }
    Ok(Json(responses))
}

/// `GET /users/{id}/`
pub async fn get_user(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(user_response(&state.pool, user, viewer.user_id()).await?))
}

/// `GET /users/me/`
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(user.into()))
}

/// `POST /users/set_password/`
///
/// 성공하면 기존 리프레시 토큰을 모두 폐기합니다.
pub async fn set_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(req): AppJson<SetPasswordRequest>,
) -> Result<StatusCode, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !verify_password(&req.current_password, &user.password_hash)? {
        return Err(AppError::field("current_password", "Current password is incorrect"));
    }
    if req.new_password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::field(
            "new_password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }

    let password_hash = hash_password(&req.new_password)?;
    db_users::update_password(&state.pool, &user.id, &password_hash).await?;
    db_users::delete_user_refresh_tokens(&state.pool, &user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /users/subscriptions/?recipes_limit=N`
pub async fn subscriptions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<RecipesLimitQuery>,
) -> Result<Json<Vec<SubscriptionView>>, AppError> {
    let authors = db::list_followed_authors(&state.pool, &auth_user.user_id).await?;
    let limit = query.limit();

    let mut views = Vec::with_capacity(authors.len());
    for author in authors {
        views.push(subscription_view(&state.pool, author, limit).await?);
    }
    Ok(Json(views))
}

/// `POST /users/{id}/subscribe/?recipes_limit=N`
pub async fn subscribe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<RecipesLimitQuery>,
) -> Result<(StatusCode, Json<SubscriptionView>), AppError> {
    let author = db_users::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    db::create_follow(&state.pool, &auth_user.user_id, &author.id).await?;

    let view = subscription_view(&state.pool, author, query.limit()).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `DELETE /users/{id}/subscribe/`
pub async fn unsubscribe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let author = db_users::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !db::delete_follow(&state.pool, &auth_user.user_id, &author.id).await? {
        return Err(AppError::BadRequest(
            "You are not following this author".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
