//! # 레시피 라우트 핸들러
//!
//! 레시피 CRUD, 즐겨찾기, 장바구니, 쇼핑 목록 다운로드를 처리합니다.
//!
//! ## 엔드포인트
//! - `GET    /api/recipes/`                          → 목록 (필터: author, tags, is_favorited, is_in_shopping_cart)
//! - `POST   /api/recipes/`                          → 생성 (로그인 필요)
//! - `GET    /api/recipes/{id}/`                     → 상세
//! - `PATCH  /api/recipes/{id}/`                     → 수정 (작성자만)
//! - `DELETE /api/recipes/{id}/`                     → 삭제 (작성자만)
//! - `POST   /api/recipes/{id}/favorite/`            → 즐겨찾기 추가
//! - `DELETE /api/recipes/{id}/favorite/`            → 즐겨찾기 삭제
//! - `POST   /api/recipes/{id}/shopping_cart/`       → 장바구니 추가
//! - `DELETE /api/recipes/{id}/shopping_cart/`       → 장바구니 삭제
//! - `GET    /api/recipes/download_shopping_cart/`   → 쇼핑 목록 텍스트 파일
//!
//! ## 쓰기 흐름
//! ```text
//! 요청 → 권한 확인 → 검증기(services::validator) → 이미지 저장(services::images)
//!      → DB 트랜잭션(db::recipes) → 실패 시 새 이미지 삭제 / 성공 시 이전 이미지 삭제
//! ```

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    db::{self, users as db_users},
    error::AppError,
    middleware::{
        auth::{AuthUser, MaybeAuthUser},
        json::AppJson,
    },
    models::*,
    routes::{users::user_response, AppState},
    services::{
        images, shopping_list,
        validator::{self, Mode, ScalarFields},
    },
};

/// 레시피 상세 응답을 조립합니다.
///
/// 태그, 작성자(요청자 기준 `is_subscribed`), 재료, 요청자 기준 플래그를 각각 조회합니다.
/// 익명 요청이면 플래그는 모두 false입니다.
pub(crate) async fn recipe_response(
    pool: &SqlitePool,
    recipe: Recipe,
    viewer_id: Option<&str>,
) -> Result<RecipeResponse, AppError> {
    let tags = db::get_recipe_tags(pool, &recipe.id).await?;
    let ingredients = db::get_recipe_ingredients(pool, &recipe.id).await?;

    let author = db_users::find_by_id(pool, &recipe.author_id)
        .await?
        .ok_or(AppError::Internal(format!(
            "Recipe {} has no author row",
            recipe.id
        )))?;
    let author = user_response(pool, author, viewer_id).await?;

    let (is_favorited, is_in_shopping_cart) = match viewer_id {
        Some(viewer) => (
            db::is_favorited(pool, viewer, &recipe.id).await?,
            db::is_in_shopping_cart(pool, viewer, &recipe.id).await?,
        ),
        None => (false, false),
    };

    Ok(RecipeResponse {
        id: recipe.id,
        tags,
        author,
        ingredients,
        is_favorited,
        is_in_shopping_cart,
        name: recipe.name,
        image: media_url(&recipe.image),
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        pub_date: recipe.pub_date,
    })
}

async fn find_recipe(pool: &SqlitePool, id: &str) -> Result<Recipe, AppError> {
    db::get_recipe(pool, id).await?.ok_or(AppError::NotFound)
}

fn ensure_author(recipe: &Recipe, auth_user: &AuthUser) -> Result<(), AppError> {
    if recipe.author_id != auth_user.user_id {
        return Err(AppError::Forbidden(
            "Only the author can modify this recipe".to_string(),
        ));
    }
    Ok(())
}

/// `GET /recipes/`
///
/// `Query<Vec<(String, String)>>`: `tags`가 여러 번 반복될 수 있어서
/// 구조체 대신 (키, 값) 쌍 목록으로 받아 `RecipeFilter::from_pairs()`로 해석합니다.
pub async fn list_recipes(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    let filter = RecipeFilter::from_pairs(&pairs);
    let recipes = db::list_recipes(&state.pool, &filter, viewer.user_id()).await?;

    let mut responses = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        responses.push(recipe_response(&state.pool, recipe, viewer.user_id()).await?);
    }
    Ok(Json(responses))
}

/// `GET /recipes/{id}/`
pub async fn get_recipe(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<String>,
) -> Result<Json<RecipeResponse>, AppError> {
    let recipe = find_recipe(&state.pool, &id).await?;
    Ok(Json(
        recipe_response(&state.pool, recipe, viewer.user_id()).await?,
    ))
}

/// `POST /recipes/`
pub async fn create_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(req): AppJson<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), AppError> {
    let scalars = ScalarFields {
        name: req.name.as_deref(),
        text: req.text.as_deref(),
        image: req.image.as_deref(),
        cooking_time: req.cooking_time,
    };
    let validated = validator::validate_recipe(
        &state.pool,
        req.tags.as_deref(),
        req.ingredients.as_deref(),
        &scalars,
        Mode::Create,
    )
    .await?;

    let data_uri = req
        .image
        .as_deref()
        .ok_or_else(|| AppError::field("image", "This field is required"))?;
    let image_path = images::save_image(&state.media_path, data_uri).await?;

    let fields = RecipeFields {
        name: req.name.map(|name| name.trim().to_string()),
        image: Some(image_path.clone()),
        text: req.text,
        cooking_time: req.cooking_time,
    };

    let recipe = match db::create_recipe(
        &state.pool,
        &auth_user.user_id,
        &fields,
        &validated.tag_ids,
        &validated.ingredients,
    )
    .await
    {
        Ok(recipe) => recipe,
        Err(e) => {
            images::remove_image(&state.media_path, &image_path).await;
            return Err(e);
        }
    };

    tracing::info!(recipe_id = %recipe.id, author_id = %auth_user.user_id, "recipe created");
    let response = recipe_response(&state.pool, recipe, Some(&auth_user.user_id)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `PATCH /recipes/{id}/`
///
/// 태그와 재료는 요청의 값으로 통째로 교체되고,
/// 스칼라 필드는 요청에 없으면 기존 값을 유지합니다.
pub async fn update_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, AppError> {
    let existing = find_recipe(&state.pool, &id).await?;
    ensure_author(&existing, &auth_user)?;

    let scalars = ScalarFields {
        name: req.name.as_deref(),
        text: req.text.as_deref(),
        image: req.image.as_deref(),
        cooking_time: req.cooking_time,
    };
    let validated = validator::validate_recipe(
        &state.pool,
        req.tags.as_deref(),
        req.ingredients.as_deref(),
        &scalars,
        Mode::Update,
    )
    .await?;

    let new_image = match req.image.as_deref() {
        Some(data_uri) => Some(images::save_image(&state.media_path, data_uri).await?),
        None => None,
    };

    let fields = RecipeFields {
        name: req.name.map(|name| name.trim().to_string()),
        image: new_image.clone(),
        text: req.text,
        cooking_time: req.cooking_time,
    };

    let updated = db::update_recipe(
        &state.pool,
        &id,
        &fields,
        &validated.tag_ids,
        &validated.ingredients,
    )
    .await;

    let recipe = match updated {
        Ok(Some(recipe)) => recipe,
        failed => {
            // 커밋되지 않았으므로 방금 저장한 새 이미지는 고아 파일이 됩니다
            if let Some(path) = &new_image {
                images::remove_image(&state.media_path, path).await;
            }
            return Err(match failed {
                Err(e) => e,
                Ok(_) => AppError::NotFound,
            });
        }
    };

    if new_image.is_some() && existing.image != recipe.image {
        images::remove_image(&state.media_path, &existing.image).await;
    }

    tracing::info!(recipe_id = %recipe.id, "recipe updated");
    Ok(Json(
        recipe_response(&state.pool, recipe, Some(&auth_user.user_id)).await?,
    ))
}

/// `DELETE /recipes/{id}/`
///
/// 재료 수량, 태그, 즐겨찾기, 장바구니 행은 CASCADE로 함께 삭제되고
/// 이미지 파일도 지웁니다.
pub async fn delete_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let recipe = find_recipe(&state.pool, &id).await?;
    ensure_author(&recipe, &auth_user)?;

    if !db::delete_recipe(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    images::remove_image(&state.media_path, &recipe.image).await;

    tracing::info!(recipe_id = %id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /recipes/{id}/favorite/`
pub async fn add_favorite(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<RecipeShort>), AppError> {
    let recipe = find_recipe(&state.pool, &id).await?;
    db::add_favorite(&state.pool, &auth_user.user_id, &recipe.id).await?;

    Ok((StatusCode::CREATED, Json(RecipeShort::new(recipe))))
}

/// `DELETE /recipes/{id}/favorite/`
pub async fn remove_favorite(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let recipe = find_recipe(&state.pool, &id).await?;
    if !db::remove_favorite(&state.pool, &auth_user.user_id, &recipe.id).await? {
        return Err(AppError::BadRequest("Recipe is not in favorites".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /recipes/{id}/shopping_cart/`
pub async fn add_to_shopping_cart(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<RecipeShort>), AppError> {
    let recipe = find_recipe(&state.pool, &id).await?;
    db::add_to_shopping_cart(&state.pool, &auth_user.user_id, &recipe.id).await?;

    Ok((StatusCode::CREATED, Json(RecipeShort::new(recipe))))
}

/// `DELETE /recipes/{id}/shopping_cart/`
pub async fn remove_from_shopping_cart(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let recipe = find_recipe(&state.pool, &id).await?;
    if !db::remove_from_shopping_cart(&state.pool, &auth_user.user_id, &recipe.id).await? {
        return Err(AppError::BadRequest(
            "Recipe is not in the shopping cart".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /recipes/download_shopping_cart/`
///
/// 장바구니 재료를 합산한 텍스트 파일을 첨부파일로 내려줍니다.
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Response, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found".to_string()))?;

    let lines = db::aggregate_cart(&state.pool, &user.id).await?;
    let body = shopping_list::render(&user.username, Utc::now().date_naive(), &lines);

    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            shopping_list::content_disposition(&user.username),
        ),
    ];

    Ok((StatusCode::OK, headers, body).into_response())
}
