#![allow(dead_code)]

use axum::{extract::State, http::StatusCode, Json};
use foodgram::{
    db::{self, users as db_users},
    middleware::{
        auth::{AuthUser, MaybeAuthUser},
        json::AppJson,
    },
    models::*,
    routes::recipes,
    AppState,
};
use tempfile::TempDir;

// 1x1 투명 PNG
pub const PNG_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub struct TestApp {
    pub state: AppState,
    // Dropping the TempDir deletes the media directory
    pub media: TempDir,
}

impl TestApp {
    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.state.pool
    }

    pub fn state(&self) -> State<AppState> {
        State(self.state.clone())
    }
}

/// In-memory database with migrations applied and a throwaway media directory.
///
/// One connection only: every connection to `sqlite::memory:` would open its own database.
pub async fn setup() -> TestApp {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    db::migrate(&pool).await.unwrap();

    let media = tempfile::tempdir().unwrap();
    let state = AppState {
        pool,
        media_path: media.path().to_str().unwrap().to_string(),
        jwt_secret: "test-secret".to_string(),
        access_token_ttl_minutes: 15,
    };

    TestApp { state, media }
}

/// Same as `setup()` but backed by a database file, so several connections share it.
pub async fn setup_file_backed(max_connections: u32) -> TestApp {
    let media = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", media.path().join("foodgram.sqlite3").display());
    let pool = db::connect(&url, max_connections).await.unwrap();
    db::migrate(&pool).await.unwrap();

    let state = AppState {
        pool,
        media_path: media.path().to_str().unwrap().to_string(),
        jwt_secret: "test-secret".to_string(),
        access_token_ttl_minutes: 15,
    };

    TestApp { state, media }
}

/// Inserts a user directly. The password hash is a placeholder, so these users cannot log in.
pub async fn create_user(app: &TestApp, username: &str) -> (User, AuthUser) {
    let id = uuid::Uuid::now_v7().to_string();
    let user = db_users::create_user(
        app.pool(),
        &id,
        &format!("{username}@example.com"),
        username,
        "",
        "",
        "not-a-real-hash",
    )
    .await
    .unwrap();

    let auth = AuthUser { user_id: user.id.clone() };
    (user, auth)
}

pub fn viewer(auth: &AuthUser) -> MaybeAuthUser {
    MaybeAuthUser(Some(auth.clone()))
}

pub fn anonymous() -> MaybeAuthUser {
    MaybeAuthUser(None)
}

pub async fn create_ingredient(app: &TestApp, name: &str, unit: &str) -> Ingredient {
    db::create_ingredient(
        app.pool(),
        &NewIngredient {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn create_tag(app: &TestApp, name: &str, slug: &str) -> Tag {
    db::create_tag(
        app.pool(),
        &NewTag {
            name: name.to_string(),
            color: "#E26C2D".to_string(),
            slug: Some(slug.to_string()),
        },
    )
    .await
    .unwrap()
}

pub fn amount(ingredient: &Ingredient, amount: i64) -> IngredientAmount {
    IngredientAmount {
        id: ingredient.id.clone(),
        amount,
    }
}

pub fn create_request(
    name: &str,
    tags: &[&Tag],
    ingredients: Vec<IngredientAmount>,
) -> CreateRecipeRequest {
    CreateRecipeRequest {
        tags: Some(tags.iter().map(|tag| tag.id.clone()).collect()),
        ingredients: Some(ingredients),
        name: Some(name.to_string()),
        image: Some(PNG_URI.to_string()),
        text: Some(format!("How to cook {name}")),
        cooking_time: Some(10),
    }
}

/// Creates a recipe through the handler and returns its response body.
pub async fn create_recipe(
    app: &TestApp,
    author: &AuthUser,
    name: &str,
    tags: &[&Tag],
    ingredients: Vec<IngredientAmount>,
) -> RecipeResponse {
    let (status, Json(recipe)) = recipes::create_recipe(
        app.state(),
        author.clone(),
        AppJson(create_request(name, tags, ingredients)),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    recipe
}

pub async fn count(app: &TestApp, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(app.pool())
        .await
        .unwrap()
}
