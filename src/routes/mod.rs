//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 공유 상태(`AppState`), API 라우터를 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 토큰 발급 (로그인, 토큰 갱신, 로그아웃)
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `ingredients`: 재료 목록/상세
//! - `recipes`: 레시피 CRUD, 즐겨찾기, 장바구니, 쇼핑 목록 다운로드
//! - `tags`: 태그 목록/상세
//! - `users`: 회원가입, 사용자 조회, 비밀번호 변경, 구독

pub mod auth;
pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

use axum::{
    routing::{get, post, MethodRouter},
    Router,
};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool은 내부적으로 Arc를 사용하므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀
    pub pool: SqlitePool,
    /// 레시피 이미지 저장 루트 디렉토리
    pub media_path: String,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// 액세스 토큰 유효 시간(분)
    pub access_token_ttl_minutes: i64,
}

/// 같은 핸들러를 `/path`와 `/path/` 두 경로에 등록합니다.
///
/// 클라이언트마다 끝 슬래시 사용이 달라서 두 형태를 모두 받습니다.
fn route_both(
    router: Router<AppState>,
    path: &str,
    method_router: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}

/// `/api` 아래에 중첩될 API 라우터를 만듭니다.
///
/// 경로 파라미터는 axum 0.8 문법(`{id}`)을 사용합니다.
/// `/users/me`, `/recipes/download_shopping_cart` 같은 고정 경로는
/// `{id}` 경로보다 우선 매칭됩니다.
pub fn api_router(state: AppState) -> Router {
    let routes: [(&str, MethodRouter<AppState>); 19] = [
        ("/health", get(health::health_check)),
        // 인증
        ("/auth/token/login", post(auth::login)),
        ("/auth/token/refresh", post(auth::refresh)),
        ("/auth/token/logout", post(auth::logout)),
        // 사용자와 구독
        ("/users", get(users::list_users).post(users::register)),
        ("/users/me", get(users::me)),
        ("/users/set_password", post(users::set_password)),
        ("/users/subscriptions", get(users::subscriptions)),
        ("/users/{id}", get(users::get_user)),
        (
            "/users/{id}/subscribe",
            post(users::subscribe).delete(users::unsubscribe),
        ),
        // 태그와 재료 (읽기 전용)
        ("/tags", get(tags::list_tags)),
        ("/tags/{id}", get(tags::get_tag)),
        ("/ingredients", get(ingredients::list_ingredients)),
        ("/ingredients/{id}", get(ingredients::get_ingredient)),
        // 레시피
        (
            "/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        ),
        (
            "/recipes/download_shopping_cart",
            get(recipes::download_shopping_cart),
        ),
        (
            "/recipes/{id}",
            get(recipes::get_recipe)
                .patch(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        ),
        (
            "/recipes/{id}/favorite",
            post(recipes::add_favorite).delete(recipes::remove_favorite),
        ),
        (
            "/recipes/{id}/shopping_cart",
            post(recipes::add_to_shopping_cart).delete(recipes::remove_from_shopping_cart),
        ),
    ];

    routes
        .into_iter()
        .fold(Router::new(), |router, (path, method_router)| {
            route_both(router, path, method_router)
        })
        .with_state(state)
}
