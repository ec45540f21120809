//! # Foodgram 백엔드 라이브러리
//!
//! 레시피 공유 서비스의 HTTP/JSON API입니다. 사용자는 레시피를 올리고,
//! 다른 작성자를 구독하고, 레시피를 즐겨찾기/장바구니에 담고,
//! 장바구니 재료를 합산한 쇼핑 목록을 텍스트 파일로 내려받습니다.
//!
//! 실행 바이너리(`main.rs`, `bin/load_data.rs`)와 통합 테스트(`tests/`)가
//! 모두 이 라이브러리를 사용합니다.
//!
//! ## 모듈 구조
//! ```text
//! routes/     HTTP 핸들러 (요청 파싱, 권한 확인, 응답 조립)
//!   ↓
//! services/   검증기, 이미지 저장, 쇼핑 목록 렌더링
//!   ↓
//! db/         SQL 쿼리와 트랜잭션
//!   ↓
//! models/     DB 행 / 요청 / 응답 구조체
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use axum::{http::HeaderValue, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub use routes::AppState;

/// 전체 애플리케이션 라우터를 만듭니다.
///
/// - `/api/...`: API 라우트 (`routes::api_router`)
/// - `/media/...`: 업로드된 레시피 이미지 (읽기 전용 정적 파일)
///
/// `cors_allow_origin`이 None이면 모든 출처를 허용합니다.
pub fn build_app(state: AppState, cors_allow_origin: Option<&str>) -> anyhow::Result<Router> {
    let allow_origin = match cors_allow_origin {
        Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin)?),
        None => AllowOrigin::from(Any),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    let media = ServeDir::new(&state.media_path);

    Ok(Router::new()
        .nest("/api", routes::api_router(state))
        .nest_service("/media", media)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
