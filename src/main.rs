//! # Foodgram 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 미디어 디렉토리 생성
//! 6. 라우터 설정
//! 7. HTTP 서버 시작 (Ctrl+C / SIGTERM 시 진행 중인 요청을 마치고 종료)

use anyhow::Result;
use foodgram::{build_app, config::Config, db, AppState};
use std::path::Path;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다
    dotenvy::dotenv().ok();

    // RUST_LOG가 없으면 foodgram, tower_http, axum 모듈을 debug 레벨로 출력
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodgram=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting Foodgram server on {}:{}", config.host, config.port);

    let pool = db::connect(&config.database_url, config.max_connections).await?;

    tracing::info!("Running database migrations...");
    db::migrate(&pool).await?;

    // 레시피 이미지 저장 디렉토리 (mkdir -p)
    let media_path = Path::new(&config.media_path);
    if !media_path.exists() {
        tokio::fs::create_dir_all(media_path).await?;
        tracing::info!("Created media directory: {}", config.media_path);
    }

    let state = AppState {
        pool: pool.clone(),
        media_path: config.media_path.clone(),
        jwt_secret: config.jwt_secret.clone(),
        access_token_ttl_minutes: config.access_token_ttl_minutes,
    };

    if config.cors_allow_origin.is_none() {
        tracing::warn!("CORS_ALLOW_ORIGIN is not set, allowing any origin");
    }
    let app = build_app(state, config.cors_allow_origin.as_deref())?;

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

/// Ctrl+C 또는 (유닉스에서) SIGTERM을 기다립니다.
///
/// 시그널 핸들러 설치에 실패하면 해당 시그널은 기다리지 않고 경고만 남깁니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
