use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::header::{HeaderName, HeaderValue, CONTENT_TYPE},
    http::Method,
    http::Request,
    middleware,
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use clap::Parser;
use dotenvy::dotenv;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use yubin_common::loader::load_postal_table;
use yubin_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use yubin_common::table::PostalTable;

pub mod error;
pub mod handlers;

use error::ApiError;
use handlers::{health, resolve};

const SHUTDOWN_DRAIN_GRACE: std::time::Duration = std::time::Duration::from_millis(200);

#[derive(Debug, Clone, Parser)]
#[command(name = "yubin-api", about = "HTTP API for postal-code and address resolution")]
struct Cli {
    /// Path to the nationwide postal-code table (KEN_ALL.CSV, Shift_JIS)
    #[arg(long, env = "KEN_ALL_PATH")]
    ken_all_path: PathBuf,

    /// Path to the large-account office table (JIGYOSYO.CSV, Shift_JIS)
    #[arg(long, env = "JIGYOSYO_PATH")]
    jigyosyo_path: PathBuf,

    /// Server port
    #[arg(long, env = "PORT", default_value_t = 3002)]
    port: u16,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "YUBIN_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ken_all_path: PathBuf,
    pub jigyosyo_path: PathBuf,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    fn from_cli(cli: Cli) -> Result<Self, ApiError> {
        let cors_origins = cli
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect::<Vec<_>>();

        if cors_origins.iter().any(|origin| origin == "*") {
            return Err(ApiError::BadRequest(
                "YUBIN_CORS_ORIGINS must list explicit origins".into(),
            ));
        }

        Ok(Self {
            ken_all_path: cli.ken_all_path,
            jigyosyo_path: cli.jigyosyo_path,
            port: cli.port,
            cors_origins,
        })
    }

    pub fn for_tests() -> Self {
        Self {
            ken_all_path: PathBuf::from("KEN_ALL.CSV"),
            jigyosyo_path: PathBuf::from("JIGYOSYO.CSV"),
            port: 3002,
            cors_origins: vec!["http://localhost:3000".into()],
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub table: Arc<PostalTable>,
    pub config: AppConfig,
    pub readiness: Arc<AtomicBool>,
}

pub type SharedState = Arc<AppState>;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

async fn attach_request_id_context(req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    error::with_request_id(request_id, next.run(req)).await
}

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_header = request_id_header.clone();

    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(&trace_header)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let api_routes = Router::new().route("/postalcode", get(resolve::resolve_postalcode));

    Router::new()
        .route("/livez", get(health::livez))
        .route("/readyz", get(health::readyz))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(attach_request_id_context))
        .layer(DefaultBodyLimit::max(16 * 1024))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid::default(),
        ))
        .layer(cors)
        .with_state(state)
}

pub fn test_state(table: PostalTable) -> SharedState {
    Arc::new(AppState {
        table: Arc::new(table),
        config: AppConfig::for_tests(),
        readiness: Arc::new(AtomicBool::new(true)),
    })
}

pub async fn run() -> Result<(), ApiError> {
    dotenv().ok();
    init_tracing_subscriber("yubin-api");
    install_tracing_panic_hook("yubin-api");

    let cli = Cli::parse();
    let config = AppConfig::from_cli(cli)?;

    // 参照データはここで一度だけ読み込み、以後は不変スナップショットを共有する
    let table = load_postal_table(&config.ken_all_path, &config.jigyosyo_path)?;

    let state = Arc::new(AppState {
        table: Arc::new(table),
        config: config.clone(),
        readiness: Arc::new(AtomicBool::new(true)),
    });

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let app = create_router(state.clone());

    info!(%addr, "yubin-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal(state: SharedState) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    state
        .readiness
        .store(false, std::sync::atomic::Ordering::SeqCst);

    // Give load balancers a brief window to observe /readyz as not ready
    // before axum stops accepting new connections.
    tokio::time::sleep(SHUTDOWN_DRAIN_GRACE).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(origins: &str) -> Cli {
        Cli {
            ken_all_path: PathBuf::from("KEN_ALL.CSV"),
            jigyosyo_path: PathBuf::from("JIGYOSYO.CSV"),
            port: 3002,
            cors_origins: origins.to_string(),
        }
    }

    #[test]
    fn config_splits_and_trims_cors_origins() {
        let config = AppConfig::from_cli(cli("http://a.example , http://b.example,")).unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["http://a.example".to_string(), "http://b.example".to_string()]
        );
    }

    #[test]
    fn config_rejects_wildcard_origin() {
        let result = AppConfig::from_cli(cli("*"));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
