use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use plate_cut::packer::Packer;
use plate_cut::request::{MAX_PIECES, check_piece_total, parse_requests};
use plate_cut::types::{PackOptions, PackingResult, StockPlate};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct CalculateRequest {
    plate: StockPlate,
    /// Validated per entry so a bad request can be named in the error.
    requests: Vec<serde_json::Value>,
    #[serde(default)]
    options: PackOptions,
}

#[derive(Clone, Copy)]
struct AppConfig {
    max_pieces: u64,
}

async fn calculate(
    State(config): State<AppConfig>,
    Json(req): Json<CalculateRequest>,
) -> Result<Json<PackingResult>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /calculate"
    );

    let requests = parse_requests(&req.requests)
        .and_then(|requests| {
            check_piece_total(&requests, config.max_pieces)?;
            Ok(requests)
        })
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let packer = Packer::new(req.plate, req.options);
    let result = tokio::task::spawn_blocking(move || packer.pack(&requests))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "packing task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(Json(result))
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");
    let config = AppConfig {
        max_pieces: std::env::var("MAX_PIECES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(MAX_PIECES),
    };

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/calculate", post(calculate))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.expect("server error");
}
