//! Axum-based HTTP API over the price service

use crate::config::DisplayConfig;
use crate::error::PorssiError;
use crate::prices::{BoardSnapshot, CurrentPrice, PriceBand, format_current};
use crate::service::PriceService;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PriceService>,
}

/// Current price as served to clients
#[derive(Debug, Serialize)]
pub struct CurrentView {
    #[serde(flatten)]
    pub current: CurrentPrice,
    pub display: String,
    pub band: Option<PriceBand>,
}

impl CurrentView {
    fn new(current: CurrentPrice, display: &DisplayConfig) -> Self {
        let band = match current {
            CurrentPrice::Available(p) => Some(PriceBand::classify(p, display)),
            CurrentPrice::Loading | CurrentPrice::Unavailable => None,
        };
        Self {
            display: format_current(&current),
            current,
            band,
        }
    }
}

/// One hour row as served to clients
#[derive(Debug, Serialize)]
pub struct EntryView {
    pub date: NaiveDate,
    pub hour: u8,
    pub price: Option<f64>,
    pub band: Option<PriceBand>,
}

/// Board plus current price as served to clients
#[derive(Debug, Serialize)]
pub struct PricesView {
    pub cycle_id: u64,
    pub reference: Option<NaiveDateTime>,
    pub loading: bool,
    pub total_slots: usize,
    pub resolved: usize,
    pub current: CurrentView,
    pub entries: Vec<EntryView>,
}

impl PricesView {
    pub fn new(snapshot: &BoardSnapshot, display: &DisplayConfig) -> Self {
        Self {
            cycle_id: snapshot.cycle_id,
            reference: snapshot.reference,
            loading: snapshot.loading,
            total_slots: snapshot.total_slots,
            resolved: snapshot.resolved(),
            current: CurrentView::new(snapshot.current, display),
            entries: snapshot
                .entries
                .iter()
                .map(|e| EntryView {
                    date: e.slot.date(),
                    hour: e.slot.hour(),
                    price: e.price,
                    band: e.price.map(|p| PriceBand::classify(p, display)),
                })
                .collect(),
        }
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/health", responses(
    (status = 200, description = "Service is healthy")
)))]
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/prices", responses(
    (status = 200, description = "Current price and the upcoming hours board")
)))]
pub async fn prices(State(state): State<AppState>) -> impl IntoResponse {
    let svc = &state.service;
    Json(PricesView::new(&svc.board(), &svc.config().display))
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/prices/current", responses(
    (status = 200, description = "Current hour price")
)))]
pub async fn current_price(State(state): State<AppState>) -> impl IntoResponse {
    let svc = &state.service;
    Json(CurrentView::new(svc.current_price(), &svc.config().display))
}

#[cfg_attr(feature = "openapi", utoipa::path(post, path = "/api/refresh", responses(
    (status = 202, description = "Refresh started"),
    (status = 409, description = "A refresh is already running")
)))]
pub async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    if state.service.spawn_refresh() {
        (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({"status": "started"})),
        )
    } else {
        (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"status": "in_progress"})),
        )
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/events", responses((status = 200))))]
pub async fn events(State(state): State<AppState>) -> impl IntoResponse {
    let service = Arc::clone(&state.service);
    let rx = service.subscribe_board();
    let stream = WatchStream::new(rx).filter_map(move |snapshot| {
        let view = PricesView::new(&snapshot, &service.config().display);
        serde_json::to_string(&view).ok().map(|payload| {
            Ok::<Event, std::convert::Infallible>(Event::default().event("board").data(payload))
        })
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/config", responses((status = 200))))]
pub async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    let json = serde_json::to_value(state.service.config())
        .unwrap_or_else(|_| serde_json::json!({"error":"serialization"}));
    Json(json)
}

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(health, prices, current_price, refresh, events, get_config),
    tags((name = "porssi", description = "Porssi spot price API"))
)]
pub struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/api/health", get(health))
        .route("/api/prices", get(prices))
        .route("/api/prices/current", get(current_price))
        .route("/api/refresh", post(refresh))
        .route("/api/events", get(events))
        .route("/api/config", get(get_config));

    #[cfg(feature = "openapi")]
    let router = {
        use utoipa::OpenApi as _;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()),
        )
    };

    let router = router
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    #[cfg(feature = "compression")]
    let router = router.layer(tower_http::compression::CompressionLayer::new());

    router
}

pub async fn serve(service: Arc<PriceService>, host: &str, port: u16) -> anyhow::Result<()> {
    let router = build_router(AppState { service });

    let logger = crate::logging::get_logger("web");
    logger.info(&format!(
        "Starting web server; requested host={}, port={}",
        host, port
    ));

    let addr = match host.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, port),
        Err(_) => {
            logger.warn(&format!("Invalid host '{}'; falling back to 127.0.0.1", host));
            ([127, 0, 0, 1], port).into()
        }
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| PorssiError::web(format!("Failed to bind {}: {}", addr, e)))?;
    let local_addr = listener.local_addr()?;
    logger.info(&format!(
        "Web server listening at http://{}:{} (API /api)",
        local_addr.ip(),
        local_addr.port()
    ));

    axum::serve(listener, router).await?;
    Ok(())
}
