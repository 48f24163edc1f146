//! # Catalog API
//!
//! List, filter, and detail endpoints over the served session.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use unovadex_core::catalog::{LoadReport, Record, Stat};
use unovadex_core::filter::{self, TypeTagInfo, KNOWN_TYPES};
use unovadex_core::{Screen, Session, TypeFilter};

use super::{CatalogState, SharedState};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

type ApiError = (StatusCode, Json<ApiResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ApiResponse {
            success: false,
            message: message.into(),
        }),
    )
}

fn unavailable(error: &str) -> ApiError {
    api_error(
        StatusCode::SERVICE_UNAVAILABLE,
        format!("Catalog unavailable: {}", error),
    )
}

/// Card on the list screen
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordCard {
    pub id: u32,
    pub name: String,
    pub display_name: String,
    pub sprite_url: String,
    pub types: Vec<String>,
}

impl From<&Record> for RecordCard {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            display_name: record.display_name(),
            sprite_url: record.sprite_url.clone(),
            types: record.types.clone(),
        }
    }
}

/// Payload of the detail screen
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordDetail {
    pub id: u32,
    pub name: String,
    pub display_name: String,
    pub sprite_url: String,
    pub height_m: f64,
    pub weight_kg: f64,
    pub stats: Vec<Stat>,
    pub stats_summary: String,
    pub abilities: Vec<String>,
    pub abilities_summary: String,
    pub types: Vec<String>,
}

impl From<&Record> for RecordDetail {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            display_name: record.name.to_uppercase(),
            sprite_url: record.sprite_url.clone(),
            height_m: record.height_meters(),
            weight_kg: record.weight_kilograms(),
            stats: record.stats.clone(),
            stats_summary: record.stats_summary(),
            abilities: record.abilities.clone(),
            abilities_summary: record.abilities_summary(),
            types: record.types.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogResponse {
    /// "ready" or "unavailable"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub filter: TypeFilter,
    pub filter_label: String,
    pub records: Vec<RecordCard>,
    /// Loaded catalog but nothing matches the filter
    pub no_results: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<LoadReport>,
}

impl CatalogResponse {
    fn from_state(state: &CatalogState) -> Self {
        match state {
            CatalogState::Ready(session) => Self::from_session(session),
            CatalogState::Unavailable { error } => Self {
                status: "unavailable".to_string(),
                error: Some(error.clone()),
                filter: TypeFilter::All,
                filter_label: TypeFilter::All.label().to_string(),
                records: Vec::new(),
                no_results: false,
                report: None,
            },
        }
    }

    fn from_session(session: &Session) -> Self {
        let records: Vec<RecordCard> = session
            .displayed()
            .iter()
            .map(|r| RecordCard::from(r.as_ref()))
            .collect();
        Self {
            status: "ready".to_string(),
            error: None,
            filter: session.active_filter().clone(),
            filter_label: session.active_filter().label().to_string(),
            no_results: records.is_empty(),
            records,
            report: Some(session.catalog().report().clone()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScreenResponse {
    /// "list" or "detail"
    pub screen: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordDetail>,
}

impl From<&Screen> for ScreenResponse {
    fn from(screen: &Screen) -> Self {
        match screen {
            Screen::List => Self {
                screen: "list".to_string(),
                record: None,
            },
            Screen::Detail(record) => Self {
                screen: "detail".to_string(),
                record: Some(RecordDetail::from(record.as_ref())),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TypesResponse {
    pub known: &'static [TypeTagInfo],
    /// Tags present in the loaded catalog
    pub present: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    /// Empty string selects every record
    #[serde(default)]
    pub tag: String,
}

pub fn catalog_routes() -> Router<SharedState> {
    Router::new()
        .route("/catalog", get(get_catalog))
        .route("/types", get(get_types))
        .route("/filter", post(set_filter))
        .route("/select/:id", post(select_record))
        .route("/back", post(go_back))
        .route("/screen", get(get_screen))
        .route("/reload", post(reload))
}

/// Displayed subset and load status
async fn get_catalog(State(state): State<SharedState>) -> Json<CatalogResponse> {
    let catalog = state.catalog.read().await;
    Json(CatalogResponse::from_state(&catalog))
}

async fn get_types(State(state): State<SharedState>) -> Json<TypesResponse> {
    let present = match &*state.catalog.read().await {
        CatalogState::Ready(session) => filter::available_types(session.catalog()),
        CatalogState::Unavailable { .. } => Vec::new(),
    };
    Json(TypesResponse {
        known: KNOWN_TYPES,
        present,
    })
}

async fn set_filter(
    State(state): State<SharedState>,
    Json(req): Json<FilterRequest>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let mut catalog = state.catalog.write().await;
    match &mut *catalog {
        CatalogState::Ready(session) => {
            session.set_type_filter(TypeFilter::parse(&req.tag));
            Ok(Json(CatalogResponse::from_session(session)))
        }
        CatalogState::Unavailable { error } => Err(unavailable(error)),
    }
}

async fn select_record(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> Result<Json<ScreenResponse>, ApiError> {
    let mut catalog = state.catalog.write().await;
    match &mut *catalog {
        CatalogState::Ready(session) => {
            if session.select_record(id) {
                Ok(Json(ScreenResponse::from(session.screen())))
            } else {
                Err(api_error(
                    StatusCode::NOT_FOUND,
                    format!("No record with id {}", id),
                ))
            }
        }
        CatalogState::Unavailable { error } => Err(unavailable(error)),
    }
}

async fn go_back(State(state): State<SharedState>) -> Result<Json<ScreenResponse>, ApiError> {
    let mut catalog = state.catalog.write().await;
    match &mut *catalog {
        CatalogState::Ready(session) => {
            session.go_back();
            Ok(Json(ScreenResponse::from(session.screen())))
        }
        CatalogState::Unavailable { error } => Err(unavailable(error)),
    }
}

async fn get_screen(State(state): State<SharedState>) -> Result<Json<ScreenResponse>, ApiError> {
    match &*state.catalog.read().await {
        CatalogState::Ready(session) => Ok(Json(ScreenResponse::from(session.screen()))),
        CatalogState::Unavailable { error } => Err(unavailable(error)),
    }
}

/// Manual retry of the whole load
async fn reload(State(state): State<SharedState>) -> Json<CatalogResponse> {
    tracing::info!("Reloading catalog");
    state.reload().await;
    get_catalog(State(Arc::clone(&state))).await
}
