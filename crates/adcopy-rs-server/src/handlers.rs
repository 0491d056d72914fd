//! Route handlers and their wire types.

use crate::error::ApiError;
use crate::state::AppState;
use adcopy_rs_core::{AdBrief, Diagnostics, GenerationRecord, HistoryQuery};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Successful generation: `{ok:true, id, text, createdAt}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub ok: bool,
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<GenerationRecord> for GenerateResponse {
    fn from(record: GenerationRecord) -> Self {
        Self {
            ok: true,
            id: record.id,
            text: record.generated_text,
            created_at: record.created_at,
        }
    }
}

/// One row of `GET /ads/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: i64,
    pub product: String,
    pub tone: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<GenerationRecord> for HistoryItem {
    fn from(record: GenerationRecord) -> Self {
        Self {
            id: record.id,
            product: record.product,
            tone: record.tone,
            text: record.generated_text,
            created_at: record.created_at,
        }
    }
}

/// Query string of `GET /ads/history`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub product: Option<String>,
}

impl HistoryParams {
    fn into_query(self, state: &AppState) -> Result<HistoryQuery, ApiError> {
        let limit = self.limit.unwrap_or(state.history.default_limit);
        if limit > state.history.max_limit {
            return Err(ApiError::invalid_argument(format!(
                "limit must be at most {}",
                state.history.max_limit
            )));
        }
        let mut query = HistoryQuery::first(limit).offset(self.offset.unwrap_or(0));
        if let Some(product) = self.product {
            query = query.product(product);
        }
        Ok(query)
    }
}

#[derive(Serialize)]
pub(crate) struct DiagnosticsResponse {
    status: &'static str,
    #[serde(flatten)]
    diagnostics: Diagnostics,
}

pub(crate) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    Json(DiagnosticsResponse {
        status: "ok",
        diagnostics: state.service.diagnostics(),
    })
}

pub(crate) async fn generate_from_body(
    State(state): State<AppState>,
    brief: Result<Json<AdBrief>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(brief) = brief?;
    generate(&state, brief).await
}

pub(crate) async fn generate_from_query(
    State(state): State<AppState>,
    brief: Result<Query<AdBrief>, QueryRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Query(brief) = brief?;
    generate(&state, brief).await
}

async fn generate(state: &AppState, brief: AdBrief) -> Result<Json<GenerateResponse>, ApiError> {
    let record = state.service.generate_and_record(&brief).await?;
    Ok(Json(record.into()))
}

pub(crate) async fn history(
    State(state): State<AppState>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<Vec<HistoryItem>>, ApiError> {
    let Query(params) = params?;
    let query = params.into_query(&state)?;
    let records = state.service.history(&query).await?;
    debug!(
        "history served (limit={}, offset={}, returned={})",
        query.limit,
        query.offset,
        records.len()
    );
    Ok(Json(records.into_iter().map(HistoryItem::from).collect()))
}
