use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::Deserialize;

use super::SharedState;
use super::error::ApiResult;
use crate::core::currency::{self, CurrencyCode};
use crate::core::rates::{HealthResponse, RatesResponse, TrendSeries};

#[derive(Debug, Deserialize)]
pub struct BaseQuery {
    base: Option<String>,
}

impl BaseQuery {
    fn code(&self) -> ApiResult<CurrencyCode> {
        Ok(CurrencyCode::or_default(self.base.as_deref())?)
    }
}

pub async fn get_rates(
    Query(params): Query<BaseQuery>,
    State(state): State<SharedState>,
) -> ApiResult<Json<RatesResponse>> {
    let base = params.code()?;
    Ok(Json(state.rates.rates_for(&base).await))
}

pub async fn get_history(
    Query(params): Query<BaseQuery>,
    State(state): State<SharedState>,
) -> ApiResult<Json<TrendSeries>> {
    let base = params.code()?;
    Ok(Json(state.trends.series(&base)))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        ok: true,
        currencies: currency::supported_codes(),
        timestamp: Some(Utc::now()),
    })
}
