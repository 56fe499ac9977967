//! Analytics routes.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::services::analytics::{self, AnalyticsError, ResearchAnalytics, ResearchAreaAnalytics};
use crate::state::AppState;

pub(crate) fn analytics_error_to_status(err: &AnalyticsError) -> StatusCode {
    match err {
        AnalyticsError::NoData(_) => StatusCode::NOT_FOUND,
        AnalyticsError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `GET /api/analytics/research` — trend-table rollup and key metrics.
pub async fn research(State(state): State<AppState>) -> Result<Json<ResearchAnalytics>, StatusCode> {
    let analytics = analytics::research_analytics(&state.pool).await.map_err(|e| {
        if matches!(&e, AnalyticsError::Database(_)) {
            tracing::error!(error = %e, "research analytics query failed");
        }
        analytics_error_to_status(&e)
    })?;
    Ok(Json(analytics))
}

#[derive(Debug, Default, Deserialize)]
pub struct AreaQuery {
    pub institution: Option<String>,
    pub department: Option<String>,
}

/// `GET /api/analytics/research-areas` — expertise-derived area scoring
/// with momentum, optionally filtered by institution and department.
pub async fn research_areas(
    State(state): State<AppState>,
    Query(filters): Query<AreaQuery>,
) -> Result<Json<ResearchAreaAnalytics>, StatusCode> {
    let analytics = analytics::research_areas(
        &state.pool,
        filters.institution.as_deref(),
        filters.department.as_deref(),
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "research area analysis failed");
        analytics_error_to_status(&e)
    })?;
    Ok(Json(analytics))
}

#[cfg(test)]
#[path = "analytics_test.rs"]
mod tests;
