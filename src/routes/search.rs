//! Search routes — grouped free-text search, filter options, classification.
//!
//! ERROR HANDLING
//! ==============
//! `/api/search/all` contains failures per group: a group whose query fails
//! is logged and returned empty while the other groups still come back.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::accounts::ProfileRecord;
use crate::services::analytics::TrendRecord;
use crate::services::directory::{FacultyRecord, PublicationRecord};
use crate::services::domains;
use crate::services::search::{self, PublicationAuthor, PublicationHit, SearchFilters};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;
const TREND_GROUP_LIMIT: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub filters: Option<SearchFilters>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl SearchRequest {
    fn page_window(&self) -> (i64, i64) {
        let limit = self.limit.clamp(1, MAX_LIMIT);
        let page = self.page.max(1);
        (limit, (page - 1) * limit)
    }
}

// =============================================================================
// RESPONSE ITEMS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct FacultySearchItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub description: String,
    pub expertise: Vec<String>,
    pub photo_url: Option<String>,
    pub citations: Option<i32>,
    pub h_index: Option<i32>,
    pub google_scholar_url: Option<String>,
    pub orcid_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileSearchItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub description: String,
    pub department: String,
    pub research_interests: Vec<String>,
    pub bio: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublicationSearchItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub description: String,
    pub year: Option<i32>,
    pub publication_type: Option<String>,
    pub doi: Option<String>,
    pub venue: Option<String>,
    pub publisher: Option<String>,
    pub citation_count: i32,
    pub impact_factor: Option<f64>,
    pub paper_url: Option<String>,
    pub authors: Vec<PublicationAuthor>,
}

#[derive(Debug, Serialize)]
pub struct TrendSearchItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub description: String,
    pub year: i32,
    pub quarter: i32,
    pub publication_count: i32,
    pub citation_count: i32,
    pub faculty_count: i32,
    pub trending_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SearchAllResponse {
    pub faculty: Vec<FacultySearchItem>,
    pub profiles: Vec<ProfileSearchItem>,
    pub publications: Vec<PublicationSearchItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trends: Option<Vec<TrendSearchItem>>,
}

fn affiliation_line(department: Option<&str>, institution: Option<&str>) -> String {
    format!("{} at {}", department.unwrap_or_default(), institution.unwrap_or_default())
}

/// First 200 characters of an abstract, with a trailing ellipsis whenever
/// the abstract is non-empty.
pub(crate) fn truncate_abstract(text: Option<&str>) -> String {
    match text {
        Some(text) if !text.is_empty() => {
            let mut truncated: String = text.chars().take(200).collect();
            truncated.push_str("...");
            truncated
        }
        _ => String::new(),
    }
}

pub(crate) fn faculty_item(record: FacultyRecord) -> FacultySearchItem {
    FacultySearchItem {
        id: record.id,
        kind: "faculty",
        description: affiliation_line(record.department.as_deref(), record.institution.as_deref()),
        title: record.name,
        expertise: record.expertise.unwrap_or_default(),
        photo_url: record.photo_url,
        citations: record.citations,
        h_index: record.h_index,
        google_scholar_url: record.google_scholar_url,
        orcid_id: record.orcid_id,
    }
}

pub(crate) fn profile_item(record: ProfileRecord) -> ProfileSearchItem {
    ProfileSearchItem {
        id: record.id,
        kind: "profile",
        title: record.full_name.unwrap_or_default(),
        description: affiliation_line(record.position.as_deref(), record.institution.as_deref()),
        department: record.department.unwrap_or_default(),
        research_interests: record.research_interests.unwrap_or_default(),
        bio: record.bio.unwrap_or_default(),
        avatar_url: record.avatar_url,
    }
}

pub(crate) fn publication_item(hit: PublicationHit) -> PublicationSearchItem {
    let publication = hit.publication;
    PublicationSearchItem {
        id: publication.id,
        kind: "publication",
        description: truncate_abstract(publication.r#abstract.as_deref()),
        title: publication.title,
        year: publication.year,
        publication_type: publication.publication_type,
        doi: publication.doi,
        venue: publication.venue,
        publisher: publication.publisher,
        citation_count: publication.citation_count,
        impact_factor: publication.impact_factor,
        paper_url: publication.paper_url,
        authors: hit.authors,
    }
}

pub(crate) fn trend_item(record: TrendRecord) -> TrendSearchItem {
    let growth = record.growth_rate.map(|g| g.to_string()).unwrap_or_default();
    TrendSearchItem {
        id: record.id,
        kind: "trend",
        description: format!("Category: {} | Growth Rate: {growth}", record.category.as_deref().unwrap_or_default()),
        title: record.topic,
        year: record.year,
        quarter: record.quarter,
        publication_count: record.publication_count,
        citation_count: record.citation_count,
        faculty_count: record.faculty_count,
        trending_score: record.trending_score,
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/search/all` — grouped search across faculty, profiles,
/// publications, and trends.
pub async fn search_all(State(state): State<AppState>, Json(body): Json<SearchRequest>) -> Json<SearchAllResponse> {
    let (limit, offset) = body.page_window();
    let filters = body.filters.clone().unwrap_or_default();
    let query = body.query.as_str();

    let faculty = match search::faculty_group(&state.pool, query, &filters, limit, offset).await {
        Ok(records) => records.into_iter().map(faculty_item).collect(),
        Err(e) => {
            tracing::error!(error = %e, "faculty search failed");
            Vec::new()
        }
    };

    let profiles = match search::profiles_group(&state.pool, query, limit, offset).await {
        Ok(records) => records.into_iter().map(profile_item).collect(),
        Err(e) => {
            tracing::error!(error = %e, "profile search failed");
            Vec::new()
        }
    };

    let publications = match search::publications_group(&state.pool, query, limit, offset).await {
        Ok(hits) => hits.into_iter().map(publication_item).collect(),
        Err(e) => {
            tracing::error!(error = %e, "publication search failed");
            Vec::new()
        }
    };

    let trends = match search::trends_group(&state.pool, query, TREND_GROUP_LIMIT).await {
        Ok(records) if !records.is_empty() => Some(records.into_iter().map(trend_item).collect()),
        Ok(_) => None,
        Err(e) => {
            tracing::error!(error = %e, "trend search failed");
            None
        }
    };

    Json(SearchAllResponse { faculty, profiles, publications, trends })
}

#[derive(Debug, Serialize)]
pub struct ProfileNameItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse<T> {
    pub results: Vec<T>,
}

/// `POST /api/search/faculty` — name/department search over end-user
/// profiles.
pub async fn search_faculty(
    State(state): State<AppState>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<ResultsResponse<ProfileNameItem>>, StatusCode> {
    let (limit, _) = body.page_window();
    let results = search::profile_name_search(&state.pool, &body.query, limit)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "faculty profile search failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .into_iter()
        .map(|record| ProfileNameItem {
            id: record.id,
            kind: "faculty",
            name: record.full_name.unwrap_or_default(),
            position: record.position,
            department: record.department,
            email: record.email,
            avatar_url: record.avatar_url,
        })
        .collect();

    Ok(Json(ResultsResponse { results }))
}

#[derive(Debug, Serialize)]
pub struct PublicationTextItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub r#abstract: Option<String>,
    pub year: Option<i32>,
    pub publication_type: Option<String>,
    pub doi: Option<String>,
    pub venue: Option<String>,
    pub publisher: Option<String>,
    pub citation_count: i32,
    pub impact_factor: Option<f64>,
    pub paper_url: Option<String>,
    pub pdf_url: Option<String>,
}

fn publication_text_item(record: PublicationRecord) -> PublicationTextItem {
    PublicationTextItem {
        id: record.id,
        kind: "publication",
        title: record.title,
        r#abstract: record.r#abstract,
        year: record.year,
        publication_type: record.publication_type,
        doi: record.doi,
        venue: record.venue,
        publisher: record.publisher,
        citation_count: record.citation_count,
        impact_factor: record.impact_factor,
        paper_url: record.paper_url,
        pdf_url: record.pdf_url,
    }
}

/// `POST /api/search/publications` — title/abstract publication search.
pub async fn search_publications(
    State(state): State<AppState>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<ResultsResponse<PublicationTextItem>>, StatusCode> {
    let (limit, _) = body.page_window();
    let results = search::publication_text_search(&state.pool, &body.query, limit)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "publication search failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .into_iter()
        .map(publication_text_item)
        .collect();

    Ok(Json(ResultsResponse { results }))
}

#[derive(Debug, Serialize)]
pub struct ClassifyDomainResponse {
    pub domains: Vec<Vec<String>>,
}

/// `POST /api/search/classify-domain` — tag texts against the domain
/// taxonomy.
pub async fn classify_domain(Json(texts): Json<Vec<String>>) -> Json<ClassifyDomainResponse> {
    Json(ClassifyDomainResponse { domains: domains::classify_batch(&texts) })
}

/// `GET /api/search/filter-options` — distinct filter values.
pub async fn filter_options(State(state): State<AppState>) -> Result<Json<search::FilterOptions>, StatusCode> {
    let options = search::filter_options(&state.pool).await.map_err(|e| {
        tracing::error!(error = %e, "filter options query failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(options))
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
