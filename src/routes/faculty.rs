//! Faculty directory routes, including JSONL ingest and export.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::directory::{self, AuthoredPublication, DirectoryError, FacultyRecord, PublicationRecord};
use crate::state::AppState;

pub(crate) fn directory_error_to_status(err: DirectoryError) -> StatusCode {
    match err {
        DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
        DirectoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `GET /api/faculty` — the full directory, most cited first.
pub async fn list_faculty(State(state): State<AppState>) -> Result<Json<Vec<FacultyRecord>>, StatusCode> {
    let faculty = directory::list_faculty(&state.pool).await.map_err(|e| {
        tracing::error!(error = %e, "faculty list query failed");
        directory_error_to_status(e)
    })?;
    Ok(Json(faculty))
}

/// One faculty member with every authored publication.
#[derive(Serialize)]
pub struct FacultyDetail {
    #[serde(flatten)]
    pub faculty: FacultyRecord,
    pub faculty_publications: Vec<AuthoredPublication>,
}

/// `GET /api/faculty/:id` — one member with authored publications.
pub async fn get_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<Uuid>,
) -> Result<Json<FacultyDetail>, StatusCode> {
    let (faculty, faculty_publications) = directory::get_faculty_with_publications(&state.pool, faculty_id)
        .await
        .map_err(directory_error_to_status)?;
    Ok(Json(FacultyDetail { faculty, faculty_publications }))
}

/// `GET /api/faculty/:id/publications` — one member's publications.
pub async fn list_publications(
    State(state): State<AppState>,
    Path(faculty_id): Path<Uuid>,
) -> Result<Json<Vec<PublicationRecord>>, StatusCode> {
    let publications = directory::faculty_publications(&state.pool, faculty_id)
        .await
        .map_err(directory_error_to_status)?;
    Ok(Json(publications))
}

/// `GET /api/faculty/search/:query` — directory search.
pub async fn search(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<FacultyRecord>>, StatusCode> {
    let faculty = directory::search_faculty(&state.pool, &query).await.map_err(|e| {
        tracing::error!(error = %e, "faculty search query failed");
        directory_error_to_status(e)
    })?;
    Ok(Json(faculty))
}

#[derive(Deserialize)]
pub struct ImportJsonlBody {
    pub jsonl: String,
}

/// `POST /api/faculty/import.jsonl` — ingest faculty and publication lines.
pub async fn import_jsonl(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(body): Json<ImportJsonlBody>,
) -> Result<Json<directory::ImportSummary>, StatusCode> {
    let summary = directory::import_jsonl(&state.pool, &body.jsonl).await.map_err(|e| {
        tracing::error!(error = %e, "directory import failed");
        directory_error_to_status(e)
    })?;

    tracing::info!(imported = summary.imported, skipped = summary.skipped, "directory import finished");
    Ok(Json(summary))
}

#[derive(Serialize)]
struct ExportMetaLine {
    #[serde(rename = "type")]
    line_type: &'static str,
    version: u8,
    exported_at_ms: u128,
    record_count: usize,
}

/// `GET /api/faculty/export.jsonl` — stream the directory as JSONL.
pub async fn export_jsonl(State(state): State<AppState>, _auth: AuthUser) -> Result<Response, StatusCode> {
    let records = directory::export_records(&state.pool).await.map_err(|e| {
        tracing::error!(error = %e, "directory export failed");
        directory_error_to_status(e)
    })?;

    let exported_at_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis());

    let mut lines = Vec::with_capacity(records.len() + 1);
    let meta = ExportMetaLine {
        line_type: "directory_export_meta",
        version: 1,
        exported_at_ms,
        record_count: records.len(),
    };
    let meta_line = serde_json::to_string(&meta).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    lines.push(format!("{meta_line}\n"));

    for record in records {
        let serialized = serde_json::to_string(&record).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        lines.push(format!("{serialized}\n"));
    }

    let stream = futures::stream::iter(
        lines
            .into_iter()
            .map(|line| Ok::<axum::body::Bytes, std::convert::Infallible>(axum::body::Bytes::from(line))),
    );
    let body = axum::body::Body::from_stream(stream);

    Ok((
        [
            (CONTENT_TYPE, "application/x-ndjson; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"scholarsphere-directory.jsonl\""),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
#[path = "faculty_test.rs"]
mod tests;
