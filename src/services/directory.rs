//! Faculty directory — reads, upserts, and JSONL import/export records.
//!
//! DESIGN
//! ======
//! Every operation is a direct statement against the remote tables. Ingest
//! upserts faculty keyed on `profile_url` (the source directory's stable
//! identifier) and matches publications by DOI when present, falling back
//! to (title, year). Authorship links are upserted per (faculty,
//! publication) pair.

use std::collections::HashMap;

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("faculty not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Faculty row as stored. Bibliometric counters stay optional: the source
/// directory omits them for some members.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FacultyRecord {
    pub id: Uuid,
    pub name: String,
    pub profile_url: String,
    pub gender: Option<String>,
    pub department: Option<String>,
    pub institution: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub orcid_id: Option<String>,
    pub google_scholar_id: Option<String>,
    pub expertise: Option<Vec<String>>,
    pub citations: Option<i32>,
    pub h_index: Option<i32>,
    pub i10_index: Option<i32>,
    pub google_scholar_url: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct PublicationRecord {
    pub id: Uuid,
    pub title: String,
    pub year: Option<i32>,
    pub publication_type: Option<String>,
    pub doi: Option<String>,
    pub r#abstract: Option<String>,
    pub venue: Option<String>,
    pub publisher: Option<String>,
    pub citation_count: i32,
    pub impact_factor: Option<f64>,
    pub paper_url: Option<String>,
    pub pdf_url: Option<String>,
}

/// A publication as authored by a specific faculty member.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthoredPublication {
    pub author_position: Option<i32>,
    pub is_corresponding: Option<bool>,
    pub publication: PublicationRecord,
}

pub(crate) const FACULTY_COLUMNS: &str = "id, name, profile_url, gender, department, institution, email, \
     photo_url, orcid_id, google_scholar_id, expertise, citations, h_index, i10_index, \
     google_scholar_url, linkedin_url";

pub(crate) const PUBLICATION_COLUMNS: &str = "id, title, year, publication_type, doi, abstract, venue, \
     publisher, citation_count, impact_factor, paper_url, pdf_url";

/// `publications`-qualified column list for joined queries, where bare
/// `id`/`created_at` would be ambiguous.
pub(crate) const PUBLICATION_COLUMNS_P: &str = "p.id, p.title, p.year, p.publication_type, p.doi, \
     p.abstract, p.venue, p.publisher, p.citation_count, p.impact_factor, p.paper_url, p.pdf_url";

pub(crate) fn faculty_from_row(row: &PgRow) -> FacultyRecord {
    FacultyRecord {
        id: row.get("id"),
        name: row.get("name"),
        profile_url: row.get("profile_url"),
        gender: row.get("gender"),
        department: row.get("department"),
        institution: row.get("institution"),
        email: row.get("email"),
        photo_url: row.get("photo_url"),
        orcid_id: row.get("orcid_id"),
        google_scholar_id: row.get("google_scholar_id"),
        expertise: row.get("expertise"),
        citations: row.get("citations"),
        h_index: row.get("h_index"),
        i10_index: row.get("i10_index"),
        google_scholar_url: row.get("google_scholar_url"),
        linkedin_url: row.get("linkedin_url"),
    }
}

pub(crate) fn publication_from_row(row: &PgRow) -> PublicationRecord {
    PublicationRecord {
        id: row.get("id"),
        title: row.get("title"),
        year: row.get("year"),
        publication_type: row.get("publication_type"),
        doi: row.get("doi"),
        r#abstract: row.get("abstract"),
        venue: row.get("venue"),
        publisher: row.get("publisher"),
        citation_count: row.get("citation_count"),
        impact_factor: row.get("impact_factor"),
        paper_url: row.get("paper_url"),
        pdf_url: row.get("pdf_url"),
    }
}

// =============================================================================
// READS
// =============================================================================

/// List all faculty, most cited first.
pub async fn list_faculty(pool: &PgPool) -> Result<Vec<FacultyRecord>, DirectoryError> {
    let rows = sqlx::query(&format!(
        "SELECT {FACULTY_COLUMNS} FROM faculty ORDER BY citations DESC NULLS LAST, name ASC",
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(faculty_from_row).collect())
}

/// Fetch one faculty member.
///
/// # Errors
///
/// `NotFound` when no such member exists.
pub async fn get_faculty(pool: &PgPool, id: Uuid) -> Result<FacultyRecord, DirectoryError> {
    let row = sqlx::query(&format!("SELECT {FACULTY_COLUMNS} FROM faculty WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DirectoryError::NotFound(id))?;

    Ok(faculty_from_row(&row))
}

/// List one member's publications, newest first.
pub async fn faculty_publications(pool: &PgPool, faculty_id: Uuid) -> Result<Vec<PublicationRecord>, DirectoryError> {
    let rows = sqlx::query(&format!(
        "SELECT {PUBLICATION_COLUMNS_P} FROM publications p
         JOIN faculty_publications fp ON fp.publication_id = p.id
         WHERE fp.faculty_id = $1
         ORDER BY p.year DESC NULLS LAST, p.title ASC",
    ))
    .bind(faculty_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(publication_from_row).collect())
}

/// Fetch one faculty member together with every authored publication.
pub async fn get_faculty_with_publications(
    pool: &PgPool,
    id: Uuid,
) -> Result<(FacultyRecord, Vec<AuthoredPublication>), DirectoryError> {
    let faculty = get_faculty(pool, id).await?;

    let rows = sqlx::query(&format!(
        "SELECT fp.author_position, fp.is_corresponding, {PUBLICATION_COLUMNS_P}
         FROM faculty_publications fp
         JOIN publications p ON p.id = fp.publication_id
         WHERE fp.faculty_id = $1
         ORDER BY p.year DESC NULLS LAST, p.title ASC",
    ))
    .bind(id)
    .fetch_all(pool)
    .await?;

    let authored = rows
        .iter()
        .map(|row| AuthoredPublication {
            author_position: row.get("author_position"),
            is_corresponding: row.get("is_corresponding"),
            publication: publication_from_row(row),
        })
        .collect();

    Ok((faculty, authored))
}

/// Search faculty by name, department, institution, or expertise.
pub async fn search_faculty(pool: &PgPool, query: &str) -> Result<Vec<FacultyRecord>, DirectoryError> {
    let pattern = format!("%{}%", query.trim());
    let rows = sqlx::query(&format!(
        "SELECT {FACULTY_COLUMNS} FROM faculty
         WHERE name ILIKE $1
            OR department ILIKE $1
            OR institution ILIKE $1
            OR EXISTS (SELECT 1 FROM unnest(expertise) AS e WHERE e ILIKE $1)
         ORDER BY citations DESC NULLS LAST, name ASC",
    ))
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(faculty_from_row).collect())
}

// =============================================================================
// IMPORT / EXPORT
// =============================================================================

/// One line of a directory JSONL import.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImportRecord {
    Faculty(FacultyImport),
    Publication(PublicationImport),
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct FacultyImport {
    pub name: String,
    pub profile_url: String,
    pub gender: Option<String>,
    pub department: Option<String>,
    pub institution: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub orcid_id: Option<String>,
    pub google_scholar_id: Option<String>,
    pub expertise: Option<Vec<String>>,
    pub citations: Option<i32>,
    pub h_index: Option<i32>,
    pub i10_index: Option<i32>,
    pub google_scholar_url: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct PublicationImport {
    pub title: String,
    pub year: Option<i32>,
    pub publication_type: Option<String>,
    pub doi: Option<String>,
    pub r#abstract: Option<String>,
    pub venue: Option<String>,
    pub publisher: Option<String>,
    #[serde(default)]
    pub citation_count: i32,
    pub impact_factor: Option<f64>,
    pub paper_url: Option<String>,
    pub pdf_url: Option<String>,
    /// Authorship link back to an already-imported faculty line.
    pub faculty_profile_url: Option<String>,
    pub author_position: Option<i32>,
    pub is_corresponding: Option<bool>,
}

#[derive(Debug, Default, serde::Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Parse one import line. Blank lines yield `None`; unknown line types and
/// malformed JSON are errors the caller counts as skipped.
pub(crate) fn parse_import_line(line: &str) -> Result<Option<ImportRecord>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<ImportRecord>(trimmed).map(Some)
}

/// Upsert a faculty row keyed on `profile_url`, returning its id.
pub async fn upsert_faculty(pool: &PgPool, record: &FacultyImport) -> Result<Uuid, DirectoryError> {
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO faculty (name, profile_url, gender, department, institution, email, photo_url,
                              orcid_id, google_scholar_id, expertise, citations, h_index, i10_index,
                              google_scholar_url, linkedin_url)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         ON CONFLICT (profile_url) DO UPDATE SET
             name = EXCLUDED.name,
             gender = COALESCE(EXCLUDED.gender, faculty.gender),
             department = COALESCE(EXCLUDED.department, faculty.department),
             institution = COALESCE(EXCLUDED.institution, faculty.institution),
             email = COALESCE(EXCLUDED.email, faculty.email),
             photo_url = COALESCE(EXCLUDED.photo_url, faculty.photo_url),
             orcid_id = COALESCE(EXCLUDED.orcid_id, faculty.orcid_id),
             google_scholar_id = COALESCE(EXCLUDED.google_scholar_id, faculty.google_scholar_id),
             expertise = COALESCE(EXCLUDED.expertise, faculty.expertise),
             citations = COALESCE(EXCLUDED.citations, faculty.citations),
             h_index = COALESCE(EXCLUDED.h_index, faculty.h_index),
             i10_index = COALESCE(EXCLUDED.i10_index, faculty.i10_index),
             google_scholar_url = COALESCE(EXCLUDED.google_scholar_url, faculty.google_scholar_url),
             linkedin_url = COALESCE(EXCLUDED.linkedin_url, faculty.linkedin_url),
             updated_at = now()
         RETURNING id",
    )
    .bind(&record.name)
    .bind(&record.profile_url)
    .bind(&record.gender)
    .bind(&record.department)
    .bind(&record.institution)
    .bind(&record.email)
    .bind(&record.photo_url)
    .bind(&record.orcid_id)
    .bind(&record.google_scholar_id)
    .bind(&record.expertise)
    .bind(record.citations)
    .bind(record.h_index)
    .bind(record.i10_index)
    .bind(&record.google_scholar_url)
    .bind(&record.linkedin_url)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Upsert a publication, matching by DOI when present, else (title, year).
pub async fn upsert_publication(pool: &PgPool, record: &PublicationImport) -> Result<Uuid, DirectoryError> {
    let existing = if let Some(doi) = record.doi.as_deref() {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM publications WHERE doi = $1")
            .bind(doi)
            .fetch_optional(pool)
            .await?
    } else {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM publications WHERE title = $1 AND year IS NOT DISTINCT FROM $2",
        )
        .bind(&record.title)
        .bind(record.year)
        .fetch_optional(pool)
        .await?
    };

    let id = if let Some(id) = existing {
        sqlx::query(
            "UPDATE publications SET
                 title = $2,
                 year = COALESCE($3, year),
                 publication_type = COALESCE($4, publication_type),
                 doi = COALESCE($5, doi),
                 abstract = COALESCE($6, abstract),
                 venue = COALESCE($7, venue),
                 publisher = COALESCE($8, publisher),
                 citation_count = $9,
                 impact_factor = COALESCE($10, impact_factor),
                 paper_url = COALESCE($11, paper_url),
                 pdf_url = COALESCE($12, pdf_url),
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&record.title)
        .bind(record.year)
        .bind(&record.publication_type)
        .bind(&record.doi)
        .bind(&record.r#abstract)
        .bind(&record.venue)
        .bind(&record.publisher)
        .bind(record.citation_count)
        .bind(record.impact_factor)
        .bind(&record.paper_url)
        .bind(&record.pdf_url)
        .execute(pool)
        .await
        .map(|_| id)?
    } else {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO publications (title, year, publication_type, doi, abstract, venue, publisher,
                                       citation_count, impact_factor, paper_url, pdf_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id",
        )
        .bind(&record.title)
        .bind(record.year)
        .bind(&record.publication_type)
        .bind(&record.doi)
        .bind(&record.r#abstract)
        .bind(&record.venue)
        .bind(&record.publisher)
        .bind(record.citation_count)
        .bind(record.impact_factor)
        .bind(&record.paper_url)
        .bind(&record.pdf_url)
        .fetch_one(pool)
        .await?
    };

    Ok(id)
}

/// Upsert the authorship link between a faculty member and a publication.
pub async fn link_author(
    pool: &PgPool,
    faculty_id: Uuid,
    publication_id: Uuid,
    author_position: Option<i32>,
    is_corresponding: Option<bool>,
) -> Result<(), DirectoryError> {
    sqlx::query(
        "INSERT INTO faculty_publications (faculty_id, publication_id, author_position, is_corresponding)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (faculty_id, publication_id) DO UPDATE SET
             author_position = EXCLUDED.author_position,
             is_corresponding = EXCLUDED.is_corresponding",
    )
    .bind(faculty_id)
    .bind(publication_id)
    .bind(author_position)
    .bind(is_corresponding)
    .execute(pool)
    .await?;

    Ok(())
}

/// Import a JSONL payload of faculty and publication lines. Malformed lines
/// are skipped and counted; each valid line is applied independently.
pub async fn import_jsonl(pool: &PgPool, jsonl: &str) -> Result<ImportSummary, DirectoryError> {
    let mut summary = ImportSummary::default();
    // Faculty lines seen in this payload, for resolving authorship links
    // without a second lookup.
    let mut seen_faculty: HashMap<String, Uuid> = HashMap::new();

    for raw_line in jsonl.lines() {
        let record = match parse_import_line(raw_line) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed import line");
                summary.skipped = summary.skipped.saturating_add(1);
                continue;
            }
        };

        match record {
            ImportRecord::Faculty(faculty) => {
                let id = upsert_faculty(pool, &faculty).await?;
                seen_faculty.insert(faculty.profile_url.clone(), id);
                summary.imported += 1;
            }
            ImportRecord::Publication(publication) => {
                let publication_id = upsert_publication(pool, &publication).await?;
                if let Some(profile_url) = publication.faculty_profile_url.as_deref() {
                    let faculty_id = match seen_faculty.get(profile_url) {
                        Some(id) => Some(*id),
                        None => {
                            sqlx::query_scalar::<_, Uuid>("SELECT id FROM faculty WHERE profile_url = $1")
                                .bind(profile_url)
                                .fetch_optional(pool)
                                .await?
                        }
                    };
                    match faculty_id {
                        Some(faculty_id) => {
                            link_author(
                                pool,
                                faculty_id,
                                publication_id,
                                publication.author_position,
                                publication.is_corresponding,
                            )
                            .await?;
                        }
                        None => {
                            tracing::warn!(profile_url, "publication references unknown faculty");
                        }
                    }
                }
                summary.imported += 1;
            }
        }
    }

    Ok(summary)
}

/// Rows for the JSONL export: every faculty line, then one publication line
/// per authorship link.
pub async fn export_records(pool: &PgPool) -> Result<Vec<ImportRecord>, DirectoryError> {
    let faculty_rows = sqlx::query(&format!(
        "SELECT {FACULTY_COLUMNS} FROM faculty ORDER BY name ASC",
    ))
    .fetch_all(pool)
    .await?;

    let mut records: Vec<ImportRecord> = faculty_rows
        .iter()
        .map(|row| {
            let faculty = faculty_from_row(row);
            ImportRecord::Faculty(FacultyImport {
                name: faculty.name,
                profile_url: faculty.profile_url,
                gender: faculty.gender,
                department: faculty.department,
                institution: faculty.institution,
                email: faculty.email,
                photo_url: faculty.photo_url,
                orcid_id: faculty.orcid_id,
                google_scholar_id: faculty.google_scholar_id,
                expertise: faculty.expertise,
                citations: faculty.citations,
                h_index: faculty.h_index,
                i10_index: faculty.i10_index,
                google_scholar_url: faculty.google_scholar_url,
                linkedin_url: faculty.linkedin_url,
            })
        })
        .collect();

    let publication_rows = sqlx::query(&format!(
        "SELECT f.profile_url AS faculty_profile_url, fp.author_position, fp.is_corresponding,
                {PUBLICATION_COLUMNS_P}
         FROM faculty_publications fp
         JOIN faculty f ON f.id = fp.faculty_id
         JOIN publications p ON p.id = fp.publication_id
         ORDER BY f.profile_url ASC, p.year DESC NULLS LAST, p.title ASC",
    ))
    .fetch_all(pool)
    .await?;

    for row in &publication_rows {
        let publication = publication_from_row(row);
        records.push(ImportRecord::Publication(PublicationImport {
            title: publication.title,
            year: publication.year,
            publication_type: publication.publication_type,
            doi: publication.doi,
            r#abstract: publication.r#abstract,
            venue: publication.venue,
            publisher: publication.publisher,
            citation_count: publication.citation_count,
            impact_factor: publication.impact_factor,
            paper_url: publication.paper_url,
            pdf_url: publication.pdf_url,
            faculty_profile_url: Some(row.get("faculty_profile_url")),
            author_position: row.get("author_position"),
            is_corresponding: row.get("is_corresponding"),
        }));
    }

    Ok(records)
}

#[cfg(test)]
#[path = "directory_test.rs"]
mod tests;
