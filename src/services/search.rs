//! Cross-table search — faculty, profiles, publications, trends.
//!
//! DESIGN
//! ======
//! Case-insensitive substring matching per group, with optional filters on
//! the faculty group and offset pagination. Each group is queried
//! independently so a failing group degrades to empty at the call site
//! instead of failing the whole request.

use std::collections::HashMap;

use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use crate::services::accounts::{PROFILE_COLUMNS, ProfileRecord, profile_from_row};
use crate::services::analytics::{TREND_COLUMNS, TrendRecord, normalize_institution, trend_from_row};
use crate::services::directory::{
    FACULTY_COLUMNS, FacultyRecord, PUBLICATION_COLUMNS, PublicationRecord, faculty_from_row, publication_from_row,
};
use crate::services::domains;

/// Optional narrowing filters for the faculty group. Unknown filter keys
/// from older clients are ignored.
#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub department: Vec<String>,
    #[serde(default)]
    pub institution: Vec<String>,
    #[serde(default)]
    pub domain: Vec<String>,
}

impl SearchFilters {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.department.is_empty() && self.institution.is_empty() && self.domain.is_empty()
    }
}

/// An author entry attached to a publication search hit.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PublicationAuthor {
    pub name: String,
    pub department: Option<String>,
    pub institution: Option<String>,
    pub position: Option<i32>,
    pub is_corresponding: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct PublicationHit {
    pub publication: PublicationRecord,
    pub authors: Vec<PublicationAuthor>,
}

fn ilike_pattern(query: &str) -> String {
    format!("%{}%", query.trim())
}

/// Faculty matching the query, narrowed by the active filters.
pub async fn faculty_group(
    pool: &PgPool,
    query: &str,
    filters: &SearchFilters,
    limit: i64,
    offset: i64,
) -> Result<Vec<FacultyRecord>, sqlx::Error> {
    let pattern = ilike_pattern(query);

    let mut builder: QueryBuilder<'_, sqlx::Postgres> =
        QueryBuilder::new(format!("SELECT {FACULTY_COLUMNS} FROM faculty WHERE (name ILIKE "));
    builder.push_bind(pattern.clone());
    builder.push(" OR department ILIKE ");
    builder.push_bind(pattern.clone());
    builder.push(" OR institution ILIKE ");
    builder.push_bind(pattern.clone());
    builder.push(" OR EXISTS (SELECT 1 FROM unnest(expertise) AS e WHERE e ILIKE ");
    builder.push_bind(pattern);
    builder.push("))");

    if !filters.department.is_empty() {
        builder.push(" AND department = ANY(");
        builder.push_bind(filters.department.clone());
        builder.push(")");
    }
    if !filters.institution.is_empty() {
        builder.push(" AND institution = ANY(");
        builder.push_bind(filters.institution.clone());
        builder.push(")");
    }
    if !filters.domain.is_empty() {
        builder.push(" AND EXISTS (SELECT 1 FROM unnest(expertise) AS e, unnest(");
        builder.push_bind(filters.domain.clone());
        builder.push(") AS d WHERE e ILIKE ('%' || d || '%'))");
    }

    builder.push(" ORDER BY citations DESC NULLS LAST, name ASC LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    let rows = builder.build().fetch_all(pool).await?;
    Ok(rows.iter().map(faculty_from_row).collect())
}

/// End-user profiles matching the query.
pub async fn profiles_group(
    pool: &PgPool,
    query: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProfileRecord>, sqlx::Error> {
    let pattern = ilike_pattern(query);
    let rows = sqlx::query(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles
         WHERE full_name ILIKE $1
            OR department ILIKE $1
            OR institution ILIKE $1
            OR EXISTS (SELECT 1 FROM unnest(research_interests) AS i WHERE i ILIKE $1)
         ORDER BY full_name ASC NULLS LAST
         LIMIT $2 OFFSET $3",
    ))
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(profile_from_row).collect())
}

/// Publications matching the query, each carrying its author list.
pub async fn publications_group(
    pool: &PgPool,
    query: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<PublicationHit>, sqlx::Error> {
    let pattern = ilike_pattern(query);
    let rows = sqlx::query(&format!(
        "SELECT {PUBLICATION_COLUMNS} FROM publications
         WHERE title ILIKE $1
            OR abstract ILIKE $1
            OR venue ILIKE $1
            OR publisher ILIKE $1
         ORDER BY citation_count DESC, title ASC
         LIMIT $2 OFFSET $3",
    ))
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let publications: Vec<PublicationRecord> = rows.iter().map(publication_from_row).collect();
    let ids: Vec<Uuid> = publications.iter().map(|p| p.id).collect();

    let mut authors_by_publication: HashMap<Uuid, Vec<PublicationAuthor>> = HashMap::new();
    if !ids.is_empty() {
        let author_rows = sqlx::query(
            "SELECT fp.publication_id, f.name, f.department, f.institution,
                    fp.author_position, fp.is_corresponding
             FROM faculty_publications fp
             JOIN faculty f ON f.id = fp.faculty_id
             WHERE fp.publication_id = ANY($1)
             ORDER BY fp.author_position ASC NULLS LAST, f.name ASC",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        for row in &author_rows {
            authors_by_publication
                .entry(row.get("publication_id"))
                .or_default()
                .push(PublicationAuthor {
                    name: row.get("name"),
                    department: row.get("department"),
                    institution: row.get("institution"),
                    position: row.get("author_position"),
                    is_corresponding: row.get("is_corresponding"),
                });
        }
    }

    Ok(publications
        .into_iter()
        .map(|publication| {
            let authors = authors_by_publication.remove(&publication.id).unwrap_or_default();
            PublicationHit { publication, authors }
        })
        .collect())
}

/// Trend rows matching the query, best score first.
pub async fn trends_group(pool: &PgPool, query: &str, limit: i64) -> Result<Vec<TrendRecord>, sqlx::Error> {
    let pattern = ilike_pattern(query);
    let rows = sqlx::query(&format!(
        "SELECT {TREND_COLUMNS} FROM research_trends
         WHERE topic ILIKE $1 OR category ILIKE $1
         ORDER BY trending_score DESC NULLS LAST, topic ASC
         LIMIT $2",
    ))
    .bind(&pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(trend_from_row).collect())
}

/// Narrower profile search backing `POST /api/search/faculty`.
pub async fn profile_name_search(pool: &PgPool, query: &str, limit: i64) -> Result<Vec<ProfileRecord>, sqlx::Error> {
    let pattern = ilike_pattern(query);
    let rows = sqlx::query(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles
         WHERE full_name ILIKE $1 OR department ILIKE $1
         ORDER BY full_name ASC NULLS LAST
         LIMIT $2",
    ))
    .bind(&pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(profile_from_row).collect())
}

/// Title/abstract publication search backing `POST /api/search/publications`.
pub async fn publication_text_search(
    pool: &PgPool,
    query: &str,
    limit: i64,
) -> Result<Vec<PublicationRecord>, sqlx::Error> {
    let pattern = ilike_pattern(query);
    let rows = sqlx::query(&format!(
        "SELECT {PUBLICATION_COLUMNS} FROM publications
         WHERE title ILIKE $1 OR abstract ILIKE $1
         ORDER BY citation_count DESC, title ASC
         LIMIT $2",
    ))
    .bind(&pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(publication_from_row).collect())
}

/// Distinct filter values offered to clients.
#[derive(Debug, Default, serde::Serialize)]
pub struct FilterOptions {
    pub departments: Vec<String>,
    pub institutions: Vec<String>,
    pub domains: Vec<String>,
}

/// Deduplicate institution names by their normalized form, keeping the
/// first spelling seen (input is sorted, so the result stays sorted).
#[must_use]
pub fn dedupe_institutions(sorted: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    sorted
        .into_iter()
        .filter(|name| seen.insert(normalize_institution(name)))
        .collect()
}

/// Merge the fixed taxonomy with trend categories into one sorted list.
#[must_use]
pub fn merge_domains(categories: Vec<String>) -> Vec<String> {
    let mut domains: Vec<String> = domains::RESEARCH_DOMAINS.iter().map(|d| (*d).to_owned()).collect();
    domains.extend(categories);
    domains.sort();
    domains.dedup();
    domains
}

/// Distinct departments, institutions, and domains for the filter panel.
pub async fn filter_options(pool: &PgPool) -> Result<FilterOptions, sqlx::Error> {
    let departments = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT department FROM faculty WHERE department IS NOT NULL ORDER BY department ASC",
    )
    .fetch_all(pool)
    .await?;

    let institutions = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT institution FROM faculty WHERE institution IS NOT NULL ORDER BY institution ASC",
    )
    .fetch_all(pool)
    .await?;

    let categories = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT category FROM research_trends WHERE category IS NOT NULL ORDER BY category ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(FilterOptions {
        departments,
        institutions: dedupe_institutions(institutions),
        domains: merge_domains(categories),
    })
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
