//! Assistant — keyword intent routing and canned replies over live tables.
//!
//! DESIGN
//! ======
//! Messages are routed by keyword lists, first match wins. Every reply is
//! assembled from a fresh table read; a failed read degrades to a canned
//! apology for that intent rather than an error response.

use std::collections::{BTreeSet, HashMap};

use sqlx::{PgPool, Row};

use crate::services::analytics::{self, TrendRecord};
use crate::services::directory::{self, FacultyRecord, PUBLICATION_COLUMNS_P, PublicationRecord, publication_from_row};

const FACULTY_PREVIEW: usize = 10;
const SEARCH_PREVIEW: usize = 5;
const TOP_INSTITUTIONS: usize = 5;
const TOP_TRENDS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    AllFaculty,
    Faculty,
    Institution,
    Publication,
    Research,
    Statistics,
    Search,
    Help,
}

/// Route a message to an intent. First matching keyword list wins.
#[must_use]
pub fn classify_intent(message: &str) -> Intent {
    let lowered = message.to_lowercase();
    let has = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

    if has(&["show all faculty", "all faculty", "every faculty"]) {
        Intent::AllFaculty
    } else if has(&["faculty", "professor", "researcher", "teacher"]) {
        Intent::Faculty
    } else if has(&["institution", "university", "college", "school"]) {
        Intent::Institution
    } else if has(&["publication", "paper", "research paper", "article"]) {
        Intent::Publication
    } else if has(&["research", "trend", "analytics", "study"]) {
        Intent::Research
    } else if has(&["statistics", "stats", "total", "count", "how many"]) {
        Intent::Statistics
    } else if has(&["find", "search", "who"]) {
        Intent::Search
    } else {
        Intent::Help
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

/// Top faculty by citations, with a "… and N more" tail past the preview.
#[must_use]
pub fn format_faculty_overview(faculty: &[FacultyRecord]) -> String {
    if faculty.is_empty() {
        return "No faculty members found in the database.".to_owned();
    }

    let info = faculty
        .iter()
        .take(FACULTY_PREVIEW)
        .map(|f| {
            format!(
                "• {} ({}) - {}\n  Citations: {}, H-index: {}",
                f.name,
                or_na(f.department.as_deref()),
                or_na(f.institution.as_deref()),
                f.citations.unwrap_or(0),
                f.h_index.unwrap_or(0),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut message = format!("Here are the top faculty members by citations:\n\n{info}");
    if faculty.len() > FACULTY_PREVIEW {
        message.push_str(&format!(
            "\n\n... and {} more faculty members.\nTotal faculty: {}",
            faculty.len() - FACULTY_PREVIEW,
            faculty.len(),
        ));
    } else {
        message.push_str(&format!("\n\nTotal faculty: {}", faculty.len()));
    }
    message
}

/// The complete roster, one line per member.
#[must_use]
pub fn format_all_faculty(faculty: &[FacultyRecord]) -> String {
    if faculty.is_empty() {
        return "No faculty members found in the database.".to_owned();
    }

    let info = faculty
        .iter()
        .map(|f| {
            format!(
                "• {} ({}) - {}",
                f.name,
                or_na(f.department.as_deref()),
                or_na(f.institution.as_deref()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("Here are all faculty members ({}):\n\n{info}", faculty.len())
}

/// Top institutions by member count, with department spread.
#[must_use]
pub fn format_institutions(faculty: &[FacultyRecord]) -> String {
    if faculty.is_empty() {
        return "No institution data found in the database.".to_owned();
    }

    let mut stats: HashMap<&str, (usize, BTreeSet<&str>)> = HashMap::new();
    for member in faculty {
        let Some(institution) = member.institution.as_deref() else {
            continue;
        };
        let entry = stats.entry(institution).or_default();
        entry.0 += 1;
        if let Some(department) = member.department.as_deref() {
            entry.1.insert(department);
        }
    }

    let total = stats.len();
    let mut ranked: Vec<(&str, usize, usize)> = stats
        .into_iter()
        .map(|(institution, (count, departments))| (institution, count, departments.len()))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let info = ranked
        .iter()
        .take(TOP_INSTITUTIONS)
        .map(|(institution, count, departments)| {
            format!("• {institution}\n  Faculty: {count}, Departments: {departments}")
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("Here are the top institutions by faculty count:\n\n{info}\n\nTotal institutions: {total}")
}

/// Publications matched for the message, with bibliometric lines.
#[must_use]
pub fn format_publications(query: &str, publications: &[PublicationRecord]) -> String {
    if publications.is_empty() {
        return "No publications found for the given faculty.".to_owned();
    }

    let info = publications
        .iter()
        .map(|p| {
            let year = p.year.map_or_else(|| "N/A".to_owned(), |y| y.to_string());
            format!(
                "• {}\n  Citations: {}\n  Venue: {}\n  Year: {year}",
                p.title,
                p.citation_count,
                or_na(p.venue.as_deref()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Here are the publications for {query}:\n\n{info}\n\nTotal publications: {}",
        publications.len(),
    )
}

/// Top research trends by trending score.
#[must_use]
pub fn format_trends(trends: &[TrendRecord]) -> String {
    if trends.is_empty() {
        return "No research trends found in the database.".to_owned();
    }

    let info = trends
        .iter()
        .map(|t| {
            let growth = t.growth_rate.unwrap_or(0.0);
            format!(
                "• {}\n  Category: {}\n  Growth Rate: {growth}%\n  Publications: {}",
                t.topic,
                or_na(t.category.as_deref()),
                t.publication_count,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("Here are the top 5 research trends:\n\n{info}")
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryStats {
    pub faculty: i64,
    pub publications: i64,
    pub trends: i64,
    pub institutions: i64,
    pub departments: i64,
}

#[must_use]
pub fn format_statistics(stats: DirectoryStats) -> String {
    format!(
        "Here are the current statistics:\n\n\
         • Total Faculty Members: {}\n\
         • Total Publications: {}\n\
         • Active Research Trends: {}\n\
         • Institutions: {}\n\
         • Departments: {}",
        stats.faculty, stats.publications, stats.trends, stats.institutions, stats.departments,
    )
}

/// Closest faculty matches for a find/search message.
#[must_use]
pub fn format_search_results(faculty: &[FacultyRecord]) -> String {
    if faculty.is_empty() {
        return "No faculty members found matching your search.".to_owned();
    }

    let info = faculty
        .iter()
        .take(SEARCH_PREVIEW)
        .map(|f| {
            format!(
                "• {}\n  Department: {}\n  Institution: {}\n  Citations: {}",
                f.name,
                or_na(f.department.as_deref()),
                or_na(f.institution.as_deref()),
                f.citations.unwrap_or(0),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut message = format!("Here are the most relevant faculty members:\n\n{info}");
    if faculty.len() > SEARCH_PREVIEW {
        message.push_str(&format!("\n\n... and {} more results.", faculty.len() - SEARCH_PREVIEW));
    }
    message
}

#[must_use]
pub fn help_message() -> String {
    "I can help you with information about:\n\
     • Faculty members and their research\n\
     • Institutions and their faculty count\n\
     • Publications and research papers\n\
     • Research trends and analytics\n\
     • General statistics\n\n\
     Please ask me about any of these topics!"
        .to_owned()
}

async fn fetch_statistics(pool: &PgPool) -> Result<DirectoryStats, sqlx::Error> {
    let row = sqlx::query(
        "SELECT
             (SELECT COUNT(*) FROM faculty) AS faculty,
             (SELECT COUNT(*) FROM publications) AS publications,
             (SELECT COUNT(*) FROM research_trends) AS trends,
             (SELECT COUNT(DISTINCT institution) FROM faculty WHERE institution IS NOT NULL) AS institutions,
             (SELECT COUNT(DISTINCT department) FROM faculty WHERE department IS NOT NULL) AS departments",
    )
    .fetch_one(pool)
    .await?;

    Ok(DirectoryStats {
        faculty: row.get("faculty"),
        publications: row.get("publications"),
        trends: row.get("trends"),
        institutions: row.get("institutions"),
        departments: row.get("departments"),
    })
}

/// Publications matched by title or by an authoring faculty member's name.
async fn matched_publications(pool: &PgPool, message: &str) -> Result<Vec<PublicationRecord>, sqlx::Error> {
    let pattern = format!("%{}%", message.trim());
    let rows = sqlx::query(&format!(
        "SELECT DISTINCT {PUBLICATION_COLUMNS_P}
         FROM publications p
         LEFT JOIN faculty_publications fp ON fp.publication_id = p.id
         LEFT JOIN faculty f ON f.id = fp.faculty_id
         WHERE p.title ILIKE $1 OR f.name ILIKE $1
         ORDER BY p.citation_count DESC, p.title ASC",
    ))
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(publication_from_row).collect())
}

/// Answer one assistant message. Never fails: read errors degrade to a
/// canned apology for the active intent.
pub async fn respond(pool: &PgPool, message: &str) -> String {
    match classify_intent(message) {
        Intent::AllFaculty => match directory::list_faculty(pool).await {
            Ok(faculty) => format_all_faculty(&faculty),
            Err(e) => {
                tracing::error!(error = %e, "assistant faculty roster read failed");
                "Sorry, I couldn't fetch the faculty list at the moment.".to_owned()
            }
        },
        Intent::Faculty => match directory::list_faculty(pool).await {
            Ok(faculty) => format_faculty_overview(&faculty),
            Err(e) => {
                tracing::error!(error = %e, "assistant faculty read failed");
                "Sorry, I couldn't fetch faculty information at the moment.".to_owned()
            }
        },
        Intent::Institution => match directory::list_faculty(pool).await {
            Ok(faculty) => format_institutions(&faculty),
            Err(e) => {
                tracing::error!(error = %e, "assistant institution read failed");
                "Sorry, I couldn't fetch institution information at the moment.".to_owned()
            }
        },
        Intent::Publication => match matched_publications(pool, message).await {
            Ok(publications) => format_publications(message, &publications),
            Err(e) => {
                tracing::error!(error = %e, "assistant publication read failed");
                "Sorry, I couldn't fetch publication information at the moment.".to_owned()
            }
        },
        Intent::Research => match analytics::top_trends(pool, TOP_TRENDS).await {
            Ok(trends) => format_trends(&trends),
            Err(e) => {
                tracing::error!(error = %e, "assistant trends read failed");
                "Sorry, I couldn't fetch research trends at the moment.".to_owned()
            }
        },
        Intent::Statistics => match fetch_statistics(pool).await {
            Ok(stats) => format_statistics(stats),
            Err(e) => {
                tracing::error!(error = %e, "assistant statistics read failed");
                "Sorry, I couldn't fetch the statistics at the moment.".to_owned()
            }
        },
        Intent::Search => match directory::search_faculty(pool, message).await {
            Ok(faculty) => format_search_results(&faculty),
            Err(e) => {
                tracing::error!(error = %e, "assistant search failed");
                "Sorry, I couldn't perform the search at the moment.".to_owned()
            }
        },
        Intent::Help => help_message(),
    }
}

#[cfg(test)]
#[path = "assistant_test.rs"]
mod tests;
