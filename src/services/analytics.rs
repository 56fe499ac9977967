//! Research analytics — trend rollups, research-area scoring, momentum.
//!
//! DESIGN
//! ======
//! Two views over the same tables. `/research` rolls up the curated
//! `research_trends` table plus faculty counters. `/research-areas` derives
//! areas from faculty expertise strings and scores them from the members'
//! actual publication history; the heavy lifting is pure functions over
//! plain inputs so the scoring is testable without a database.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("no data: {0}")]
    NoData(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row of the curated `research_trends` table.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TrendRecord {
    pub id: Uuid,
    pub topic: String,
    pub category: Option<String>,
    pub year: i32,
    pub quarter: i32,
    pub publication_count: i32,
    pub citation_count: i32,
    pub faculty_count: i32,
    pub growth_rate: Option<f64>,
    pub trending_score: Option<f64>,
}

pub(crate) const TREND_COLUMNS: &str = "id, topic, category, year, quarter, publication_count, \
     citation_count, faculty_count, growth_rate, trending_score";

pub(crate) fn trend_from_row(row: &PgRow) -> TrendRecord {
    TrendRecord {
        id: row.get("id"),
        topic: row.get("topic"),
        category: row.get("category"),
        year: row.get("year"),
        quarter: row.get("quarter"),
        publication_count: row.get("publication_count"),
        citation_count: row.get("citation_count"),
        faculty_count: row.get("faculty_count"),
        growth_rate: row.get("growth_rate"),
        trending_score: row.get("trending_score"),
    }
}

/// Top trend rows by trending score.
pub async fn top_trends(pool: &PgPool, limit: i64) -> Result<Vec<TrendRecord>, AnalyticsError> {
    let rows = sqlx::query(&format!(
        "SELECT {TREND_COLUMNS} FROM research_trends
         ORDER BY trending_score DESC NULLS LAST, topic ASC
         LIMIT $1",
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(trend_from_row).collect())
}

// =============================================================================
// TREND-TABLE ROLLUP
// =============================================================================

#[derive(Debug, Clone)]
pub struct TrendStat {
    pub topic: String,
    pub year: i32,
    pub publication_count: i32,
    pub citation_count: i32,
    pub growth_rate: Option<f64>,
    pub trending_score: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct FacultySummary {
    pub department: Option<String>,
    pub citations: Option<i32>,
    pub h_index: Option<i32>,
}

#[derive(Debug, serde::Serialize)]
pub struct DepartmentStat {
    pub department: String,
    pub count: i64,
    pub citations: i64,
}

#[derive(Debug, serde::Serialize)]
pub struct YearlyTrend {
    pub year: i32,
    pub publications: i64,
    pub citations: i64,
}

#[derive(Debug, serde::Serialize)]
pub struct TrendingTopic {
    pub topic: String,
    pub score: Option<f64>,
    pub growth_rate: Option<f64>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub total_citations: i64,
    pub average_h_index: f64,
    pub total_publications: i64,
    pub total_faculty: i64,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchAnalytics {
    pub faculty_by_department: Vec<DepartmentStat>,
    pub publication_trends: Vec<YearlyTrend>,
    pub top_research_areas: Vec<TrendingTopic>,
    pub metrics: SummaryMetrics,
}

/// Roll the trend table and faculty counters up into the analytics summary.
#[must_use]
pub fn compute_research_analytics(trends: &[TrendStat], faculty: &[FacultySummary]) -> ResearchAnalytics {
    let mut years: BTreeMap<i32, (i64, i64)> = BTreeMap::new();
    for trend in trends {
        let entry = years.entry(trend.year).or_insert((0, 0));
        entry.0 += i64::from(trend.publication_count);
        entry.1 += i64::from(trend.citation_count);
    }

    let mut departments: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    let mut total_citations = 0_i64;
    let mut total_h_index = 0_i64;
    for member in faculty {
        if let Some(department) = member.department.as_deref() {
            let entry = departments.entry(department.to_owned()).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += i64::from(member.citations.unwrap_or(0));
        }
        total_citations += i64::from(member.citations.unwrap_or(0));
        total_h_index += i64::from(member.h_index.unwrap_or(0));
    }

    let mut ranked = trends.to_vec();
    ranked.sort_by(|a, b| {
        b.trending_score
            .unwrap_or(f64::MIN)
            .total_cmp(&a.trending_score.unwrap_or(f64::MIN))
            .then_with(|| a.topic.cmp(&b.topic))
    });

    let faculty_count = faculty.len() as i64;
    let average_h_index = if faculty_count == 0 {
        0.0
    } else {
        (total_h_index as f64 / faculty_count as f64 * 10.0).round() / 10.0
    };
    let total_publications = years.values().map(|(pubs, _)| pubs).sum();

    ResearchAnalytics {
        faculty_by_department: departments
            .into_iter()
            .map(|(department, (count, citations))| DepartmentStat { department, count, citations })
            .collect(),
        publication_trends: years
            .iter()
            .map(|(&year, &(publications, citations))| YearlyTrend { year, publications, citations })
            .collect(),
        top_research_areas: ranked
            .into_iter()
            .take(10)
            .map(|trend| TrendingTopic {
                topic: trend.topic,
                score: trend.trending_score,
                growth_rate: trend.growth_rate,
            })
            .collect(),
        metrics: SummaryMetrics {
            total_citations,
            average_h_index,
            total_publications,
            total_faculty: faculty_count,
        },
    }
}

/// Fetch and roll up the analytics summary.
///
/// # Errors
///
/// `NoData` when either source table is empty, matching the empty-state
/// contract of the endpoint.
pub async fn research_analytics(pool: &PgPool) -> Result<ResearchAnalytics, AnalyticsError> {
    let trend_rows = sqlx::query(
        "SELECT topic, year, publication_count, citation_count, growth_rate, trending_score
         FROM research_trends ORDER BY year ASC",
    )
    .fetch_all(pool)
    .await?;
    if trend_rows.is_empty() {
        return Err(AnalyticsError::NoData("no research trends data found"));
    }

    let faculty_rows = sqlx::query("SELECT department, citations, h_index FROM faculty")
        .fetch_all(pool)
        .await?;
    if faculty_rows.is_empty() {
        return Err(AnalyticsError::NoData("no faculty data found"));
    }

    let trends: Vec<TrendStat> = trend_rows
        .iter()
        .map(|row| TrendStat {
            topic: row.get("topic"),
            year: row.get("year"),
            publication_count: row.get("publication_count"),
            citation_count: row.get("citation_count"),
            growth_rate: row.get("growth_rate"),
            trending_score: row.get("trending_score"),
        })
        .collect();

    let faculty: Vec<FacultySummary> = faculty_rows
        .iter()
        .map(|row| FacultySummary {
            department: row.get("department"),
            citations: row.get("citations"),
            h_index: row.get("h_index"),
        })
        .collect();

    Ok(compute_research_analytics(&trends, &faculty))
}

// =============================================================================
// RESEARCH AREAS & MOMENTUM
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: i64,
}

/// Momentum score over per-year publication counts, 0..=100 in steps of 5.
///
/// Over the last three years: the percentage trend of the latest count
/// against the mean of the prior counts (weight 0.4), a consistency bonus
/// of 20 when no prior year drops below 80% of its predecessor, a
/// recent-activity bonus of 30, and an acceleration bonus (25 positive,
/// 10 flat).
#[must_use]
pub fn momentum_score(points: &[YearCount]) -> i64 {
    if points.len() < 2 {
        return 0;
    }

    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.year);
    let recent = &sorted[sorted.len().saturating_sub(3)..];
    let Some((current, previous)) = recent.split_last() else {
        return 0;
    };

    let avg_previous = previous.iter().map(|p| p.count as f64).sum::<f64>() / previous.len() as f64;
    let current_count = current.count as f64;

    let trend = if avg_previous == 0.0 {
        if current.count > 0 { 100.0 } else { 0.0 }
    } else {
        (current_count - avg_previous) / avg_previous * 100.0
    };

    let consistent = previous
        .windows(2)
        .all(|pair| pair[1].count as f64 >= pair[0].count as f64 * 0.8);
    let consistency = if consistent { 20.0 } else { 0.0 };

    let recent_activity = if current.count > 0 { 30.0 } else { 0.0 };

    let acceleration = if previous.len() > 1 {
        (current.count - previous[1].count) - (previous[1].count - previous[0].count)
    } else {
        0
    };
    let acceleration_score = match acceleration.cmp(&0) {
        std::cmp::Ordering::Greater => 25.0,
        std::cmp::Ordering::Equal => 10.0,
        std::cmp::Ordering::Less => 0.0,
    };

    let total = trend * 0.4 + consistency + recent_activity + acceleration_score;
    #[allow(clippy::cast_possible_truncation)]
    let score = ((total / 5.0).round() * 5.0).clamp(0.0, 100.0) as i64;
    score
}

/// Normalize an institution name for comparison and deduplication:
/// lowercase, collapsed whitespace, trailing ", city" dropped, the Ramaiah
/// institute/university family canonicalized, and an "m.s." prefix
/// standardized to "ms".
#[must_use]
pub fn normalize_institution(name: &str) -> String {
    let collapsed = name.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return collapsed;
    }
    let stripped = strip_trailing_location(&collapsed);
    let canonical = canonicalize_ramaiah(&stripped);
    standardize_ms_prefix(&canonical)
}

/// Drop a trailing ", <word>" location suffix (single alphabetic word only).
fn strip_trailing_location(name: &str) -> String {
    if let Some(pos) = name.rfind(',') {
        let tail = name[pos + 1..].trim();
        if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_alphabetic()) {
            return name[..pos].trim_end().to_owned();
        }
    }
    name.to_owned()
}

const RAMAIAH_PREFIXES: [&str; 6] = ["m.s. ", "m. s. ", "m.s.", "m s ", "ms ", ""];

fn canonicalize_ramaiah(name: &str) -> String {
    for prefix in RAMAIAH_PREFIXES {
        let Some(tail) = name.strip_prefix(prefix) else {
            continue;
        };
        for variant in ["ramaiah institute of technology", "ramaiah university"] {
            if let Some(rest) = tail.strip_prefix(variant) {
                return format!("ramaiah institute of technology{rest}");
            }
        }
    }
    name.to_owned()
}

fn standardize_ms_prefix(name: &str) -> String {
    for prefix in ["m.s. ", "m.s ", "ms. "] {
        if let Some(rest) = name.strip_prefix(prefix) {
            return format!("ms {rest}");
        }
    }
    name.to_owned()
}

/// Split a raw expertise string into area names: fragments are separated by
/// `/ , ; &`, leading numbering is dropped, and fragments shorter than
/// three characters are discarded.
#[must_use]
pub fn split_expertise_areas(raw: &str) -> Vec<String> {
    raw.split(['/', ',', ';', '&'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.')
                .trim_start()
                .to_owned()
        })
        .filter(|area| area.chars().count() >= 3)
        .collect()
}

/// One faculty member's activity, assembled for area scoring.
#[derive(Debug, Clone, Default)]
pub struct FacultyActivity {
    pub institution: Option<String>,
    pub department: Option<String>,
    pub citations: Option<i32>,
    pub h_index: Option<i32>,
    pub expertise: Vec<String>,
    pub publications: Vec<PublicationActivity>,
}

#[derive(Debug, Clone, Default)]
pub struct PublicationActivity {
    pub year: Option<i32>,
    pub citation_count: i32,
    pub venue: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct TopResearchArea {
    pub topic: String,
    pub category: String,
    pub score: f64,
    pub growth_rate: i64,
    pub publications: i64,
    pub citations: i64,
}

#[derive(Debug, serde::Serialize)]
pub struct QuarterlyTrend {
    pub year: i32,
    pub quarter: i32,
    pub publications: i64,
    pub citations: i64,
}

#[derive(Debug, serde::Serialize)]
pub struct DomainShare {
    pub name: String,
    pub value: i64,
    pub citations: i64,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaMetrics {
    pub total_citations: i64,
    pub average_h_index: f64,
    pub total_publications: i64,
    pub total_faculty: i64,
    pub domain_distribution: Vec<DomainShare>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchAreaAnalytics {
    pub publication_trends: Vec<QuarterlyTrend>,
    pub top_research_areas: Vec<TopResearchArea>,
    pub metrics: AreaMetrics,
}

#[derive(Default)]
struct AreaStats {
    publications: i64,
    citations: i64,
    score: f64,
    years: BTreeSet<i32>,
    faculty_count: i64,
    venues: BTreeSet<String>,
    by_year: BTreeMap<i32, (i64, i64)>,
}

/// Score research areas from faculty expertise and publication history.
///
/// `fallback_year` stands in for the most recent publication year when no
/// publication carries one.
#[must_use]
pub fn compute_research_areas(faculty: &[FacultyActivity], fallback_year: i32) -> ResearchAreaAnalytics {
    // Overall publication counts by year, across all areas.
    let mut overall: BTreeMap<i32, (i64, i64)> = BTreeMap::new();
    for member in faculty {
        for publication in &member.publications {
            let Some(year) = publication.year else { continue };
            let entry = overall.entry(year).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += i64::from(publication.citation_count);
        }
    }
    let most_recent_year = overall.keys().max().copied().unwrap_or(fallback_year);

    let mut areas: BTreeMap<String, AreaStats> = BTreeMap::new();
    for member in faculty {
        let member_areas: BTreeSet<String> = member
            .expertise
            .iter()
            .flat_map(|raw| split_expertise_areas(raw))
            .collect();

        for area in &member_areas {
            let stats = areas.entry(area.clone()).or_default();
            stats.faculty_count += 1;
            stats.score += 2.0;
        }

        for publication in &member.publications {
            let Some(year) = publication.year else { continue };
            for area in &member_areas {
                let stats = areas.entry(area.clone()).or_default();
                stats.publications += 1;
                stats.citations += i64::from(publication.citation_count);
                stats.years.insert(year);
                if let Some(venue) = publication.venue.as_deref() {
                    stats.venues.insert(venue.to_owned());
                }
                let by_year = stats.by_year.entry(year).or_insert((0, 0));
                by_year.0 += 1;
                by_year.1 += i64::from(publication.citation_count);
                if year >= most_recent_year - 1 {
                    stats.score += 3.0;
                }
                stats.score += f64::from(publication.citation_count + 1).ln();
            }
        }
    }

    let mut ranked: Vec<TopResearchArea> = areas
        .iter()
        .filter(|(_, stats)| stats.publications > 0)
        .map(|(topic, stats)| {
            let total_score = stats.score
                + stats.venues.len() as f64 * 2.0
                + ((stats.citations + 1) as f64).ln() * 3.0
                + stats.faculty_count as f64 * 4.0
                + stats.years.len() as f64 * 2.0;
            let points: Vec<YearCount> = stats
                .by_year
                .iter()
                .map(|(&year, &(count, _))| YearCount { year, count })
                .collect();
            TopResearchArea {
                topic: topic.clone(),
                category: topic.clone(),
                score: total_score,
                growth_rate: momentum_score(&points),
                publications: stats.publications,
                citations: stats.citations,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.topic.cmp(&b.topic)));
    ranked.truncate(10);

    let mut distribution: Vec<DomainShare> = areas
        .iter()
        .filter(|(_, stats)| stats.publications > 0 || stats.citations > 0)
        .map(|(name, stats)| DomainShare {
            name: name.clone(),
            value: stats.publications,
            citations: stats.citations,
        })
        .collect();
    distribution.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    distribution.truncate(10);

    let total_citations: i64 = faculty.iter().map(|m| i64::from(m.citations.unwrap_or(0))).sum();
    let total_h_index: i64 = faculty.iter().map(|m| i64::from(m.h_index.unwrap_or(0))).sum();
    let total_faculty = faculty.len() as i64;
    let average_h_index = if total_faculty == 0 {
        0.0
    } else {
        (total_h_index as f64 / total_faculty as f64 * 10.0).round() / 10.0
    };
    let total_publications: i64 = faculty.iter().map(|m| m.publications.len() as i64).sum();

    ResearchAreaAnalytics {
        publication_trends: overall
            .iter()
            .map(|(&year, &(publications, citations))| QuarterlyTrend { year, quarter: 1, publications, citations })
            .collect(),
        top_research_areas: ranked,
        metrics: AreaMetrics {
            total_citations,
            average_h_index,
            total_publications,
            total_faculty,
            domain_distribution: distribution,
        },
    }
}

/// Fetch faculty activity and score research areas, optionally filtered by
/// institution (normalized comparison) and department (exact).
pub async fn research_areas(
    pool: &PgPool,
    institution: Option<&str>,
    department: Option<&str>,
) -> Result<ResearchAreaAnalytics, AnalyticsError> {
    let faculty_rows = match department {
        Some(department) => {
            sqlx::query(
                "SELECT id, institution, department, citations, h_index, expertise
                 FROM faculty WHERE department = $1",
            )
            .bind(department)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query("SELECT id, institution, department, citations, h_index, expertise FROM faculty")
                .fetch_all(pool)
                .await?
        }
    };

    let wanted_institution = institution.map(normalize_institution);
    let mut members: Vec<(Uuid, FacultyActivity)> = faculty_rows
        .iter()
        .map(|row| {
            let activity = FacultyActivity {
                institution: row.get("institution"),
                department: row.get("department"),
                citations: row.get("citations"),
                h_index: row.get("h_index"),
                expertise: row.get::<Option<Vec<String>>, _>("expertise").unwrap_or_default(),
                publications: Vec::new(),
            };
            (row.get("id"), activity)
        })
        .filter(|(_, activity)| match (&wanted_institution, &activity.institution) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => normalize_institution(actual) == *wanted,
            (Some(_), None) => false,
        })
        .collect();

    let ids: Vec<Uuid> = members.iter().map(|(id, _)| *id).collect();
    if !ids.is_empty() {
        let publication_rows = sqlx::query(
            "SELECT fp.faculty_id, p.year, p.citation_count, p.venue
             FROM faculty_publications fp
             JOIN publications p ON p.id = fp.publication_id
             WHERE fp.faculty_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut by_faculty: HashMap<Uuid, Vec<PublicationActivity>> = HashMap::new();
        for row in &publication_rows {
            by_faculty
                .entry(row.get("faculty_id"))
                .or_default()
                .push(PublicationActivity {
                    year: row.get("year"),
                    citation_count: row.get("citation_count"),
                    venue: row.get("venue"),
                });
        }
        for (id, activity) in &mut members {
            if let Some(publications) = by_faculty.remove(id) {
                activity.publications = publications;
            }
        }
    }

    let activities: Vec<FacultyActivity> = members.into_iter().map(|(_, activity)| activity).collect();
    let fallback_year = time::OffsetDateTime::now_utc().year();
    Ok(compute_research_areas(&activities, fallback_year))
}

#[cfg(test)]
#[path = "analytics_test.rs"]
mod tests;
