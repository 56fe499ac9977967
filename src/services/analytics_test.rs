use super::*;

fn yc(year: i32, count: i64) -> YearCount {
    YearCount { year, count }
}

#[test]
fn momentum_needs_two_years() {
    assert_eq!(momentum_score(&[]), 0);
    assert_eq!(momentum_score(&[yc(2024, 5)]), 0);
}

#[test]
fn momentum_doubling_hits_the_cap() {
    // trend 100*0.4 + consistency 20 + activity 30 + flat-acceleration 10.
    assert_eq!(momentum_score(&[yc(2022, 2), yc(2023, 4)]), 100);
}

#[test]
fn momentum_collapse_clamps_to_zero() {
    // trend -100*0.4 leaves -10 after bonuses.
    assert_eq!(momentum_score(&[yc(2022, 5), yc(2023, 0)]), 0);
}

#[test]
fn momentum_from_zero_baseline_scores_full_trend() {
    assert_eq!(momentum_score(&[yc(2022, 0), yc(2023, 3)]), 100);
}

#[test]
fn momentum_dormant_area_scores_thirty() {
    // No trend, no activity; consistency 20 + flat acceleration 10.
    assert_eq!(momentum_score(&[yc(2022, 0), yc(2023, 0)]), 30);
}

#[test]
fn momentum_steady_output_scores_sixty() {
    assert_eq!(momentum_score(&[yc(2021, 4), yc(2022, 4), yc(2023, 4)]), 60);
}

#[test]
fn momentum_acceleration_bonus_applies() {
    // trend 233.3*0.4 + 20 + 30 + 25, clamped to 100.
    assert_eq!(momentum_score(&[yc(2021, 1), yc(2022, 2), yc(2023, 5)]), 100);
}

#[test]
fn momentum_inconsistent_history_loses_the_bonus() {
    // previous years 10 -> 2 fails the 80% floor; total 28.33 rounds to 30.
    assert_eq!(momentum_score(&[yc(2021, 10), yc(2022, 2), yc(2023, 2)]), 30);
}

#[test]
fn momentum_rounds_to_nearest_five() {
    // total 88.33 -> 90.
    assert_eq!(momentum_score(&[yc(2021, 3), yc(2022, 3), yc(2023, 4)]), 90);
}

#[test]
fn momentum_uses_last_three_years_only() {
    // The 2020 spike is outside the window.
    assert_eq!(momentum_score(&[yc(2020, 50), yc(2021, 4), yc(2022, 4), yc(2023, 4)]), 60);
}

#[test]
fn momentum_sorts_unordered_input() {
    assert_eq!(momentum_score(&[yc(2023, 4), yc(2021, 4), yc(2022, 4)]), 60);
}

#[test]
fn normalize_institution_canonicalizes_ramaiah_variants() {
    for raw in [
        "  M.S. Ramaiah  Institute of Technology, Bangalore ",
        "MS Ramaiah University",
        "M.S.Ramaiah University",
        "Ramaiah Institute of Technology",
    ] {
        assert_eq!(normalize_institution(raw), "ramaiah institute of technology", "raw: {raw}");
    }
}

#[test]
fn normalize_institution_strips_single_word_location() {
    assert_eq!(normalize_institution("Indian Institute of Science, Bengaluru"), "indian institute of science");
}

#[test]
fn normalize_institution_keeps_multi_word_tail() {
    // Only a single trailing word counts as a location suffix.
    assert_eq!(normalize_institution("Acme University, New Delhi"), "acme university, new delhi");
}

#[test]
fn normalize_institution_standardizes_ms_prefix() {
    assert_eq!(normalize_institution("M.S. College of Arts"), "ms college of arts");
}

#[test]
fn normalize_institution_collapses_whitespace() {
    assert_eq!(normalize_institution("  Some   Univ  "), "some univ");
    assert_eq!(normalize_institution(""), "");
}

#[test]
fn normalize_institution_is_idempotent() {
    for raw in ["M.S. Ramaiah Institute of Technology, Bangalore", "Acme University, Pune", "MS College of Arts"] {
        let once = normalize_institution(raw);
        assert_eq!(normalize_institution(&once), once);
    }
}

#[test]
fn split_expertise_handles_delimiters_and_numbering() {
    assert_eq!(
        split_expertise_areas("1. Machine Learning; 2. IoT"),
        vec!["Machine Learning".to_owned(), "IoT".to_owned()]
    );
    assert_eq!(
        split_expertise_areas("Signal Processing & Wireless Communication"),
        vec!["Signal Processing".to_owned(), "Wireless Communication".to_owned()]
    );
    assert_eq!(split_expertise_areas("2.5 Wireless"), vec!["Wireless".to_owned()]);
}

#[test]
fn split_expertise_drops_short_fragments() {
    assert!(split_expertise_areas("AI, ML").is_empty());
    assert!(split_expertise_areas("").is_empty());
    assert!(split_expertise_areas(" / ; ").is_empty());
}

fn trend(topic: &str, year: i32, pubs: i32, cites: i32, growth: Option<f64>, score: Option<f64>) -> TrendStat {
    TrendStat {
        topic: topic.to_owned(),
        year,
        publication_count: pubs,
        citation_count: cites,
        growth_rate: growth,
        trending_score: score,
    }
}

#[test]
fn research_analytics_rolls_up_years_departments_and_metrics() {
    let trends = vec![
        trend("A", 2022, 5, 50, Some(10.0), Some(80.0)),
        trend("B", 2022, 3, 30, Some(5.0), Some(90.0)),
        trend("A", 2023, 7, 70, None, Some(60.0)),
    ];
    let faculty = vec![
        FacultySummary { department: Some("CSE".into()), citations: Some(100), h_index: Some(10) },
        FacultySummary { department: Some("CSE".into()), citations: Some(50), h_index: Some(6) },
        FacultySummary { department: Some("ECE".into()), citations: None, h_index: None },
        FacultySummary { department: None, citations: Some(10), h_index: Some(2) },
    ];

    let analytics = compute_research_analytics(&trends, &faculty);

    assert_eq!(analytics.publication_trends.len(), 2);
    assert_eq!(analytics.publication_trends[0].year, 2022);
    assert_eq!(analytics.publication_trends[0].publications, 8);
    assert_eq!(analytics.publication_trends[0].citations, 80);
    assert_eq!(analytics.publication_trends[1].year, 2023);
    assert_eq!(analytics.publication_trends[1].publications, 7);

    // Departmentless members count toward totals but not department stats.
    assert_eq!(analytics.faculty_by_department.len(), 2);
    let cse = analytics.faculty_by_department.iter().find(|d| d.department == "CSE").unwrap();
    assert_eq!(cse.count, 2);
    assert_eq!(cse.citations, 150);

    assert_eq!(analytics.top_research_areas[0].topic, "B");
    assert_eq!(analytics.top_research_areas[1].topic, "A");
    assert_eq!(analytics.top_research_areas.len(), 3);

    assert_eq!(analytics.metrics.total_citations, 160);
    assert!((analytics.metrics.average_h_index - 4.5).abs() < f64::EPSILON);
    assert_eq!(analytics.metrics.total_publications, 15);
    assert_eq!(analytics.metrics.total_faculty, 4);
}

#[test]
fn research_analytics_empty_inputs_are_harmless() {
    let analytics = compute_research_analytics(&[], &[]);
    assert!(analytics.publication_trends.is_empty());
    assert!(analytics.faculty_by_department.is_empty());
    assert!(analytics.top_research_areas.is_empty());
    assert_eq!(analytics.metrics.total_faculty, 0);
    assert!(analytics.metrics.average_h_index.abs() < f64::EPSILON);
}

fn publication(year: Option<i32>, citation_count: i32, venue: &str) -> PublicationActivity {
    PublicationActivity { year, citation_count, venue: Some(venue.to_owned()) }
}

#[test]
fn research_areas_are_scored_and_ranked() {
    let faculty = vec![
        FacultyActivity {
            citations: Some(100),
            h_index: Some(10),
            expertise: vec!["Machine Learning / Computer Vision".to_owned()],
            publications: vec![publication(Some(2022), 10, "ICML"), publication(Some(2023), 4, "CVPR")],
            ..FacultyActivity::default()
        },
        FacultyActivity {
            citations: Some(50),
            h_index: Some(5),
            expertise: vec!["Machine Learning".to_owned()],
            publications: vec![publication(Some(2023), 0, "ICML")],
            ..FacultyActivity::default()
        },
    ];

    let analytics = compute_research_areas(&faculty, 2024);

    assert_eq!(analytics.top_research_areas.len(), 2);
    let top = &analytics.top_research_areas[0];
    assert_eq!(top.topic, "Machine Learning");
    assert_eq!(top.publications, 3);
    assert_eq!(top.citations, 14);
    assert_eq!(top.growth_rate, 100);

    let second = &analytics.top_research_areas[1];
    assert_eq!(second.topic, "Computer Vision");
    assert_eq!(second.publications, 2);
    assert_eq!(second.growth_rate, 60);
    assert!(top.score > second.score);

    assert_eq!(analytics.publication_trends.len(), 2);
    assert_eq!(analytics.publication_trends[0].year, 2022);
    assert_eq!(analytics.publication_trends[0].publications, 1);
    assert_eq!(analytics.publication_trends[0].citations, 10);
    assert_eq!(analytics.publication_trends[1].publications, 2);

    assert_eq!(analytics.metrics.total_citations, 150);
    assert!((analytics.metrics.average_h_index - 7.5).abs() < f64::EPSILON);
    assert_eq!(analytics.metrics.total_publications, 3);
    assert_eq!(analytics.metrics.total_faculty, 2);

    assert_eq!(analytics.metrics.domain_distribution.len(), 2);
    assert_eq!(analytics.metrics.domain_distribution[0].name, "Machine Learning");
    assert_eq!(analytics.metrics.domain_distribution[0].value, 3);
}

#[test]
fn research_areas_count_yearless_publications_in_totals_only() {
    let faculty = vec![FacultyActivity {
        expertise: vec!["Robotics".to_owned()],
        publications: vec![publication(None, 9, "RSS"), publication(Some(2023), 1, "RSS")],
        ..FacultyActivity::default()
    }];

    let analytics = compute_research_areas(&faculty, 2024);

    // The year-less publication never reaches area or trend accumulation.
    assert_eq!(analytics.metrics.total_publications, 2);
    assert_eq!(analytics.publication_trends.len(), 1);
    assert_eq!(analytics.top_research_areas[0].publications, 1);
    assert_eq!(analytics.top_research_areas[0].citations, 1);
}

#[test]
fn research_areas_without_publications_are_not_ranked() {
    let faculty = vec![FacultyActivity {
        expertise: vec!["Quantum Computing".to_owned()],
        ..FacultyActivity::default()
    }];

    let analytics = compute_research_areas(&faculty, 2024);
    assert!(analytics.top_research_areas.is_empty());
    assert!(analytics.metrics.domain_distribution.is_empty());
}

#[test]
fn research_areas_truncate_to_top_ten() {
    let faculty: Vec<FacultyActivity> = (0..15)
        .map(|i| FacultyActivity {
            expertise: vec![format!("Area Number {i:02}")],
            publications: vec![publication(Some(2023), i, "V")],
            ..FacultyActivity::default()
        })
        .collect();

    let analytics = compute_research_areas(&faculty, 2024);
    assert_eq!(analytics.top_research_areas.len(), 10);
    assert_eq!(analytics.metrics.domain_distribution.len(), 10);
}
