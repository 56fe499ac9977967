use super::*;
use uuid::Uuid;

fn member(name: &str, department: Option<&str>, institution: Option<&str>, citations: Option<i32>) -> FacultyRecord {
    FacultyRecord {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        profile_url: format!("https://irins.example/{name}"),
        gender: None,
        department: department.map(str::to_owned),
        institution: institution.map(str::to_owned),
        email: None,
        photo_url: None,
        orcid_id: None,
        google_scholar_id: None,
        expertise: None,
        citations,
        h_index: citations.map(|c| c / 10),
        i10_index: None,
        google_scholar_url: None,
        linkedin_url: None,
    }
}

#[test]
fn intent_show_all_faculty_wins_over_faculty() {
    assert_eq!(classify_intent("Show all faculty"), Intent::AllFaculty);
    assert_eq!(classify_intent("please list every faculty member"), Intent::AllFaculty);
}

#[test]
fn intent_faculty_keywords() {
    assert_eq!(classify_intent("show me faculty members"), Intent::Faculty);
    assert_eq!(classify_intent("which PROFESSOR works here?"), Intent::Faculty);
    assert_eq!(classify_intent("any researcher on robotics?"), Intent::Faculty);
}

#[test]
fn intent_institution_keywords() {
    assert_eq!(classify_intent("top institutions please"), Intent::Institution);
    assert_eq!(classify_intent("tell me about the university"), Intent::Institution);
}

#[test]
fn intent_publication_keywords() {
    assert_eq!(classify_intent("recent publications"), Intent::Publication);
    assert_eq!(classify_intent("show me a paper on caching"), Intent::Publication);
}

#[test]
fn intent_research_keywords() {
    assert_eq!(classify_intent("what's trending"), Intent::Research);
    assert_eq!(classify_intent("research momentum"), Intent::Research);
}

#[test]
fn intent_statistics_keywords() {
    assert_eq!(classify_intent("overall stats"), Intent::Statistics);
    assert_eq!(classify_intent("how many entries are there"), Intent::Statistics);
}

#[test]
fn intent_search_keywords() {
    assert_eq!(classify_intent("who is heading the lab"), Intent::Search);
}

#[test]
fn intent_fallback_is_help() {
    assert_eq!(classify_intent("hello there"), Intent::Help);
    assert_eq!(classify_intent(""), Intent::Help);
}

#[test]
fn faculty_overview_lists_top_ten_with_tail() {
    let faculty: Vec<FacultyRecord> = (0..12)
        .map(|i| member(&format!("F{i:02}"), Some("CSE"), Some("Inst"), Some(100 - i)))
        .collect();

    let reply = format_faculty_overview(&faculty);
    assert!(reply.starts_with("Here are the top faculty members by citations:"));
    assert!(reply.contains("• F00 (CSE) - Inst\n  Citations: 100, H-index: 10"));
    assert!(reply.contains("F09"));
    assert!(!reply.contains("F10"));
    assert!(reply.contains("... and 2 more faculty members.\nTotal faculty: 12"));
}

#[test]
fn faculty_overview_small_roster_has_no_tail() {
    let faculty = vec![member("Solo", None, None, None)];
    let reply = format_faculty_overview(&faculty);
    assert!(reply.contains("• Solo (N/A) - N/A\n  Citations: 0, H-index: 0"));
    assert!(reply.ends_with("Total faculty: 1"));
    assert!(!reply.contains("more faculty members"));
}

#[test]
fn faculty_overview_empty_roster() {
    assert_eq!(format_faculty_overview(&[]), "No faculty members found in the database.");
}

#[test]
fn all_faculty_lists_everyone() {
    let faculty = vec![
        member("A", Some("CSE"), Some("X"), Some(10)),
        member("B", None, Some("Y"), None),
    ];
    let reply = format_all_faculty(&faculty);
    assert!(reply.starts_with("Here are all faculty members (2):"));
    assert!(reply.contains("• A (CSE) - X"));
    assert!(reply.contains("• B (N/A) - Y"));
}

#[test]
fn institutions_ranked_by_faculty_count() {
    let faculty = vec![
        member("A", Some("CSE"), Some("Big Institute"), None),
        member("B", Some("ECE"), Some("Big Institute"), None),
        member("C", Some("CSE"), Some("Small College"), None),
        member("D", None, None, None),
    ];
    let reply = format_institutions(&faculty);
    assert!(reply.starts_with("Here are the top institutions by faculty count:"));
    let big = reply.find("Big Institute").unwrap();
    let small = reply.find("Small College").unwrap();
    assert!(big < small);
    assert!(reply.contains("• Big Institute\n  Faculty: 2, Departments: 2"));
    assert!(reply.contains("• Small College\n  Faculty: 1, Departments: 1"));
    assert!(reply.ends_with("Total institutions: 2"));
}

#[test]
fn publications_reply_includes_bibliometrics() {
    let publication = PublicationRecord {
        id: Uuid::new_v4(),
        title: "Edge Caching".to_owned(),
        year: Some(2023),
        publication_type: None,
        doi: None,
        r#abstract: None,
        venue: Some("SIGCOMM".to_owned()),
        publisher: None,
        citation_count: 12,
        impact_factor: None,
        paper_url: None,
        pdf_url: None,
    };
    let reply = format_publications("edge caching papers", &[publication]);
    assert!(reply.starts_with("Here are the publications for edge caching papers:"));
    assert!(reply.contains("• Edge Caching\n  Citations: 12\n  Venue: SIGCOMM\n  Year: 2023"));
    assert!(reply.ends_with("Total publications: 1"));
}

#[test]
fn publications_reply_empty() {
    assert_eq!(format_publications("x", &[]), "No publications found for the given faculty.");
}

#[test]
fn trends_reply_formats_growth() {
    let trends = vec![TrendRecord {
        id: Uuid::new_v4(),
        topic: "Federated Learning".to_owned(),
        category: Some("Machine Learning".to_owned()),
        year: 2024,
        quarter: 1,
        publication_count: 42,
        citation_count: 300,
        faculty_count: 7,
        growth_rate: Some(12.5),
        trending_score: Some(91.0),
    }];
    let reply = format_trends(&trends);
    assert!(reply.starts_with("Here are the top 5 research trends:"));
    assert!(reply.contains("• Federated Learning\n  Category: Machine Learning\n  Growth Rate: 12.5%\n  Publications: 42"));
}

#[test]
fn statistics_reply_lists_all_counters() {
    let reply = format_statistics(DirectoryStats {
        faculty: 120,
        publications: 900,
        trends: 14,
        institutions: 6,
        departments: 18,
    });
    assert!(reply.contains("• Total Faculty Members: 120"));
    assert!(reply.contains("• Total Publications: 900"));
    assert!(reply.contains("• Active Research Trends: 14"));
    assert!(reply.contains("• Institutions: 6"));
    assert!(reply.contains("• Departments: 18"));
}

#[test]
fn search_results_truncate_to_five_with_tail() {
    let faculty: Vec<FacultyRecord> = (0..7)
        .map(|i| member(&format!("S{i}"), Some("CSE"), None, Some(i)))
        .collect();
    let reply = format_search_results(&faculty);
    assert!(reply.starts_with("Here are the most relevant faculty members:"));
    assert!(reply.contains("S4"));
    assert!(!reply.contains("• S5\n"));
    assert!(reply.ends_with("... and 2 more results."));
}

#[test]
fn search_results_empty() {
    assert_eq!(format_search_results(&[]), "No faculty members found matching your search.");
}

#[test]
fn help_lists_supported_topics() {
    let help = help_message();
    assert!(help.contains("• Faculty members and their research"));
    assert!(help.contains("• General statistics"));
    assert!(help.ends_with("Please ask me about any of these topics!"));
}
