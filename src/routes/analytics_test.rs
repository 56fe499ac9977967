use super::*;

#[test]
fn no_data_maps_to_not_found() {
    let err = AnalyticsError::NoData("no research trends data found");
    assert_eq!(analytics_error_to_status(&err), StatusCode::NOT_FOUND);
}

#[test]
fn database_errors_map_to_internal_error() {
    let err = AnalyticsError::Database(sqlx::Error::PoolClosed);
    assert_eq!(analytics_error_to_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn area_query_deserializes_partial_filters() {
    let query: AreaQuery = serde_json::from_str(r#"{"institution":"Ramaiah Institute of Technology"}"#).unwrap();
    assert_eq!(query.institution.as_deref(), Some("Ramaiah Institute of Technology"));
    assert!(query.department.is_none());
}

#[test]
fn analytics_response_uses_camel_case_keys() {
    let analytics = crate::services::analytics::compute_research_analytics(&[], &[]);
    let json = serde_json::to_value(&analytics).unwrap();
    assert!(json.get("facultyByDepartment").is_some());
    assert!(json.get("publicationTrends").is_some());
    assert!(json.get("topResearchAreas").is_some());
    assert_eq!(json["metrics"]["totalFaculty"], 0);
    assert!(json["metrics"].get("averageHIndex").is_some());
}

#[test]
fn area_response_embeds_domain_distribution_in_metrics() {
    let analytics = crate::services::analytics::compute_research_areas(&[], 2024);
    let json = serde_json::to_value(&analytics).unwrap();
    assert!(json["metrics"].get("domainDistribution").is_some());
    assert!(json.get("topResearchAreas").is_some());
}
