use proptest::prelude::*;
use serde_json::json;
use tasklane::validation::{
    CreateProjectRequest, CreateTaskRequest, CreateWorkspaceRequest, RequestContract, TaskFilters,
};

proptest! {
    #[test]
    fn valid_workspaces(name in "[A-Za-z0-9][A-Za-z0-9 ]{0,98}[A-Za-z0-9]", slug in "[a-z0-9-]{1,50}") {
        let request = CreateWorkspaceRequest::validate_payload(&json!({ "name": name, "slug": slug }));
        prop_assert!(request.is_ok());
    }

    #[test]
    fn slugs_with_foreign_characters_fail(slug in "[a-z0-9-]{0,20}[A-Z_ .][a-z0-9-]{0,20}") {
        let errors = CreateWorkspaceRequest::validate_payload(&json!({ "name": "Acme", "slug": slug }))
            .unwrap_err();
        prop_assert!(errors.contains("slug"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored(name in "[A-Za-z]{1,200}", pad in " {0,10}") {
        let padded = format!("{pad}{name}{pad}");
        let request = CreateProjectRequest::validate_payload(&json!({ "name": padded })).unwrap();
        prop_assert_eq!(request.name, name);
    }

    #[test]
    fn overlong_titles_fail(extra in 1usize..50) {
        let title = "t".repeat(500 + extra);
        let errors = CreateTaskRequest::validate_payload(&json!({
            "project_id": uuid::Uuid::new_v4().to_string(),
            "title": title
        }))
        .unwrap_err();
        prop_assert_eq!(errors.get("title"), Some("Title must be 500 characters or less"));
    }

    #[test]
    fn limits_within_range_pass(limit in 1u32..=100, page in 1u32..10_000) {
        let filters = TaskFilters::validate_payload(&json!({ "limit": limit, "page": page })).unwrap();
        prop_assert_eq!(filters.limit, limit);
        prop_assert_eq!(filters.page, page);
    }

    #[test]
    fn limits_out_of_range_fail(limit in prop_oneof![-1_000i64..=0, 101i64..100_000]) {
        let errors = TaskFilters::validate_payload(&json!({ "limit": limit })).unwrap_err();
        prop_assert!(errors.contains("limit"));
    }
}
