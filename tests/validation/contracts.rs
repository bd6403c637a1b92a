use serde_json::json;
use tasklane::{
    domain::{TaskPriority, TaskStatus, TaskVisibility},
    validation::{
        AssignTaskRequest, CreateProjectRequest, CreateTaskRequest, CreateWorkspaceRequest,
        RequestContract, TaskFilters, UpdateProjectRequest, UpdateTaskRequest,
    },
};
use uuid::Uuid;

#[test]
fn project_with_empty_name_reports_required() {
    let errors = CreateProjectRequest::validate_payload(&json!({ "name": "" })).unwrap_err();
    assert_eq!(errors.get("name"), Some("Name is required"));
}

#[test]
fn project_with_name_only_succeeds() {
    let request = CreateProjectRequest::validate_payload(&json!({ "name": "Launch" })).unwrap();
    assert_eq!(request.name, "Launch");
    assert_eq!(request.description, None);
}

#[test]
fn task_with_bad_project_id_fails_on_that_field() {
    let errors = CreateTaskRequest::validate_payload(&json!({
        "project_id": "not-a-uuid",
        "title": "x"
    }))
    .unwrap_err();
    assert!(errors.contains("project_id"));
    assert!(!errors.contains("title"));
}

#[test]
fn task_defaults_priority_and_visibility() {
    let request = CreateTaskRequest::validate_payload(&json!({
        "project_id": Uuid::new_v4().to_string(),
        "title": "Fix bug"
    }))
    .unwrap();
    assert_eq!(request.priority, TaskPriority::Medium);
    assert_eq!(request.visibility, TaskVisibility::Workspace);
}

#[test]
fn empty_filters_use_default_pagination() {
    let filters = TaskFilters::validate_payload(&json!({})).unwrap();
    assert_eq!((filters.page, filters.limit), (1, 50));
}

#[test]
fn filter_limit_above_hundred_fails() {
    let errors = TaskFilters::validate_payload(&json!({ "limit": 500 })).unwrap_err();
    assert!(errors.contains("limit"));
}

#[test]
fn violations_are_reported_together() {
    let errors = CreateWorkspaceRequest::validate_payload(&json!({
        "name": "",
        "slug": "UPPER"
    }))
    .unwrap_err();
    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["name", "slug"]);
}

#[test]
fn non_object_payloads_are_rejected() {
    for payload in [json!(null), json!("name"), json!([1, 2]), json!(42)] {
        let errors = CreateProjectRequest::validate_payload(&payload).unwrap_err();
        assert!(errors.contains("$"));
    }
}

#[test]
fn update_payloads_are_partial() {
    assert!(UpdateProjectRequest::validate_payload(&json!({})).unwrap().is_empty());
    assert!(UpdateTaskRequest::validate_payload(&json!({})).unwrap().is_empty());
}

#[test]
fn task_status_moves_freely() {
    let done = UpdateTaskRequest::validate_payload(&json!({ "status": "done" })).unwrap();
    assert_eq!(done.status, Some(TaskStatus::Done));

    let reopened = UpdateTaskRequest::validate_payload(&json!({ "status": "todo" })).unwrap();
    assert_eq!(reopened.status, Some(TaskStatus::Todo));
}

#[test]
fn unassign_with_explicit_null() {
    let request = AssignTaskRequest::validate_payload(&json!({ "user_id": null })).unwrap();
    assert_eq!(request.user_id, None);

    let errors = AssignTaskRequest::validate_payload(&json!({ "user_id": "bob" })).unwrap_err();
    assert!(errors.contains("user_id"));
}

#[test]
fn due_date_accepts_iso_datetimes() {
    let request = CreateTaskRequest::validate_payload(&json!({
        "project_id": Uuid::new_v4().to_string(),
        "title": "Ship",
        "due_date": "2030-06-01T12:00:00Z"
    }))
    .unwrap();
    assert_eq!(request.due_date.unwrap().to_rfc3339(), "2030-06-01T12:00:00+00:00");
}
