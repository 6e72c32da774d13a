use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::db::types::{AssessmentKind, Season};
use crate::test_support::{self, TestContext};

async fn send(
    ctx: &TestContext,
    method: Method,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(method, uri, Some(token), body))
        .await
        .expect("response");
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return (status, Value::Null);
    }
    (status, test_support::read_json(response).await)
}

#[tokio::test]
async fn owner_creates_lists_and_reads_courses() {
    let ctx = test_support::setup_test_context().await;
    let owner = test_support::insert_user(ctx.state.db(), "owner@example.com", "Owner").await;
    let token = test_support::bearer_token(&owner.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            Some(&token),
            Some(json!({ "title": "  Compilers  ", "description": "Parsing and codegen" })),
        ))
        .await
        .expect("create course");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = test_support::read_json(response).await;
    assert_eq!(created["title"], "Compilers");
    assert_eq!(created["owner_id"], owner.id.as_str());
    let course_id = created["id"].as_str().expect("course id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/courses", Some(&token), None))
        .await
        .expect("list courses");
    assert_eq!(response.status(), StatusCode::OK);
    let listed = test_support::read_json(response).await;
    assert_eq!(listed.as_array().expect("courses").len(), 1);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/courses/{course_id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("get course");
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = test_support::read_json(response).await;
    assert_eq!(fetched["description"], "Parsing and codegen");
}

#[tokio::test]
async fn blank_course_title_is_rejected() {
    let ctx = test_support::setup_test_context().await;
    let owner = test_support::insert_user(ctx.state.db(), "owner@example.com", "Owner").await;
    let token = test_support::bearer_token(&owner.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            Some(&token),
            Some(json!({ "title": "   " })),
        ))
        .await
        .expect("create course");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn other_users_course_is_forbidden() {
    let ctx = test_support::setup_test_context().await;
    let owner = test_support::insert_user(ctx.state.db(), "owner@example.com", "Owner").await;
    let course = test_support::insert_course(ctx.state.db(), &owner.id, "Private").await;
    let other = test_support::insert_user(ctx.state.db(), "other@example.com", "Other").await;
    let token = test_support::bearer_token(&other.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/courses/{}", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("get course");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/courses", Some(&token), None))
        .await
        .expect("list courses");
    let listed = test_support::read_json(response).await;
    assert!(listed.as_array().expect("courses").is_empty());
}

#[tokio::test]
async fn missing_course_is_not_found() {
    let ctx = test_support::setup_test_context().await;
    let owner = test_support::insert_user(ctx.state.db(), "owner@example.com", "Owner").await;
    let token = test_support::bearer_token(&owner.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/courses/unknown",
            Some(&token),
            None,
        ))
        .await
        .expect("get course");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn owner_updates_course_and_grades() {
    let ctx = test_support::setup_test_context().await;
    let owner = test_support::insert_user(ctx.state.db(), "owner@example.com", "Owner").await;
    let course = test_support::insert_course(ctx.state.db(), &owner.id, "Compilers").await;
    let token = test_support::bearer_token(&owner.id, ctx.state.settings());
    let uri = format!("/api/v1/courses/{}", course.id);

    let (status, body) = send(
        &ctx,
        Method::PUT,
        &uri,
        &token,
        Some(json!({
            "title": " Advanced Compilers ",
            "description": "SSA and register allocation"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["title"], "Advanced Compilers");
    assert_eq!(body["description"], "SSA and register allocation");

    let (status, _) = send(&ctx, Method::PUT, &uri, &token, Some(json!({ "title": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &ctx,
        Method::PUT,
        &format!("{uri}/grades"),
        &token,
        Some(json!({ "targetGrade": 4.5, "earnedGrade": 4.0, "completedCredits": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["target_grade"], 4.5);
    assert_eq!(body["completed_credits"], 3);

    let (status, _) = send(
        &ctx,
        Method::PUT,
        &format!("{uri}/grades"),
        &token,
        Some(json!({ "completed_credits": -3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_course_removes_its_assessments() {
    let ctx = test_support::setup_test_context().await;
    let owner = test_support::insert_user(ctx.state.db(), "owner@example.com", "Owner").await;
    let course = test_support::insert_course(ctx.state.db(), &owner.id, "Compilers").await;
    let exam =
        test_support::insert_assessment(ctx.state.db(), AssessmentKind::Exam, &course, "Final")
            .await;
    let token = test_support::bearer_token(&owner.id, ctx.state.settings());

    let other = test_support::insert_user(ctx.state.db(), "other@example.com", "Other").await;
    let other_token = test_support::bearer_token(&other.id, ctx.state.settings());
    let uri = format!("/api/v1/courses/{}", course.id);
    let (status, _) = send(&ctx, Method::DELETE, &uri, &other_token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&ctx, Method::DELETE, &uri, &token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&ctx, Method::GET, &uri, &token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) =
        send(&ctx, Method::GET, &format!("/api/v1/exams/{}", exam.id), &token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn courses_are_filed_under_owned_semesters() {
    let ctx = test_support::setup_test_context().await;
    let owner = test_support::insert_user(ctx.state.db(), "owner@example.com", "Owner").await;
    let token = test_support::bearer_token(&owner.id, ctx.state.settings());
    let spring =
        test_support::insert_semester(ctx.state.db(), &owner.id, 2025, Season::Spring).await;
    let fall = test_support::insert_semester(ctx.state.db(), &owner.id, 2025, Season::Fall).await;

    for (title, semester_id) in [("Algorithms", &spring.id), ("Graphics", &fall.id)] {
        let (status, body) = send(
            &ctx,
            Method::POST,
            "/api/v1/courses",
            &token,
            Some(json!({ "title": title, "semesterId": semester_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "response: {body}");
        assert_eq!(body["semester_id"], semester_id.as_str());
    }

    let (status, body) = send(
        &ctx,
        Method::GET,
        &format!("/api/v1/courses/semester/{}", spring.id),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .expect("courses")
        .iter()
        .map(|course| course["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, ["Algorithms"]);

    let other = test_support::insert_user(ctx.state.db(), "other@example.com", "Other").await;
    let other_token = test_support::bearer_token(&other.id, ctx.state.settings());
    let (status, _) = send(
        &ctx,
        Method::POST,
        "/api/v1/courses",
        &other_token,
        Some(json!({ "title": "Intruder", "semester_id": spring.id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &ctx,
        Method::GET,
        &format!("/api/v1/courses/semester/{}", spring.id),
        &other_token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &ctx,
        Method::POST,
        "/api/v1/courses",
        &token,
        Some(json!({ "title": "Orphan", "semester_id": "missing" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
