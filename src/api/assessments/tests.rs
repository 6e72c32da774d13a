use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::db::types::AssessmentKind;
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

struct Owner {
    token: String,
    course_id: String,
}

async fn owner(ctx: &TestContext, email: &str) -> Owner {
    let user = test_support::insert_user(ctx.state.db(), email, "Course Owner").await;
    let course =
        test_support::insert_course(ctx.state.db(), &user.id, "Programming Languages").await;
    Owner {
        token: test_support::bearer_token(&user.id, ctx.state.settings()),
        course_id: course.id,
    }
}

async fn create(ctx: &TestContext, owner: &Owner, path: &str, title: &str) -> String {
    let (status, body) = send(
        ctx,
        Method::POST,
        &format!("/api/v1/{path}"),
        &owner.token,
        Some(json!({ "course_id": owner.course_id, "title": title })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["status"], "generate_in_progress");
    body["id"].as_str().expect("assessment id").to_string()
}

/// Stores items and returns their ids in submission order.
async fn generate(
    ctx: &TestContext,
    owner: &Owner,
    path: &str,
    assessment_id: &str,
    items: Value,
) -> Vec<String> {
    let (status, body) = send(
        ctx,
        Method::POST,
        &format!("/api/v1/{path}/{assessment_id}/items"),
        &owner.token,
        Some(json!({ "items": items })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["status"], "not_started");
    body["items"]
        .as_array()
        .expect("items")
        .iter()
        .map(|item| item["id"].as_str().expect("item id").to_string())
        .collect()
}

fn jvm_items() -> Value {
    json!([
        {
            "question": "The JVM executes bytecode.",
            "question_type": "true_or_false",
            "is_true_answer": true,
            "points": 10
        },
        {
            "question": "Which languages target the JVM?",
            "question_type": "multiple_choice",
            "choices": ["Kotlin", "Go", "Scala"],
            "answer_indices": [0, 2],
            "points": 10
        },
        {
            "question": "Name the runtime that executes Java bytecode.",
            "question_type": "short_answer",
            "text_answer": "JVM",
            "explanation": "Java Virtual Machine",
            "points": 5
        }
    ])
}

fn jvm_answers(item_ids: &[String], short_answer: &str) -> Value {
    json!({
        "answers": [
            { "item_id": item_ids[0], "selected_bool": true },
            { "item_id": item_ids[1], "selected_indices": [2, 0] },
            { "item_id": item_ids[2], "text_answer": short_answer }
        ]
    })
}

async fn count(ctx: &TestContext, table: &str, assessment_id: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE assessment_id = $1"))
        .bind(assessment_id)
        .fetch_one(ctx.state.db())
        .await
        .expect("count")
}

#[tokio::test]
async fn lowercase_short_answer_scores_twenty_of_twenty_five() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let exam_id = create(&ctx, &owner, "exams", "JVM basics").await;
    let item_ids = generate(&ctx, &owner, "exams", &exam_id, jvm_items()).await;

    let (status, body) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/exams/{exam_id}/submit"),
        &owner.token,
        Some(jvm_answers(&item_ids, "jvm")),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["status"], "graded");
    assert_eq!(body["result"]["score"], 20);
    assert_eq!(body["result"]["max_score"], 25);

    let correctness: Vec<(String, String)> = body["responses"]
        .as_array()
        .expect("responses")
        .iter()
        .map(|response| {
            (
                response["item_id"].as_str().unwrap().to_string(),
                response["correctness"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert!(correctness.contains(&(item_ids[0].clone(), "correct".to_string())));
    assert!(correctness.contains(&(item_ids[1].clone(), "correct".to_string())));
    assert!(correctness.contains(&(item_ids[2].clone(), "incorrect".to_string())));

    let (status, result) =
        send(&ctx, Method::GET, &format!("/api/v1/exams/{exam_id}/result"), &owner.token, None)
            .await;
    assert_eq!(status, StatusCode::OK, "response: {result}");
    assert_eq!(result["result"]["score"], 20);
    assert_eq!(result["assessment"]["status"], "graded");
    let elements = result["elements"].as_array().expect("elements");
    assert_eq!(elements.len(), 3);
    assert_eq!(elements[2]["item"]["answer"]["text_answer"], "JVM");
    assert_eq!(elements[2]["response"]["text_answer"], "jvm");
}

#[tokio::test]
async fn essay_only_quiz_is_partially_graded() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let quiz_id = create(&ctx, &owner, "quizzes", "Essay quiz").await;
    let item_ids = generate(
        &ctx,
        &owner,
        "quizzes",
        &quiz_id,
        json!([{
            "question": "Explain garbage collection.",
            "question_type": "essay",
            "points": 20
        }]),
    )
    .await;

    let (status, body) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/quizzes/{quiz_id}/submit"),
        &owner.token,
        Some(json!({ "answers": [{ "item_id": item_ids[0], "text_answer": "It frees memory." }] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["status"], "partially_graded");
    assert_eq!(body["result"]["score"], 0);
    assert_eq!(body["result"]["max_score"], 20);
    assert_eq!(body["responses"][0]["correctness"], "ungraded");

    let (status, _) =
        send(&ctx, Method::GET, &format!("/api/v1/quizzes/{quiz_id}/result"), &owner.token, None)
            .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn result_before_grading_is_bad_request() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let exam_id = create(&ctx, &owner, "exams", "Not yet taken").await;
    generate(&ctx, &owner, "exams", &exam_id, jvm_items()).await;

    let (status, body) =
        send(&ctx, Method::GET, &format!("/api/v1/exams/{exam_id}/result"), &owner.token, None)
            .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn missing_assessment_result_is_not_found() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;

    let (status, _) =
        send(&ctx, Method::GET, "/api/v1/exams/does-not-exist/result", &owner.token, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submission_by_another_user_is_forbidden() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let exam_id = create(&ctx, &owner, "exams", "Owned exam").await;
    let item_ids = generate(&ctx, &owner, "exams", &exam_id, jvm_items()).await;

    let intruder = test_support::insert_user(ctx.state.db(), "other@example.com", "Other").await;
    let intruder_token = test_support::bearer_token(&intruder.id, ctx.state.settings());

    let (status, _) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/exams/{exam_id}/submit"),
        &intruder_token,
        Some(jvm_answers(&item_ids, "JVM")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
        send(&ctx, Method::GET, &format!("/api/v1/exams/{exam_id}"), &intruder_token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(count(&ctx, "item_responses", &exam_id).await, 0);
}

#[tokio::test]
async fn second_submission_conflicts() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let exam_id = create(&ctx, &owner, "exams", "Single attempt").await;
    let item_ids = generate(&ctx, &owner, "exams", &exam_id, jvm_items()).await;
    let uri = format!("/api/v1/exams/{exam_id}/submit");

    let (status, _) =
        send(&ctx, Method::POST, &uri, &owner.token, Some(jvm_answers(&item_ids, "JVM"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        send(&ctx, Method::POST, &uri, &owner.token, Some(jvm_answers(&item_ids, "JVM"))).await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");
    assert_eq!(count(&ctx, "assessment_results", &exam_id).await, 1);
    assert_eq!(count(&ctx, "item_responses", &exam_id).await, 3);
}

#[tokio::test]
async fn concurrent_submissions_grade_once() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let exam_id = create(&ctx, &owner, "exams", "Racing attempts").await;
    let item_ids = generate(&ctx, &owner, "exams", &exam_id, jvm_items()).await;
    let uri = format!("/api/v1/exams/{exam_id}/submit");
    let request = || {
        test_support::json_request(
            Method::POST,
            &uri,
            Some(owner.token.as_str()),
            Some(jvm_answers(&item_ids, "JVM")),
        )
    };

    let (first, second) =
        tokio::join!(ctx.app.clone().oneshot(request()), ctx.app.clone().oneshot(request()));
    let mut statuses = [first.expect("response").status(), second.expect("response").status()];
    statuses.sort();

    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);
    assert_eq!(count(&ctx, "assessment_results", &exam_id).await, 1);
    assert_eq!(count(&ctx, "item_responses", &exam_id).await, 3);
}

#[tokio::test]
async fn generated_items_without_points_take_type_defaults() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let quiz_id = create(&ctx, &owner, "quizzes", "Default weights").await;

    let (status, body) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/quizzes/{quiz_id}/items"),
        &owner.token,
        Some(json!({
            "items": [
                { "question": "TF", "question_type": "true_or_false", "is_true_answer": true },
                {
                    "question": "MC",
                    "question_type": "multiple_choice",
                    "choices": ["a", "b"],
                    "answer_indices": [1]
                },
                { "question": "SA", "question_type": "short_answer", "text_answer": "x" },
                { "question": "Essay", "question_type": "essay" },
                { "question": "Weighted", "question_type": "essay", "points": 40 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");

    let points: Vec<i64> = body["items"]
        .as_array()
        .expect("items")
        .iter()
        .map(|item| item["points"].as_i64().expect("points"))
        .collect();
    assert_eq!(points, vec![1, 3, 5, 10, 40]);
}

#[tokio::test]
async fn untyped_item_rolls_back_whole_submission() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let exam_id = create(&ctx, &owner, "exams", "Broken generator output").await;
    let item_ids = generate(
        &ctx,
        &owner,
        "exams",
        &exam_id,
        json!([
            { "question": "Valid", "question_type": "true_or_false", "is_true_answer": true },
            { "question": "Missing type", "question_type": null }
        ]),
    )
    .await;

    let (status, body) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/exams/{exam_id}/submit"),
        &owner.token,
        Some(json!({ "answers": [{ "item_id": item_ids[0], "selected_bool": true }] })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "response: {body}");

    let (status, exam) =
        send(&ctx, Method::GET, &format!("/api/v1/exams/{exam_id}"), &owner.token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(exam["status"], "not_started");
    assert_eq!(count(&ctx, "assessment_results", &exam_id).await, 0);
    assert_eq!(count(&ctx, "item_responses", &exam_id).await, 0);
}

#[tokio::test]
async fn submission_while_generating_is_bad_request() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let exam_id = create(&ctx, &owner, "exams", "Still generating").await;

    let (status, body) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/exams/{exam_id}/submit"),
        &owner.token,
        Some(json!({ "answers": [{ "item_id": "anything", "selected_bool": true }] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
}

#[tokio::test]
async fn invalid_answer_lists_are_rejected() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let exam_id = create(&ctx, &owner, "exams", "Validation").await;
    let item_ids = generate(&ctx, &owner, "exams", &exam_id, jvm_items()).await;
    let uri = format!("/api/v1/exams/{exam_id}/submit");

    let (status, _) = send(&ctx, Method::POST, &uri, &owner.token, Some(json!({ "answers": [] })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let foreign = json!({ "answers": [{ "item_id": "not-an-item", "selected_bool": true }] });
    let (status, _) = send(&ctx, Method::POST, &uri, &owner.token, Some(foreign)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let repeated = json!({
        "answers": [
            { "item_id": item_ids[0], "selected_bool": true },
            { "item_id": item_ids[0], "selected_bool": false }
        ]
    });
    let (status, _) = send(&ctx, Method::POST, &uri, &owner.token, Some(repeated)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, exam) =
        send(&ctx, Method::GET, &format!("/api/v1/exams/{exam_id}"), &owner.token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(exam["status"], "not_started");
}

#[tokio::test]
async fn items_cannot_be_generated_twice() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let exam_id = create(&ctx, &owner, "exams", "Generated once").await;
    generate(&ctx, &owner, "exams", &exam_id, jvm_items()).await;

    let (status, _) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/exams/{exam_id}/items"),
        &owner.token,
        Some(json!({ "items": jvm_items() })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn answer_keys_are_hidden_until_graded() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let exam_id = create(&ctx, &owner, "exams", "Hidden answers").await;
    let item_ids = generate(&ctx, &owner, "exams", &exam_id, jvm_items()).await;
    let uri = format!("/api/v1/exams/{exam_id}");

    let (_, before) = send(&ctx, Method::GET, &uri, &owner.token, None).await;
    assert!(before["items"][0].get("answer").is_none(), "answers leaked: {before}");

    send(
        &ctx,
        Method::POST,
        &format!("{uri}/submit"),
        &owner.token,
        Some(jvm_answers(&item_ids, "JVM")),
    )
    .await;

    let (_, after) = send(&ctx, Method::GET, &uri, &owner.token, None).await;
    assert_eq!(after["status"], "graded");
    assert_eq!(after["items"][0]["answer"]["is_true_answer"], true);
}

#[tokio::test]
async fn exam_routes_do_not_serve_quizzes() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let quiz_id = create(&ctx, &owner, "quizzes", "A quiz").await;

    let (status, _) =
        send(&ctx, Method::GET, &format!("/api/v1/exams/{quiz_id}"), &owner.token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        send(&ctx, Method::GET, &format!("/api/v1/quizzes/{quiz_id}"), &owner.token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "quiz");
}

#[tokio::test]
async fn course_results_and_average() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;

    let first = create(&ctx, &owner, "exams", "First").await;
    let first_items = generate(&ctx, &owner, "exams", &first, jvm_items()).await;
    send(
        &ctx,
        Method::POST,
        &format!("/api/v1/exams/{first}/submit"),
        &owner.token,
        Some(jvm_answers(&first_items, "jvm")),
    )
    .await;

    let second = create(&ctx, &owner, "exams", "Second").await;
    let second_items = generate(&ctx, &owner, "exams", &second, jvm_items()).await;
    send(
        &ctx,
        Method::POST,
        &format!("/api/v1/exams/{second}/submit"),
        &owner.token,
        Some(jvm_answers(&second_items, "JVM")),
    )
    .await;

    // Quizzes are averaged separately.
    let quiz = create(&ctx, &owner, "quizzes", "Ignored").await;
    generate(&ctx, &owner, "quizzes", &quiz, jvm_items()).await;

    let course_id = owner.course_id.clone();
    let (status, results) = send(
        &ctx,
        Method::GET,
        &format!("/api/v1/exams/course/{course_id}/results"),
        &owner.token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {results}");
    assert_eq!(results.as_array().expect("results").len(), 2);

    let (status, average) = send(
        &ctx,
        Method::GET,
        &format!("/api/v1/exams/course/{course_id}/average"),
        &owner.token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {average}");
    assert_eq!(average["results_counted"], 2);
    let percent = average["average_percent"].as_f64().expect("percent");
    assert!((percent - 90.0).abs() < 1e-9, "average {percent}");

    let (_, quiz_average) = send(
        &ctx,
        Method::GET,
        &format!("/api/v1/quizzes/course/{course_id}/average"),
        &owner.token,
        None,
    )
    .await;
    assert_eq!(quiz_average["results_counted"], 0);
    assert_eq!(quiz_average["average_percent"], 0.0);
}

#[tokio::test]
async fn liked_items_are_listed_per_course() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let quiz_id = create(&ctx, &owner, "quizzes", "Likeable").await;
    let item_ids = generate(&ctx, &owner, "quizzes", &quiz_id, jvm_items()).await;
    let toggle = format!("/api/v1/quizzes/{quiz_id}/items/{}/toggle-like", item_ids[1]);

    let (status, item) = send(&ctx, Method::POST, &toggle, &owner.token, None).await;
    assert_eq!(status, StatusCode::OK, "response: {item}");
    assert_eq!(item["is_liked"], true);

    let liked_uri = format!("/api/v1/quizzes/course/{}/items/liked", owner.course_id);
    let (_, liked) = send(&ctx, Method::GET, &liked_uri, &owner.token, None).await;
    let liked = liked.as_array().expect("liked");
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0]["id"], item_ids[1].as_str());

    let (_, item) = send(&ctx, Method::POST, &toggle, &owner.token, None).await;
    assert_eq!(item["is_liked"], false);
    let (_, liked) = send(&ctx, Method::GET, &liked_uri, &owner.token, None).await;
    assert!(liked.as_array().expect("liked").is_empty());

    let missing = format!("/api/v1/quizzes/{quiz_id}/items/unknown/toggle-like");
    let (status, _) = send(&ctx, Method::POST, &missing, &owner.token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rename_list_and_delete() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let exam_id = create(&ctx, &owner, "exams", "Draft title").await;
    let uri = format!("/api/v1/exams/{exam_id}");

    let (status, renamed) =
        send(&ctx, Method::PATCH, &uri, &owner.token, Some(json!({ "title": "Final title" })))
            .await;
    assert_eq!(status, StatusCode::OK, "response: {renamed}");
    assert_eq!(renamed["title"], "Final title");

    let list_uri = format!("/api/v1/exams/course/{}", owner.course_id);
    let (_, listed) = send(&ctx, Method::GET, &list_uri, &owner.token, None).await;
    assert_eq!(listed.as_array().expect("list").len(), 1);

    let (status, _) = send(&ctx, Method::DELETE, &uri, &owner.token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&ctx, Method::GET, &uri, &owner.token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn assessments_require_course_ownership() {
    let ctx = test_support::setup_test_context().await;
    let owner = owner(&ctx, "owner@example.com").await;
    let stranger = test_support::insert_user(ctx.state.db(), "stranger@example.com", "S").await;
    let stranger_token = test_support::bearer_token(&stranger.id, ctx.state.settings());

    let (status, _) = send(
        &ctx,
        Method::POST,
        "/api/v1/exams",
        &stranger_token,
        Some(json!({ "course_id": owner.course_id, "title": "Sneaky" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &ctx,
        Method::POST,
        "/api/v1/exams",
        &owner.token,
        Some(json!({ "course_id": "missing-course", "title": "Orphan" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stored_assessment_starts_in_generation() {
    let ctx = test_support::setup_test_context().await;
    let user = test_support::insert_user(ctx.state.db(), "direct@example.com", "Direct").await;
    let course = test_support::insert_course(ctx.state.db(), &user.id, "Direct course").await;

    let assessment =
        test_support::insert_assessment(ctx.state.db(), AssessmentKind::Quiz, &course, "Direct")
            .await;

    assert_eq!(assessment.status, crate::db::types::AssessmentStatus::GenerateInProgress);
    assert!(assessment.contents_generated_at.is_none());
}
