//! Concurrent submissions and batch runs

mod common;

use common::{dispatcher_for, request_count};
use postline::batch::{self, BatchEntry};
use postline::forms::field;
use postline::{ApiDialect, FormFields, FormId, ListRegion, Outcome, Submission, ViewCommand};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn outcomes_should_arrive_in_completion_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/blog_posts"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"message": "Blog post created successfully"}))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let (mut dispatcher, view) = dispatcher_for(&server, ApiDialect::Legacy);

    let post = FormFields::new()
        .with(field::TITLE, "Slow")
        .with(field::CONTENT, "Post");
    assert!(matches!(
        dispatcher.execute_async(FormId::CreatePost, &post),
        Submission::InFlight
    ));
    assert!(matches!(
        dispatcher.execute_async(FormId::ListComments, &FormFields::new()),
        Submission::InFlight
    ));
    assert_eq!(dispatcher.in_flight(), 2);

    let first = dispatcher.next_outcome().await.unwrap();
    assert!(matches!(
        first,
        Outcome::Listed {
            region: ListRegion::Comments,
            count: 0
        }
    ));

    let second = dispatcher.next_outcome().await.unwrap();
    assert!(matches!(second, Outcome::Delivered { status: 201, .. }));
    assert!(dispatcher.next_outcome().await.is_none());

    assert_eq!(
        view.get_commands(),
        vec![
            ViewCommand::ClearList(ListRegion::Comments),
            ViewCommand::Alert("Blog post created successfully".to_string()),
            ViewCommand::ResetForm(FormId::CreatePost),
        ]
    );
}

#[tokio::test]
async fn poll_outcome_should_not_block_while_request_is_pending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blog_posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    let (mut dispatcher, _view) = dispatcher_for(&server, ApiDialect::Legacy);

    dispatcher.execute_async(FormId::ListPosts, &FormFields::new());

    assert!(dispatcher.poll_outcome().is_none());
    assert_eq!(dispatcher.in_flight(), 1);
    assert!(dispatcher.next_outcome().await.is_some());
    assert_eq!(dispatcher.in_flight(), 0);
}

#[tokio::test]
async fn batch_should_tally_every_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/blog_posts"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"message": "Blog post created successfully"})),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/posts/42"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    let (mut dispatcher, view) = dispatcher_for(&server, ApiDialect::Legacy);

    let entries: Vec<BatchEntry> = batch::parse_batch(
        r#"[
            {"form": "create-post", "fields": {"title": "A", "content": "1"}},
            {"form": "create-post", "fields": {"title": "B", "content": "2"}},
            {"form": "create-post", "fields": {"title": "", "content": "3"}},
            {"form": "delete-post", "fields": {"postId": "42"}}
        ]"#,
    )
    .unwrap();

    let summary = batch::run_batch(&mut dispatcher, &entries).await;

    assert_eq!(summary.total(), 4);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.failed, 1);
    assert!(!summary.all_succeeded());
    assert_eq!(request_count(&server).await, 3);
    assert_eq!(
        view.alerts()
            .iter()
            .filter(|alert| alert.as_str() == "Blog post created successfully")
            .count(),
        2
    );
}
