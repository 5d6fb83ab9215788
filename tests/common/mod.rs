//! Shared fixtures for dispatcher integration tests

use postline::config::Profile;
use postline::{ApiClient, ApiDialect, Dispatcher, MockFormView};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn dispatcher_for(
    server: &MockServer,
    dialect: ApiDialect,
) -> (Dispatcher<MockFormView>, MockFormView) {
    let profile = Profile::blank("test")
        .with_server(&server.uri())
        .with_dialect(dialect);
    let client = ApiClient::new(&profile).expect("client for mock server");
    let view = MockFormView::new();
    (Dispatcher::new(client, dialect, view.clone()), view)
}

/// Fail the test if any request at all reaches the server
pub async fn expect_no_requests(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}
