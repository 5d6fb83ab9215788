//! # Form-to-API Dispatcher
//!
//! Drives one submission through validate → request → respond:
//!
//! - local rejection: the fixed message is shown, nothing is sent, the form
//!   keeps its values
//! - any JSON answer: the server's message is shown and the form is reset,
//!   whatever the business outcome
//! - transport or decode failure: logged only; no notification, no reset
//!
//! Fetch actions replace the contents of their list region instead of
//! showing a message. A fetch answered with a non-2xx status, or with a
//! body of the wrong shape, counts as a decode failure and leaves the
//! region as it was.

use tokio::sync::mpsc;

use super::client::{ApiClient, ApiResponse};
use super::error::DispatchError;
use super::forms::{field, FormFields, FormId};
use super::handlers::HandlerRegistry;
use super::listing;
use super::routes::{ApiDialect, ApiRequest};
use super::validation::ValidationError;
use super::view::{FormView, ListRegion};

const OUTCOME_CHANNEL_CAPACITY: usize = 32;

/// Result of one dispatched form
#[derive(Debug)]
pub enum Outcome {
    /// Blocked by local validation; no request was sent
    Rejected(ValidationError),
    /// The server answered; its message was shown
    Delivered { status: u16, message: String },
    /// A fetch rendered `count` entries
    Listed { region: ListRegion, count: usize },
    /// Transport or decode failure; only logged
    Failed(DispatchError),
}

impl Outcome {
    /// Whether the request reached the server and the answer was presented
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Delivered { .. } | Outcome::Listed { .. })
    }
}

/// Completed request travelling back from a spawned task
#[derive(Debug)]
pub struct DispatchMessage {
    pub form: FormId,
    pub result: Result<ApiResponse, DispatchError>,
}

/// State of an asynchronous submission right after it was made
#[derive(Debug)]
pub enum Submission {
    /// The request is in flight; its outcome arrives through the channel
    InFlight,
    /// Resolved without a request (local rejection or no handler)
    Resolved(Outcome),
}

pub struct Dispatcher<V: FormView> {
    client: ApiClient,
    registry: HandlerRegistry,
    dialect: ApiDialect,
    view: V,
    in_flight: usize,
    outcome_receiver: mpsc::Receiver<DispatchMessage>,
    outcome_sender: mpsc::Sender<DispatchMessage>,
}

impl<V: FormView> Dispatcher<V> {
    /// Create a dispatcher with the default handler for every form
    pub fn new(client: ApiClient, dialect: ApiDialect, view: V) -> Self {
        Self::with_registry(client, HandlerRegistry::new(), dialect, view)
    }

    pub fn with_registry(
        client: ApiClient,
        registry: HandlerRegistry,
        dialect: ApiDialect,
        view: V,
    ) -> Self {
        let (outcome_sender, outcome_receiver) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);
        Self {
            client,
            registry,
            dialect,
            view,
            in_flight: 0,
            outcome_receiver,
            outcome_sender,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn dialect(&self) -> ApiDialect {
        self.dialect
    }

    /// Number of spawned submissions whose outcome has not been applied
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Submit a form and wait for its outcome
    pub async fn submit(&mut self, form: FormId, fields: &FormFields) -> Outcome {
        let request = match self.prepare(form, fields) {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };
        let result = self.client.send(&request).await;
        self.apply(form, result)
    }

    /// Submit a form without waiting for the network
    ///
    /// Local rejection is resolved immediately. Otherwise the request runs
    /// on its own task and its outcome is collected with
    /// [`poll_outcome`](Self::poll_outcome) or
    /// [`next_outcome`](Self::next_outcome). Outcomes arrive in completion
    /// order, not submission order.
    pub fn execute_async(&mut self, form: FormId, fields: &FormFields) -> Submission {
        let request = match self.prepare(form, fields) {
            Ok(request) => request,
            Err(outcome) => return Submission::Resolved(outcome),
        };

        let client = self.client.clone();
        let result_sender = self.outcome_sender.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let result = client.send(&request).await;
            // The receiver lives as long as the dispatcher; a send error
            // means nobody is left to show the outcome.
            let _ = result_sender.send(DispatchMessage { form, result }).await;
        });

        Submission::InFlight
    }

    /// Apply a completed submission if one is ready (non-blocking)
    pub fn poll_outcome(&mut self) -> Option<Outcome> {
        let message = self.outcome_receiver.try_recv().ok()?;
        Some(self.apply_message(message))
    }

    /// Wait for the next completed submission and apply it
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_outcome(&mut self) -> Option<Outcome> {
        if self.in_flight == 0 {
            return None;
        }
        let message = self.outcome_receiver.recv().await?;
        Some(self.apply_message(message))
    }

    pub async fn register(&mut self, username: &str, email: &str, password: &str) -> Outcome {
        let fields = FormFields::new()
            .with(field::USERNAME, username)
            .with(field::EMAIL, email)
            .with(field::PASSWORD, password);
        self.submit(FormId::Register, &fields).await
    }

    pub async fn login(&mut self, username_or_email: &str, password: &str) -> Outcome {
        let fields = FormFields::new()
            .with(field::USERNAME_OR_EMAIL, username_or_email)
            .with(field::PASSWORD, password);
        self.submit(FormId::Login, &fields).await
    }

    pub async fn create_post(&mut self, title: &str, content: &str) -> Outcome {
        let fields = FormFields::new()
            .with(field::TITLE, title)
            .with(field::CONTENT, content);
        self.submit(FormId::CreatePost, &fields).await
    }

    pub async fn update_post(&mut self, post_id: &str, title: &str, content: &str) -> Outcome {
        let fields = FormFields::new()
            .with(field::POST_ID, post_id)
            .with(field::TITLE, title)
            .with(field::CONTENT, content);
        self.submit(FormId::UpdatePost, &fields).await
    }

    pub async fn delete_post(&mut self, post_id: &str) -> Outcome {
        let fields = FormFields::new().with(field::POST_ID, post_id);
        self.submit(FormId::DeletePost, &fields).await
    }

    pub async fn create_comment(
        &mut self,
        commenter_name: &str,
        comment_text: &str,
        post_id: &str,
    ) -> Outcome {
        let fields = FormFields::new()
            .with(field::COMMENTER_NAME, commenter_name)
            .with(field::COMMENT_TEXT, comment_text)
            .with(field::POST_ID, post_id);
        self.submit(FormId::CreateComment, &fields).await
    }

    pub async fn update_comment(
        &mut self,
        comment_id: &str,
        commenter_name: &str,
        comment_text: &str,
        post_id: &str,
    ) -> Outcome {
        let fields = FormFields::new()
            .with(field::COMMENT_ID, comment_id)
            .with(field::COMMENTER_NAME, commenter_name)
            .with(field::COMMENT_TEXT, comment_text)
            .with(field::POST_ID, post_id);
        self.submit(FormId::UpdateComment, &fields).await
    }

    pub async fn delete_comment(&mut self, comment_id: &str) -> Outcome {
        let fields = FormFields::new().with(field::COMMENT_ID, comment_id);
        self.submit(FormId::DeleteComment, &fields).await
    }

    pub async fn list_posts(&mut self) -> Outcome {
        self.submit(FormId::ListPosts, &FormFields::new()).await
    }

    pub async fn list_comments(&mut self) -> Outcome {
        self.submit(FormId::ListComments, &FormFields::new()).await
    }

    pub async fn show_post(&mut self, post_id: &str) -> Outcome {
        let fields = FormFields::new().with(field::POST_ID, post_id);
        self.submit(FormId::ShowPost, &fields).await
    }

    pub async fn show_comment(&mut self, comment_id: &str) -> Outcome {
        let fields = FormFields::new().with(field::COMMENT_ID, comment_id);
        self.submit(FormId::ShowComment, &fields).await
    }

    /// Resolve the handler and prepare the request, or settle the outcome
    /// locally.
    fn prepare(&mut self, form: FormId, fields: &FormFields) -> Result<ApiRequest, Outcome> {
        let Some(handler) = self.registry.get(form) else {
            let error = DispatchError::NoHandler(form);
            tracing::error!("{}", error);
            return Err(Outcome::Failed(error));
        };

        match handler.prepare(fields, self.dialect) {
            Ok(request) => {
                tracing::debug!("{} prepared {}", handler.name(), request);
                Ok(request)
            }
            Err(rejection) => {
                tracing::debug!("Form '{}' rejected locally: {:?}", form, rejection);
                self.show_alert(&rejection.to_string());
                Err(Outcome::Rejected(rejection))
            }
        }
    }

    fn apply_message(&mut self, message: DispatchMessage) -> Outcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.apply(message.form, message.result)
    }

    fn apply(&mut self, form: FormId, result: Result<ApiResponse, DispatchError>) -> Outcome {
        let response = match result {
            Ok(response) => response,
            Err(error) => {
                tracing::error!("Form '{}' failed: {}", form, error);
                return Outcome::Failed(error);
            }
        };

        match form.list_region() {
            Some(region) => self.render_list(form, region, &response),
            None => {
                let message = response.message();
                tracing::info!("Form '{}' answered {}: {}", form, response.status(), message);
                self.show_alert(&message);
                if let Err(e) = self.view.reset_form(form) {
                    tracing::warn!("Failed to reset form '{}': {}", form, e);
                }
                Outcome::Delivered {
                    status: response.status(),
                    message,
                }
            }
        }
    }

    fn render_list(&mut self, form: FormId, region: ListRegion, response: &ApiResponse) -> Outcome {
        if !(200..300).contains(&response.status()) {
            let error = DispatchError::FetchStatus {
                form,
                status: response.status(),
                message: response.message(),
            };
            tracing::error!("{}", error);
            return Outcome::Failed(error);
        }

        let rendered = match form {
            FormId::ShowPost | FormId::ShowComment => {
                listing::render_entity(region, response.body()).map(|line| vec![line])
            }
            _ => listing::render_lines(region, response.body()),
        };
        let lines = match rendered {
            Ok(lines) => lines,
            Err(source) => {
                let error = DispatchError::UnexpectedShape { form, source };
                tracing::error!("{}", error);
                return Outcome::Failed(error);
            }
        };

        if let Err(e) = self.view.clear_list(region) {
            tracing::warn!("Failed to clear {} list: {}", region, e);
        }
        for line in &lines {
            if let Err(e) = self.view.append_list_item(region, line) {
                tracing::warn!("Failed to render {} entry: {}", region, e);
            }
        }
        tracing::info!("Rendered {} {} entries", lines.len(), region);

        Outcome::Listed {
            region,
            count: lines.len(),
        }
    }

    fn show_alert(&mut self, message: &str) {
        if let Err(e) = self.view.alert(message) {
            tracing::warn!("Failed to show alert: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;
    use crate::dispatch::view::{MockFormView, ViewCommand};
    use serde_json::json;

    // Nothing listens on port 9; any request that slips through fails fast.
    fn offline_dispatcher() -> (Dispatcher<MockFormView>, MockFormView) {
        let profile = Profile::blank("test").with_server("http://127.0.0.1:9");
        let client = ApiClient::new(&profile).unwrap();
        let view = MockFormView::new();
        (
            Dispatcher::new(client, ApiDialect::Legacy, view.clone()),
            view,
        )
    }

    #[tokio::test]
    async fn rejected_registration_should_alert_without_reset() {
        let (mut dispatcher, view) = offline_dispatcher();

        let outcome = dispatcher
            .register("kashish", "not-an-email", "Abc12345!")
            .await;

        assert!(matches!(
            outcome,
            Outcome::Rejected(ValidationError::InvalidEmail)
        ));
        assert_eq!(
            view.get_commands(),
            vec![ViewCommand::Alert("Invalid email address.".to_string())]
        );
    }

    #[tokio::test]
    async fn transport_failure_should_leave_view_untouched() {
        let (mut dispatcher, view) = offline_dispatcher();

        let outcome = dispatcher.create_post("Title", "Body").await;

        assert!(matches!(outcome, Outcome::Failed(DispatchError::Transport(_))));
        assert!(view.get_commands().is_empty());
    }

    #[tokio::test]
    async fn missing_handler_should_fail_without_alert() {
        let profile = Profile::blank("test").with_server("http://127.0.0.1:9");
        let view = MockFormView::new();
        let mut dispatcher = Dispatcher::with_registry(
            ApiClient::new(&profile).unwrap(),
            HandlerRegistry::empty(),
            ApiDialect::Legacy,
            view.clone(),
        );

        let outcome = dispatcher.list_posts().await;

        assert!(matches!(
            outcome,
            Outcome::Failed(DispatchError::NoHandler(FormId::ListPosts))
        ));
        assert!(view.get_commands().is_empty());
    }

    #[test]
    fn delivered_answer_should_alert_then_reset() {
        let (mut dispatcher, view) = offline_dispatcher();

        let outcome = dispatcher.apply(
            FormId::Register,
            Ok(ApiResponse::new(400, json!({"message": "Username already taken"}))),
        );

        assert!(outcome.is_success());
        assert_eq!(
            view.get_commands(),
            vec![
                ViewCommand::Alert("Username already taken".to_string()),
                ViewCommand::ResetForm(FormId::Register),
            ]
        );
    }

    #[test]
    fn list_answer_should_clear_before_appending() {
        let (mut dispatcher, view) = offline_dispatcher();

        let outcome = dispatcher.apply(
            FormId::ListComments,
            Ok(ApiResponse::new(
                200,
                json!([{
                    "_id": "c1",
                    "commenter_name": "Alice",
                    "comment_text": "Hi",
                    "blog_post_id": "p1",
                }]),
            )),
        );

        assert!(matches!(
            outcome,
            Outcome::Listed {
                region: ListRegion::Comments,
                count: 1
            }
        ));
        assert_eq!(
            view.get_commands(),
            vec![
                ViewCommand::ClearList(ListRegion::Comments),
                ViewCommand::AppendListItem(
                    ListRegion::Comments,
                    "ID: c1, Name: Alice, Text: Hi, Post ID: p1".to_string()
                ),
            ]
        );
    }

    #[test]
    fn malformed_list_should_keep_previous_entries() {
        let (mut dispatcher, view) = offline_dispatcher();
        dispatcher
            .view_mut()
            .append_list_item(ListRegion::Posts, "ID: old, Title: t, Content: c")
            .unwrap();

        let outcome = dispatcher.apply(FormId::ListPosts, Ok(ApiResponse::new(200, json!([1, 2]))));

        assert!(matches!(
            outcome,
            Outcome::Failed(DispatchError::UnexpectedShape { .. })
        ));
        assert_eq!(view.list_items(ListRegion::Posts).len(), 1);
    }

    #[test]
    fn failed_fetch_status_should_keep_previous_entries() {
        let (mut dispatcher, view) = offline_dispatcher();
        dispatcher
            .view_mut()
            .append_list_item(ListRegion::Posts, "ID: old, Title: t, Content: c")
            .unwrap();
        view.clear_commands();

        let outcome = dispatcher.apply(
            FormId::ShowPost,
            Ok(ApiResponse::new(404, json!({"error": "Blog post not found"}))),
        );

        assert!(!outcome.is_success());
        match outcome {
            Outcome::Failed(DispatchError::FetchStatus {
                form,
                status,
                message,
            }) => {
                assert_eq!(form, FormId::ShowPost);
                assert_eq!(status, 404);
                assert_eq!(message, "Blog post not found");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(dispatcher.view().get_commands().is_empty());
        assert_eq!(
            dispatcher.view().list_items(ListRegion::Posts),
            vec!["ID: old, Title: t, Content: c"]
        );
    }

    #[test]
    fn show_answer_should_render_exactly_one_entity() {
        let (mut dispatcher, view) = offline_dispatcher();
        assert_eq!(dispatcher.dialect(), ApiDialect::Legacy);

        let outcome = dispatcher.apply(
            FormId::ShowComment,
            Ok(ApiResponse::new(
                200,
                json!({
                    "_id": "c9",
                    "commenter_name": "Bo",
                    "comment_text": "Yo",
                    "blog_post_id": "p1",
                }),
            )),
        );

        assert!(matches!(
            outcome,
            Outcome::Listed {
                region: ListRegion::Comments,
                count: 1
            }
        ));
        assert_eq!(
            view.list_items(ListRegion::Comments),
            vec!["ID: c9, Name: Bo, Text: Yo, Post ID: p1"]
        );
    }

    #[tokio::test]
    async fn next_outcome_should_return_none_when_idle() {
        let (mut dispatcher, _view) = offline_dispatcher();
        assert_eq!(dispatcher.in_flight(), 0);
        assert!(dispatcher.next_outcome().await.is_none());
        assert!(dispatcher.poll_outcome().is_none());
    }

    #[tokio::test]
    async fn async_rejection_should_resolve_immediately() {
        let (mut dispatcher, view) = offline_dispatcher();

        let submission = dispatcher.execute_async(FormId::CreateComment, &FormFields::new());

        assert!(matches!(
            submission,
            Submission::Resolved(Outcome::Rejected(ValidationError::MissingCommentFields))
        ));
        assert_eq!(dispatcher.in_flight(), 0);
        assert_eq!(
            view.alerts(),
            vec!["Commenter name and comment text are required fields"]
        );
    }
}
