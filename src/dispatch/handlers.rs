//! # Form Handlers
//!
//! One handler per form identity. A handler lifts the submitted fields into
//! a typed input, validates it, and prepares the request to send. It never
//! talks to the network or the view; the dispatcher does both.
//!
//! The [`HandlerRegistry`] is the explicit form → handler mapping that
//! replaces per-element event binding.

use std::collections::HashMap;
use std::sync::Arc;

use super::forms::{
    field, BlogPostInput, CommentInput, Credentials, FormFields, FormId, LoginCredentials,
};
use super::routes::{self, ApiDialect, ApiRequest};
use super::validation::{self, ValidationError};

/// Turns a form submission into a request, or rejects it locally
pub trait FormHandler: Send + Sync {
    /// Form identity this handler serves
    fn form(&self) -> FormId;

    /// Validate the fields and build the request
    fn prepare(
        &self,
        fields: &FormFields,
        dialect: ApiDialect,
    ) -> Result<ApiRequest, ValidationError>;

    /// Handler name for debugging and logging
    fn name(&self) -> &'static str;
}

type HandlerArc = Arc<dyn FormHandler>;

pub struct RegisterHandler;

impl FormHandler for RegisterHandler {
    fn form(&self) -> FormId {
        FormId::Register
    }

    fn prepare(
        &self,
        fields: &FormFields,
        _dialect: ApiDialect,
    ) -> Result<ApiRequest, ValidationError> {
        let credentials = Credentials::from_fields(fields);
        validation::validate_registration(&credentials)?;
        Ok(routes::register(&credentials))
    }

    fn name(&self) -> &'static str {
        "RegisterHandler"
    }
}

pub struct LoginHandler;

impl FormHandler for LoginHandler {
    fn form(&self) -> FormId {
        FormId::Login
    }

    fn prepare(
        &self,
        fields: &FormFields,
        dialect: ApiDialect,
    ) -> Result<ApiRequest, ValidationError> {
        let credentials = LoginCredentials::from_fields(fields);
        validation::validate_login(&credentials)?;
        Ok(routes::login(&credentials, dialect))
    }

    fn name(&self) -> &'static str {
        "LoginHandler"
    }
}

pub struct CreatePostHandler;

impl FormHandler for CreatePostHandler {
    fn form(&self) -> FormId {
        FormId::CreatePost
    }

    fn prepare(
        &self,
        fields: &FormFields,
        _dialect: ApiDialect,
    ) -> Result<ApiRequest, ValidationError> {
        let input = BlogPostInput::from_fields(fields);
        validation::validate_post(&input)?;
        Ok(routes::create_post(&input))
    }

    fn name(&self) -> &'static str {
        "CreatePostHandler"
    }
}

pub struct UpdatePostHandler;

impl FormHandler for UpdatePostHandler {
    fn form(&self) -> FormId {
        FormId::UpdatePost
    }

    fn prepare(
        &self,
        fields: &FormFields,
        _dialect: ApiDialect,
    ) -> Result<ApiRequest, ValidationError> {
        let input = BlogPostInput::from_fields(fields);
        validation::validate_post(&input)?;
        let post_id = input.post_id.as_deref().unwrap_or_default();
        Ok(routes::update_post(&input, post_id))
    }

    fn name(&self) -> &'static str {
        "UpdatePostHandler"
    }
}

pub struct DeletePostHandler;

impl FormHandler for DeletePostHandler {
    fn form(&self) -> FormId {
        FormId::DeletePost
    }

    fn prepare(
        &self,
        fields: &FormFields,
        dialect: ApiDialect,
    ) -> Result<ApiRequest, ValidationError> {
        Ok(routes::delete_post(fields.get(field::POST_ID), dialect))
    }

    fn name(&self) -> &'static str {
        "DeletePostHandler"
    }
}

pub struct CreateCommentHandler;

impl FormHandler for CreateCommentHandler {
    fn form(&self) -> FormId {
        FormId::CreateComment
    }

    fn prepare(
        &self,
        fields: &FormFields,
        dialect: ApiDialect,
    ) -> Result<ApiRequest, ValidationError> {
        let input = CommentInput::from_fields(fields);
        validation::validate_comment(&input)?;
        Ok(routes::create_comment(&input, dialect))
    }

    fn name(&self) -> &'static str {
        "CreateCommentHandler"
    }
}

pub struct UpdateCommentHandler;

impl FormHandler for UpdateCommentHandler {
    fn form(&self) -> FormId {
        FormId::UpdateComment
    }

    fn prepare(
        &self,
        fields: &FormFields,
        _dialect: ApiDialect,
    ) -> Result<ApiRequest, ValidationError> {
        let input = CommentInput::from_fields(fields);
        validation::validate_comment(&input)?;
        let comment_id = input.comment_id.as_deref().unwrap_or_default();
        Ok(routes::update_comment(&input, comment_id))
    }

    fn name(&self) -> &'static str {
        "UpdateCommentHandler"
    }
}

pub struct DeleteCommentHandler;

impl FormHandler for DeleteCommentHandler {
    fn form(&self) -> FormId {
        FormId::DeleteComment
    }

    fn prepare(
        &self,
        fields: &FormFields,
        _dialect: ApiDialect,
    ) -> Result<ApiRequest, ValidationError> {
        Ok(routes::delete_comment(fields.get(field::COMMENT_ID)))
    }

    fn name(&self) -> &'static str {
        "DeleteCommentHandler"
    }
}

/// Fetch actions take no validated input
pub struct FetchHandler {
    form: FormId,
}

impl FetchHandler {
    pub fn new(form: FormId) -> Self {
        Self { form }
    }
}

impl FormHandler for FetchHandler {
    fn form(&self) -> FormId {
        self.form
    }

    fn prepare(
        &self,
        fields: &FormFields,
        _dialect: ApiDialect,
    ) -> Result<ApiRequest, ValidationError> {
        let request = match self.form {
            FormId::ShowPost => routes::show_post(fields.get(field::POST_ID)),
            FormId::ShowComment => routes::show_comment(fields.get(field::COMMENT_ID)),
            FormId::ListComments => routes::list_comments(),
            _ => routes::list_posts(),
        };
        Ok(request)
    }

    fn name(&self) -> &'static str {
        "FetchHandler"
    }
}

/// Maps each form identity to the handler that serves it
pub struct HandlerRegistry {
    handlers: HashMap<FormId, HandlerArc>,
}

impl HandlerRegistry {
    /// Create a registry with the default handler for every form
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_default_handlers();
        registry
    }

    /// Create a registry with no handlers
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    fn register_default_handlers(&mut self) {
        self.add_handler(Arc::new(RegisterHandler));
        self.add_handler(Arc::new(LoginHandler));
        self.add_handler(Arc::new(CreatePostHandler));
        self.add_handler(Arc::new(UpdatePostHandler));
        self.add_handler(Arc::new(DeletePostHandler));
        self.add_handler(Arc::new(CreateCommentHandler));
        self.add_handler(Arc::new(UpdateCommentHandler));
        self.add_handler(Arc::new(DeleteCommentHandler));
        for form in [
            FormId::ListPosts,
            FormId::ListComments,
            FormId::ShowPost,
            FormId::ShowComment,
        ] {
            self.add_handler(Arc::new(FetchHandler::new(form)));
        }
    }

    /// Add a handler, replacing any previous one for the same form
    pub fn add_handler(&mut self, handler: HandlerArc) {
        if let Some(previous) = self.handlers.insert(handler.form(), Arc::clone(&handler)) {
            tracing::debug!(
                "Replaced {} with {} for form '{}'",
                previous.name(),
                handler.name(),
                handler.form()
            );
        }
    }

    pub fn get(&self, form: FormId) -> Option<HandlerArc> {
        self.handlers.get(&form).map(Arc::clone)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
