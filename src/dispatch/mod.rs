//! # Form Dispatch
//!
//! Maps each form identity to a handler, validates submissions locally,
//! sends one JSON request per submission, and presents the answer through
//! an injected [`FormView`].

pub mod batch;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod listing;
pub mod routes;
pub mod validation;
pub mod view;

// Re-export main types
pub use client::{ApiClient, ApiResponse};
pub use dispatcher::{DispatchMessage, Dispatcher, Outcome, Submission};
pub use error::DispatchError;
pub use forms::{FormFields, FormId};
pub use handlers::{FormHandler, HandlerRegistry};
pub use routes::{ApiDialect, ApiRequest};
pub use validation::ValidationError;
pub use view::{FormView, ListRegion, MockFormView, TerminalView, ViewCommand};
