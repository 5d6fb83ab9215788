//! # postline - Blog Platform Client
//!
//! A profile-based command line client for a small blogging backend:
//! user registration and login, blog post CRUD, and comment CRUD.
//!
//! ## Architecture
//!
//! Every operation is one form submission flowing through the dispatcher:
//!
//! ```text
//! ┌─────────────┐  FormFields  ┌──────────────┐  ApiRequest  ┌───────────┐
//! │  cmd_args   │─────────────▶│  Dispatcher  │─────────────▶│ ApiClient │──▶ backend
//! │  / batch    │              │              │◀─────────────│ (reqwest) │
//! └─────────────┘              │ - Handlers   │  ApiResponse └───────────┘
//!                              │ - Validation │
//!                              └──────┬───────┘
//!                                     │ alert / reset / list lines
//!                                     ▼
//!                              ┌──────────────┐
//!                              │   FormView   │  TerminalView | MockFormView
//!                              └──────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod dispatch;

// Re-export main types for easy access
pub use dispatch::*;
