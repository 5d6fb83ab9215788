//! # View Abstraction Layer
//!
//! The dispatcher never touches a concrete output device. Everything the
//! user sees goes through [`FormView`], so the same dispatch logic drives
//! the terminal in production and a recording mock in tests.
//!
//! ```text
//! Production:  Dispatcher ──▶ TerminalView  ──▶ stdout
//! Testing:     Dispatcher ──▶ MockFormView  ──▶ Vec<ViewCommand>
//! ```

use anyhow::Result;
use std::fmt;

use super::forms::FormId;

pub mod mock;
pub mod terminal;

pub use mock::{MockFormView, ViewCommand};
pub use terminal::TerminalView;

/// Display region that receives fetched entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListRegion {
    Posts,
    Comments,
}

impl fmt::Display for ListRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListRegion::Posts => f.write_str("posts"),
            ListRegion::Comments => f.write_str("comments"),
        }
    }
}

/// Output surface for form outcomes
pub trait FormView: Send {
    /// Show a single blocking notification
    fn alert(&mut self, message: &str) -> Result<()>;

    /// Clear the fields of a submitted form
    fn reset_form(&mut self, form: FormId) -> Result<()>;

    /// Remove every entry currently shown in a region
    fn clear_list(&mut self, region: ListRegion) -> Result<()>;

    /// Append one line of text to a region
    fn append_list_item(&mut self, region: ListRegion, line: &str) -> Result<()>;
}

impl<V: FormView + ?Sized> FormView for Box<V> {
    fn alert(&mut self, message: &str) -> Result<()> {
        (**self).alert(message)
    }

    fn reset_form(&mut self, form: FormId) -> Result<()> {
        (**self).reset_form(form)
    }

    fn clear_list(&mut self, region: ListRegion) -> Result<()> {
        (**self).clear_list(region)
    }

    fn append_list_item(&mut self, region: ListRegion, line: &str) -> Result<()> {
        (**self).append_list_item(region, line)
    }
}
