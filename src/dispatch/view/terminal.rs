//! # Terminal View
//!
//! Production [`FormView`] that writes notifications and list lines to a
//! writer, stdout by default.

use super::{FormView, ListRegion};
use crate::dispatch::forms::FormId;
use anyhow::Result;
use std::io::{self, Write};

pub struct TerminalView<W: Write + Send> {
    writer: W,
}

impl TerminalView<io::Stdout> {
    /// Create a terminal view on stdout
    pub fn stdout() -> Self {
        Self {
            writer: io::stdout(),
        }
    }
}

impl<W: Write + Send> TerminalView<W> {
    /// Create a terminal view with a custom writer
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> FormView for TerminalView<W> {
    fn alert(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{message}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn reset_form(&mut self, form: FormId) -> Result<()> {
        // Arguments are consumed per invocation; nothing persists to clear.
        tracing::debug!("Form '{}' reset", form);
        Ok(())
    }

    fn clear_list(&mut self, region: ListRegion) -> Result<()> {
        tracing::debug!("Clearing {} list", region);
        Ok(())
    }

    fn append_list_item(&mut self, _region: ListRegion, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }
}
