//! # Mock View for Testing
//!
//! Records every view operation so tests can assert exactly what the user
//! would have seen.

use super::{FormView, ListRegion};
use crate::dispatch::forms::FormId;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded view operation for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    Alert(String),
    ResetForm(FormId),
    ClearList(ListRegion),
    AppendListItem(ListRegion, String),
}

/// Type alias for command history
type CommandHistory = Arc<Mutex<Vec<ViewCommand>>>;

/// Mock view that records commands and mirrors list contents
///
/// Clones share the same history, so a test can keep one handle while the
/// dispatcher owns the other.
#[derive(Clone, Default)]
pub struct MockFormView {
    commands: CommandHistory,
    lists: Arc<Mutex<HashMap<ListRegion, Vec<String>>>>,
}

impl MockFormView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get recorded commands for verification
    pub fn get_commands(&self) -> Vec<ViewCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// Clear recorded commands
    pub fn clear_commands(&self) {
        self.commands.lock().unwrap().clear();
    }

    /// Messages passed to `alert`, in order
    pub fn alerts(&self) -> Vec<String> {
        self.get_commands()
            .into_iter()
            .filter_map(|command| match command {
                ViewCommand::Alert(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Lines currently shown in a region
    pub fn list_items(&self, region: ListRegion) -> Vec<String> {
        self.lists
            .lock()
            .unwrap()
            .get(&region)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, command: ViewCommand) {
        self.commands.lock().unwrap().push(command);
    }
}

impl FormView for MockFormView {
    fn alert(&mut self, message: &str) -> Result<()> {
        self.record(ViewCommand::Alert(message.to_string()));
        Ok(())
    }

    fn reset_form(&mut self, form: FormId) -> Result<()> {
        self.record(ViewCommand::ResetForm(form));
        Ok(())
    }

    fn clear_list(&mut self, region: ListRegion) -> Result<()> {
        self.lists.lock().unwrap().remove(&region);
        self.record(ViewCommand::ClearList(region));
        Ok(())
    }

    fn append_list_item(&mut self, region: ListRegion, line: &str) -> Result<()> {
        self.lists
            .lock()
            .unwrap()
            .entry(region)
            .or_default()
            .push(line.to_string());
        self.record(ViewCommand::AppendListItem(region, line.to_string()));
        Ok(())
    }
}
