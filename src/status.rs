//! Status-line state, keyed by controller category.
//!
//! Fields live in an explicit registry rather than ambient host globals so
//! several controller instances (one per category) can coexist without
//! colliding. The host's own status-line machinery reads the fields for
//! split surfaces; overlay surfaces re-compose the prompt line instead,
//! because floats do not participate in the native status-line layout.

use std::collections::HashMap;

/// Glyph shown while no search is in flight.
pub const IDLE_GLYPH: char = ':';

/// Glyph pair the running pulse alternates between on successive ticks.
pub const RUNNING_GLYPHS: [char; 2] = [':', ' '];

/// The status fields of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFields {
    pub category: String,
    pub mode: String,
    pub cwd: String,
    pub running: char,
    pub total: usize,
    pub results_count: usize,
    /// Reverse-order line number (distance from the newest line, 1-based).
    pub line_number: usize,
}

impl Default for StatusFields {
    fn default() -> Self {
        Self {
            category: "-".to_string(),
            mode: "-".to_string(),
            cwd: "-".to_string(),
            running: IDLE_GLYPH,
            total: 0,
            results_count: 0,
            line_number: 1,
        }
    }
}

impl StatusFields {
    /// Renders the fields as a prompt-line suffix for overlay mode.
    pub fn compose_prompt_line(&self) -> String {
        format!(
            "{} [{}] {}  {}/{}  Total{} {}",
            self.category,
            self.mode,
            self.cwd,
            self.line_number,
            self.results_count,
            self.running,
            self.total
        )
    }
}

/// Keyed registry of status fields, shareable across controller instances.
#[derive(Debug, Default)]
pub struct StatusRegistry {
    fields: HashMap<String, StatusFields>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes the category's fields on first use; later calls keep the
    /// existing values.
    pub fn ensure(&mut self, category: &str) -> &mut StatusFields {
        self.fields.entry(category.to_string()).or_default()
    }

    pub fn fields(&self, category: &str) -> Option<&StatusFields> {
        self.fields.get(category)
    }

    pub fn set_category_label(&mut self, category: &str, label: impl Into<String>) {
        self.ensure(category).category = label.into();
    }

    pub fn set_mode(&mut self, category: &str, mode: impl Into<String>) {
        self.ensure(category).mode = mode.into();
    }

    pub fn set_cwd(&mut self, category: &str, cwd: impl Into<String>) {
        self.ensure(category).cwd = cwd.into();
    }

    pub fn set_running_glyph(&mut self, category: &str, glyph: char) {
        self.ensure(category).running = glyph;
    }

    pub fn set_total(&mut self, category: &str, total: usize) {
        self.ensure(category).total = total;
    }

    pub fn set_results_count(&mut self, category: &str, count: usize) {
        self.ensure(category).results_count = count;
    }

    pub fn set_line_number(&mut self, category: &str, line_number: usize) {
        self.ensure(category).line_number = line_number;
    }
}
