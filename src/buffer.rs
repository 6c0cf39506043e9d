//! Line store backing a display surface.

use std::cell::Cell;

use crate::error::SurfaceError;

/// Ordered sequence of display lines, decoupled from any particular surface
/// so the same buffer can be rebound across invocations.
///
/// The `editable` flag is a write-gate: it is raised immediately before a
/// mutation and dropped again on every exit path, so outside observers always
/// see the buffer as read-only between mutations.
#[derive(Debug)]
pub struct ContentBuffer {
    name: String,
    lines: Vec<String>,
    editable: Cell<bool>,
    valid: bool,
}

impl ContentBuffer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
            editable: Cell::new(false),
            valid: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the buffer holds no content. A single blank line counts as
    /// empty, matching how scratch buffers present an untouched state.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() || (self.lines.len() == 1 && self.lines[0].is_empty())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn editable(&self) -> bool {
        self.editable.get()
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Marks the buffer destroyed. Subsequent mutations fail with
    /// [`SurfaceError::SurfaceGone`].
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn set_lines(&mut self, lines: Vec<String>) -> Result<(), SurfaceError> {
        self.with_edit(|stored| *stored = lines)
    }

    pub fn append_lines(&mut self, lines: Vec<String>) -> Result<(), SurfaceError> {
        self.with_edit(|stored| stored.extend(lines))
    }

    /// Inserts `lines` before the first existing line, preserving their order.
    pub fn insert_top(&mut self, lines: Vec<String>) -> Result<(), SurfaceError> {
        self.with_edit(|stored| {
            stored.splice(0..0, lines);
        })
    }

    pub fn append_line(&mut self, line: String) -> Result<(), SurfaceError> {
        self.with_edit(|stored| stored.push(line))
    }

    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        self.with_edit(Vec::clear)
    }

    fn with_edit<R>(&mut self, f: impl FnOnce(&mut Vec<String>) -> R) -> Result<R, SurfaceError> {
        if !self.valid {
            return Err(SurfaceError::SurfaceGone);
        }

        struct WriteGate<'a>(&'a Cell<bool>);

        impl Drop for WriteGate<'_> {
            fn drop(&mut self) {
                self.0.set(false);
            }
        }

        self.editable.set(true);
        let gate = WriteGate(&self.editable);
        let result = f(&mut self.lines);
        drop(gate);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::ContentBuffer;
    use crate::error::SurfaceError;

    #[test]
    fn write_gate_clears_after_mutation() {
        let mut buffer = ContentBuffer::new("results");
        buffer.set_lines(vec!["a".into(), "b".into()]).unwrap();
        assert!(!buffer.editable());
        assert_eq!(buffer.lines(), ["a", "b"]);
    }

    #[test]
    fn write_gate_clears_when_mutation_panics() {
        let mut buffer = ContentBuffer::new("results");
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = buffer.with_edit(|_| panic!("boom"));
        }));
        assert!(result.is_err());
        assert!(!buffer.editable());
    }

    #[test]
    fn invalidated_buffer_rejects_writes() {
        let mut buffer = ContentBuffer::new("results");
        buffer.invalidate();
        assert_eq!(
            buffer.set_lines(vec!["a".into()]),
            Err(SurfaceError::SurfaceGone)
        );
    }

    #[test]
    fn single_blank_line_is_empty() {
        let mut buffer = ContentBuffer::new("results");
        assert!(buffer.is_empty());
        buffer.set_lines(vec![String::new()]).unwrap();
        assert!(buffer.is_empty());
        buffer.set_lines(vec!["x".into()]).unwrap();
        assert!(!buffer.is_empty());
    }

    #[test]
    fn insert_top_preserves_order() {
        let mut buffer = ContentBuffer::new("results");
        buffer.set_lines(vec!["c".into()]).unwrap();
        buffer.insert_top(vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(buffer.lines(), ["a", "b", "c"]);
    }
}
