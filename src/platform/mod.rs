//! Platform integrations: cooperative cancellation and signal wiring.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(unix)]
pub mod signals;

#[cfg(unix)]
pub use signals::{bind_interrupt, bind_resize, SignalBinding};

/// Cooperative cancellation token checked once per iteration of a
/// line-consumption loop.
///
/// Cloning shares the underlying flag, so one copy can live in an input
/// handler (or a signal handler, see [`signals`]) while another is polled by
/// the consumer.
#[derive(Clone, Default)]
pub struct InterruptToken {
    interrupted: Arc<AtomicBool>,
}

impl InterruptToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    pub fn trigger(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }

    /// Clears the flag so the token can be reused for the next run.
    pub fn reset(&self) {
        self.interrupted.store(false, Ordering::SeqCst);
    }

    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::InterruptToken;

    #[test]
    fn clones_share_the_flag() {
        let token = InterruptToken::new();
        let observer = token.clone();
        assert!(!observer.interrupted());
        token.trigger();
        assert!(observer.interrupted());
        observer.reset();
        assert!(!token.interrupted());
    }
}
