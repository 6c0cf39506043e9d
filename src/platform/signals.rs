//! Signal-to-flag wiring for raw-terminal embeddings.
//!
//! Hosts embedded in a full editor receive interrupts and resizes through
//! the editor's own event loop; standalone terminal embeddings wire SIGINT
//! into an [`InterruptToken`] and SIGWINCH into a resize flag here instead.

use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use libc::c_int;
use signal_hook::consts::{SIGINT, SIGWINCH};
use signal_hook::{flag, low_level, SigId};

use super::InterruptToken;

/// A registered signal handler, unregistered on drop.
pub struct SignalBinding {
    id: SigId,
}

impl Drop for SignalBinding {
    fn drop(&mut self) {
        low_level::unregister(self.id);
    }
}

/// Sets `flag` whenever `signal` is delivered.
pub fn bind_flag(signal: c_int, flag: Arc<AtomicBool>) -> io::Result<SignalBinding> {
    let id = flag::register(signal, flag)?;
    Ok(SignalBinding { id })
}

/// Wires SIGINT into the token so a user interrupt cancels the populate loop
/// at its next iteration boundary.
pub fn bind_interrupt(token: &InterruptToken) -> io::Result<SignalBinding> {
    bind_flag(SIGINT, token.flag())
}

/// Wires SIGWINCH into `flag` so the embedding can bump its resize
/// generation when the terminal changes size.
pub fn bind_resize(flag: Arc<AtomicBool>) -> io::Result<SignalBinding> {
    bind_flag(SIGWINCH, flag)
}
