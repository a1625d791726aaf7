#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Short-term tutoring memory: a rolling buffer and the per-session store built on it.

/// Per-session store keyed by session id.
pub mod sessions;
/// Rolling FIFO buffer.
pub mod short_term;

pub use sessions::{SessionStore, DEFAULT_MEMORY_SIZE};
pub use short_term::ShortTermMemory;
