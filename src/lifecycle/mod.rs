//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Settings → First config load (fatal on error) → Watcher → HTTP server
//!
//! Shutdown (shutdown.rs):
//!     Signal received (signals.rs) → broadcast → watcher and server stop
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::{join_task, Shutdown};
pub use signals::wait_for_signal;
