//! Type aliases for state shared across threads.
//!
//! Hosts that read the transport on one thread and render on another share
//! tracker state through these aliases. They use `parking_lot` locks, which
//! never poison.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use grbltrack_core::types::*;
//!
//! // Instead of: Arc<Mutex<Session>>
//! let session: ThreadSafe<Session> = thread_safe(Session::new());
//! session.lock().process_line("<Idle|MPos:0.000,0.000,0.000>");
//! ```

use parking_lot::Mutex;
use std::sync::Arc;

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Decode-and-apply must happen under one lock so that lines are applied in
/// arrival order.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// Create a new `ThreadSafe<T>` from a value.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}
