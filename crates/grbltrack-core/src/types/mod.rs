//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Type alias for `Arc<Mutex<T>>`.

pub mod aliases;

pub use aliases::*;
