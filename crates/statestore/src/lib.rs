//! Typed key/value state store client abstraction.
//!
//! The store holds single-key entries with last-writer-wins semantics;
//! no transactions span multiple keys. Implementations must be
//! thread-safe and surface transport faults distinctly so callers can
//! tell "ask again later" from business-logic failures.

mod error;
mod memory;
mod readiness;
mod store;

pub use error::{Result, StateStoreError};
pub use memory::InMemoryStateStore;
pub use readiness::wait_ready;
pub use store::StateStore;
