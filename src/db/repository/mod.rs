//! Repository layer: entity-scoped database operations over a
//! `rusqlite::Connection`. Callers own the connection; nothing here holds
//! state or opens its own.

mod document;
mod extraction;
mod user;

pub use document::*;
pub use extraction::*;
pub use user::*;
