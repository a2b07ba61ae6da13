//! Domain model types shared by the storage, service, and API layers.

pub mod document;
pub mod user;

pub use document::*;
pub use user::*;
