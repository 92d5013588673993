//! Service layer for the user/group directory.
//! - `users` / `groups`: validation and mutation rules over an in-memory `Document`.
//! - `storage`: where the document lives between requests.
//! - `directory`: runs each request as one load → mutate → persist unit.

pub mod errors;
pub mod users;
pub mod groups;
pub mod storage;
pub mod directory;
#[cfg(test)]
mod test_support;

pub use directory::Directory;
pub use errors::ServiceError;
