//! Data model for the user/group directory.
//! - `User`: the fixed four-field user record and its structural validator.
//! - `group`: group membership helpers.
//! - `Document`: the aggregate persisted as a single JSON file.

pub mod errors;
pub mod user;
pub mod group;
pub mod document;

pub use document::Document;
pub use errors::ModelError;
pub use user::User;
