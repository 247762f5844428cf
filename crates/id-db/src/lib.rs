pub mod error;
pub mod user_repository;

pub use error::{DbError, Result};
pub use user_repository::{UserRepository, UserStore};
