//! Identity management module.
//!
//! The credential store ([`UserRepository`]) and the identity service built
//! on top of it.

mod models;
mod repository;
mod service;

pub use models::{User, UserInfo};
pub use repository::UserRepository;
pub use service::UserService;
