//! Book resource module.

mod models;
mod repository;

pub use models::{Book, BookListQuery, BookListResponse, CreateBookRequest, UpdateBookRequest};
pub use repository::BookRepository;
