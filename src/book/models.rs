//! Book data models.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Book entity from the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: String,
}

/// Request to create a new book.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub price: f64,
}

/// Request to partially update a book.
///
/// Only fields present in the payload are applied. For the nullable
/// `description`, an explicit `null` clears the value while an omitted field
/// leaves it unchanged; the outer `Option` is the field-present marker.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
}

impl UpdateBookRequest {
    /// True when no field is present in the payload.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.description.is_none()
            && self.price.is_none()
    }
}

/// Book list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookListQuery {
    /// Case-insensitive substring filter on title.
    pub title: Option<String>,
    /// Case-insensitive substring filter on author.
    pub author: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated book list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookListResponse {
    pub total: i64,
    pub items: Vec<Book>,
}

/// Deserialize a field so that "present but null" and "omitted" stay
/// distinguishable. Used with `#[serde(default)]` on the outer `Option`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
