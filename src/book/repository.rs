//! Book repository for database operations.

use anyhow::{Context, Result, anyhow};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::{Book, BookListQuery, BookListResponse, CreateBookRequest, UpdateBookRequest};

const MAX_PAGE_SIZE: i64 = 100;
const DEFAULT_PAGE_SIZE: i64 = 10;

const BOOK_COLUMNS: &str = "id, title, author, description, price, created_at";

/// Repository for book database operations.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Create a new book repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new book.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create(&self, request: CreateBookRequest) -> Result<Book> {
        debug!("creating book: {}", request.title);

        let result = sqlx::query(
            r#"
            INSERT INTO books (title, author, description, price)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&request.title)
        .bind(&request.author)
        .bind(&request.description)
        .bind(request.price)
        .execute(&self.pool)
        .await
        .context("inserting book")?;

        self.get(result.last_insert_rowid())
            .await?
            .ok_or_else(|| anyhow!("book not found after creation"))
    }

    /// Get a book by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("fetching book")?;

        Ok(book)
    }

    /// List books with optional filters and pagination.
    ///
    /// Returns the total matching count alongside the requested page. The
    /// page size defaults to 10 and is clamped to 100.
    #[instrument(skip(self))]
    pub async fn list(&self, query: BookListQuery) -> Result<BookListResponse> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = query.offset.unwrap_or(0).max(0);

        // Build the WHERE clause once; it is shared by the count and the
        // page query so total always matches the filters.
        let mut where_sql = String::from(" WHERE 1=1");
        let mut patterns: Vec<String> = Vec::new();

        if let Some(title) = &query.title {
            where_sql.push_str(" AND title LIKE ?");
            patterns.push(format!("%{}%", title));
        }

        if let Some(author) = &query.author {
            where_sql.push_str(" AND author LIKE ?");
            patterns.push(format!("%{}%", author));
        }

        let count_sql = format!("SELECT COUNT(*) FROM books{where_sql}");
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        for pattern in &patterns {
            count_query = count_query.bind(pattern);
        }
        let (total,) = count_query
            .fetch_one(&self.pool)
            .await
            .context("counting books")?;

        let page_sql =
            format!("SELECT {BOOK_COLUMNS} FROM books{where_sql} ORDER BY id LIMIT ? OFFSET ?");
        let mut page_query = sqlx::query_as::<_, Book>(&page_sql);
        for pattern in &patterns {
            page_query = page_query.bind(pattern);
        }
        let items = page_query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("listing books")?;

        Ok(BookListResponse { total, items })
    }

    /// Partially update a book. Only fields present in the request are
    /// applied.
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i64, request: UpdateBookRequest) -> Result<Book> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| anyhow!("Book not found: {}", id))?;

        if request.is_empty() {
            return Ok(existing);
        }

        let mut updates = Vec::new();
        if request.title.is_some() {
            updates.push("title = ?");
        }
        if request.author.is_some() {
            updates.push("author = ?");
        }
        if request.description.is_some() {
            updates.push("description = ?");
        }
        if request.price.is_some() {
            updates.push("price = ?");
        }

        let sql = format!("UPDATE books SET {} WHERE id = ?", updates.join(", "));

        // Bind order must mirror the push order above.
        let mut query = sqlx::query(&sql);
        if let Some(title) = &request.title {
            query = query.bind(title);
        }
        if let Some(author) = &request.author {
            query = query.bind(author);
        }
        if let Some(description) = &request.description {
            query = query.bind(description.as_deref());
        }
        if let Some(price) = request.price {
            query = query.bind(price);
        }

        query
            .bind(id)
            .execute(&self.pool)
            .await
            .context("updating book")?;

        self.get(id)
            .await?
            .ok_or_else(|| anyhow!("book not found after update"))
    }

    /// Delete a book.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("deleting book")?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("Book not found: {}", id));
        }

        Ok(())
    }
}
