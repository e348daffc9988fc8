//! PostgreSQL entity store
//!
//! References are plain uuid columns without foreign keys; a book's genres
//! are a `uuid[]`. Genre names carry a unique index. Deletes are a single
//! `DELETE ... WHERE NOT EXISTS (dependent)` statement, so a row with
//! committed dependents is never removed.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    FromRow, PgPool,
};
use uuid::Uuid;

use super::{DeleteOutcome, EntityStore, Filter, SortKey, StoreError, StoreResult};
use crate::{
    config::DatabaseConfig,
    models::{Author, Book, BookInstance, Entity, EntityKind, Genre},
};

#[derive(FromRow)]
struct BookInstanceRow {
    id: Uuid,
    book: Uuid,
    imprint: String,
    status: String,
    due_back: Option<NaiveDate>,
}

impl TryFrom<BookInstanceRow> for BookInstance {
    type Error = StoreError;

    fn try_from(row: BookInstanceRow) -> Result<Self, Self::Error> {
        Ok(BookInstance {
            id: row.id,
            book: row.book,
            imprint: row.imprint,
            status: row.status.parse().map_err(StoreError::MalformedRow)?,
            due_back: row.due_back,
        })
    }
}

fn table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Author => "authors",
        EntityKind::Genre => "genres",
        EntityKind::Book => "books",
        EntityKind::BookInstance => "book_instances",
    }
}

fn where_clause(kind: EntityKind, filter: &Filter) -> StoreResult<&'static str> {
    match (kind, filter) {
        (_, Filter::Ids(_)) => Ok("id = ANY($1)"),
        (EntityKind::Book, Filter::Author(_)) => Ok("author = $1"),
        (EntityKind::Book, Filter::Genre(_)) => Ok("$1 = ANY(genre)"),
        (EntityKind::BookInstance, Filter::Book(_)) => Ok("book = $1"),
        (EntityKind::BookInstance, Filter::Status(_)) => Ok("status = $1"),
        (EntityKind::Genre, Filter::Name(_)) => Ok("name = $1"),
        _ => Err(StoreError::UnsupportedFilter {
            kind,
            filter: filter.clone(),
        }),
    }
}

// Byte-wise collation keeps ordering identical to the memory store
fn order_clause(kind: EntityKind, sort: SortKey) -> StoreResult<&'static str> {
    match (kind, sort) {
        (EntityKind::Author, SortKey::FamilyName) => Ok(r#"family_name COLLATE "C""#),
        (EntityKind::Genre, SortKey::Name) => Ok(r#"name COLLATE "C""#),
        (EntityKind::Book, SortKey::Title) => Ok(r#"title COLLATE "C""#),
        _ => Err(StoreError::UnsupportedSort { kind, sort }),
    }
}

fn unreferenced_clause(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Author => " AND NOT EXISTS (SELECT 1 FROM books WHERE author = $1)",
        EntityKind::Genre => " AND NOT EXISTS (SELECT 1 FROM books WHERE $1 = ANY(genre))",
        EntityKind::Book => " AND NOT EXISTS (SELECT 1 FROM book_instances WHERE book = $1)",
        EntityKind::BookInstance => "",
    }
}

macro_rules! bind_filter {
    ($query:ident, $filter:expr) => {
        match $filter {
            Filter::Author(id) | Filter::Genre(id) | Filter::Book(id) => $query.bind(*id),
            Filter::Status(status) => $query.bind(status.as_str()),
            Filter::Name(name) => $query.bind(name.clone()),
            Filter::Ids(ids) => $query.bind(ids.clone()),
        }
    };
}

/// Unique violations become typed errors; everything else stays a database error
fn classify(err: sqlx::Error, entity: &Entity) -> StoreError {
    let unique = matches!(&err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"));
    match entity {
        Entity::Genre(genre) if unique => StoreError::UniqueViolation {
            kind: EntityKind::Genre,
            field: "name",
            value: genre.name.clone(),
        },
        _ if unique => StoreError::DuplicateId(entity.kind(), entity.id()),
        _ => StoreError::Database(err),
    }
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!("Database migrations completed");

        Ok(Self { pool })
    }

    async fn fetch<O>(&self, sql: &str, filter: Option<&Filter>) -> StoreResult<Vec<O>>
    where
        O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let query = sqlx::query_as::<_, O>(sql);
        let query = match filter {
            Some(filter) => bind_filter!(query, filter),
            None => query,
        };
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn delete_returning<O>(&self, sql: &str, id: Uuid) -> StoreResult<Option<O>>
    where
        O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        Ok(sqlx::query_as::<_, O>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn find_by_id(&self, kind: EntityKind, id: Uuid) -> StoreResult<Option<Entity>> {
        let rows = self.find_all(kind, Some(Filter::Ids(vec![id])), None).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_all(
        &self,
        kind: EntityKind,
        filter: Option<Filter>,
        sort: Option<SortKey>,
    ) -> StoreResult<Vec<Entity>> {
        let mut sql = format!("SELECT * FROM {}", table(kind));
        if let Some(ref filter) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(where_clause(kind, filter)?);
        }
        if let Some(sort) = sort {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_clause(kind, sort)?);
        }

        let filter = filter.as_ref();
        let rows = match kind {
            EntityKind::Author => self
                .fetch::<Author>(&sql, filter)
                .await?
                .into_iter()
                .map(Entity::Author)
                .collect(),
            EntityKind::Genre => self
                .fetch::<Genre>(&sql, filter)
                .await?
                .into_iter()
                .map(Entity::Genre)
                .collect(),
            EntityKind::Book => self
                .fetch::<Book>(&sql, filter)
                .await?
                .into_iter()
                .map(Entity::Book)
                .collect(),
            EntityKind::BookInstance => self
                .fetch::<BookInstanceRow>(&sql, filter)
                .await?
                .into_iter()
                .map(|row| BookInstance::try_from(row).map(Entity::BookInstance))
                .collect::<StoreResult<Vec<_>>>()?,
        };
        Ok(rows)
    }

    async fn count(&self, kind: EntityKind, filter: Option<Filter>) -> StoreResult<i64> {
        let mut sql = format!("SELECT COUNT(*) FROM {}", table(kind));
        if let Some(ref filter) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(where_clause(kind, filter)?);
        }

        let query = sqlx::query_scalar::<_, i64>(&sql);
        let query = match filter {
            Some(ref filter) => bind_filter!(query, filter),
            None => query,
        };
        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn insert(&self, entity: Entity) -> StoreResult<Entity> {
        let result = match &entity {
            Entity::Author(a) => {
                sqlx::query(
                    r#"
                    INSERT INTO authors (id, first_name, family_name, date_of_birth, date_of_death)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(a.id)
                .bind(&a.first_name)
                .bind(&a.family_name)
                .bind(a.date_of_birth)
                .bind(a.date_of_death)
                .execute(&self.pool)
                .await
            }
            Entity::Genre(g) => {
                sqlx::query("INSERT INTO genres (id, name) VALUES ($1, $2)")
                    .bind(g.id)
                    .bind(&g.name)
                    .execute(&self.pool)
                    .await
            }
            Entity::Book(b) => {
                sqlx::query(
                    r#"
                    INSERT INTO books (id, title, summary, isbn, author, genre)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(b.id)
                .bind(&b.title)
                .bind(&b.summary)
                .bind(&b.isbn)
                .bind(b.author)
                .bind(&b.genre)
                .execute(&self.pool)
                .await
            }
            Entity::BookInstance(i) => {
                sqlx::query(
                    r#"
                    INSERT INTO book_instances (id, book, imprint, status, due_back)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(i.id)
                .bind(i.book)
                .bind(&i.imprint)
                .bind(i.status.as_str())
                .bind(i.due_back)
                .execute(&self.pool)
                .await
            }
        };

        result.map_err(|e| classify(e, &entity))?;
        Ok(entity)
    }

    async fn replace(&self, id: Uuid, entity: Entity) -> StoreResult<Option<Entity>> {
        if entity.id() != id {
            return Err(StoreError::IdMismatch {
                expected: id,
                found: entity.id(),
            });
        }

        let result = match &entity {
            Entity::Author(a) => {
                sqlx::query(
                    r#"
                    UPDATE authors
                    SET first_name = $2, family_name = $3, date_of_birth = $4, date_of_death = $5
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(&a.first_name)
                .bind(&a.family_name)
                .bind(a.date_of_birth)
                .bind(a.date_of_death)
                .execute(&self.pool)
                .await
            }
            Entity::Genre(g) => {
                sqlx::query("UPDATE genres SET name = $2 WHERE id = $1")
                    .bind(id)
                    .bind(&g.name)
                    .execute(&self.pool)
                    .await
            }
            Entity::Book(b) => {
                sqlx::query(
                    r#"
                    UPDATE books
                    SET title = $2, summary = $3, isbn = $4, author = $5, genre = $6
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(&b.title)
                .bind(&b.summary)
                .bind(&b.isbn)
                .bind(b.author)
                .bind(&b.genre)
                .execute(&self.pool)
                .await
            }
            Entity::BookInstance(i) => {
                sqlx::query(
                    r#"
                    UPDATE book_instances
                    SET book = $2, imprint = $3, status = $4, due_back = $5
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(i.book)
                .bind(&i.imprint)
                .bind(i.status.as_str())
                .bind(i.due_back)
                .execute(&self.pool)
                .await
            }
        };

        let done = result.map_err(|e| classify(e, &entity))?;
        Ok((done.rows_affected() > 0).then_some(entity))
    }

    async fn delete(&self, kind: EntityKind, id: Uuid) -> StoreResult<DeleteOutcome> {
        let sql = format!(
            "DELETE FROM {} WHERE id = $1{} RETURNING *",
            table(kind),
            unreferenced_clause(kind)
        );

        let prior = match kind {
            EntityKind::Author => self.delete_returning::<Author>(&sql, id).await?.map(Entity::Author),
            EntityKind::Genre => self.delete_returning::<Genre>(&sql, id).await?.map(Entity::Genre),
            EntityKind::Book => self.delete_returning::<Book>(&sql, id).await?.map(Entity::Book),
            EntityKind::BookInstance => self
                .delete_returning::<BookInstanceRow>(&sql, id)
                .await?
                .map(BookInstance::try_from)
                .transpose()?
                .map(Entity::BookInstance),
        };

        if let Some(prior) = prior {
            return Ok(DeleteOutcome::Deleted(prior));
        }

        let exists: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)",
            table(kind)
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(if exists {
            DeleteOutcome::Referenced
        } else {
            DeleteOutcome::Missing
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
