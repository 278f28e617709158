//! Database Infrastructure Layer
//!
//! Handles database connection, schema initialization, and provides
//! data access methods for users and movies.

use std::str::FromStr;

use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use tracing::info;

#[derive(Debug)]
pub enum DatabaseError {
    Connection(sqlx::Error),
    Query(sqlx::Error),
    DuplicateName(String),
    NotFound(String),
}

impl std::fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseError::Connection(err) => write!(f, "Database connection error: {}", err),
            DatabaseError::Query(err) => write!(f, "Database query error: {}", err),
            DatabaseError::DuplicateName(name) => write!(f, "Name '{}' already taken", name),
            DatabaseError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for DatabaseError {}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        DatabaseError::Query(err)
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Database row for the users table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
}

/// Database row for the movies table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovieRow {
    pub id: i64,
    pub name: String,
    pub director: Option<String>,
    pub year: Option<i64>,
    pub poster_url: Option<String>,
    pub user_id: i64,
}

/// Unpersisted movie candidate, as produced by the metadata lookup.
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub name: String,
    pub director: Option<String>,
    pub year: i64,
    pub poster_url: Option<String>,
    pub user_id: i64,
}

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let database_config = SqliteConnectOptions::from_str(database_url)
            .map_err(DatabaseError::Connection)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_lazy_with(database_config);

        let db = Self { pool };
        db.initialize_tables().await?;

        info!("Database initialized at {}", database_url);
        Ok(db)
    }

    /// In-memory database for tests. A single pooled connection keeps the
    /// whole pool on one `:memory:` database.
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Result<Self> {
        use sqlx::sqlite::SqlitePoolOptions;

        let database_config = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(DatabaseError::Connection)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_lazy_with(database_config);

        let db = Self { pool };
        db.initialize_tables().await?;
        Ok(db)
    }

    async fn initialize_tables(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                director TEXT,
                year INTEGER,
                poster_url TEXT,
                user_id INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_movies_user_id ON movies(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ========== User Operations ==========

    pub async fn create_user(&self, name: &str) -> Result<UserRow> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name)
            VALUES (?)
            "#,
        )
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DatabaseError::DuplicateName(name.to_string())
            }
            _ => DatabaseError::Query(e),
        })?;

        Ok(UserRow {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub async fn get_user(&self, id: i64) -> Result<UserRow> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                DatabaseError::NotFound(format!("User with id {} not found", id))
            }
            e => DatabaseError::Query(e),
        })
    }

    pub async fn list_users(&self) -> Result<Vec<UserRow>> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    // ========== Movie Operations ==========

    pub async fn add_movie(&self, movie: &NewMovie) -> Result<MovieRow> {
        let result = sqlx::query(
            r#"
            INSERT INTO movies (name, director, year, poster_url, user_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&movie.name)
        .bind(&movie.director)
        .bind(movie.year)
        .bind(&movie.poster_url)
        .bind(movie.user_id)
        .execute(&self.pool)
        .await?;

        self.get_movie(result.last_insert_rowid()).await
    }

    pub async fn get_movie(&self, id: i64) -> Result<MovieRow> {
        sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, name, director, year, poster_url, user_id
            FROM movies
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                DatabaseError::NotFound(format!("Movie with id {} not found", id))
            }
            e => DatabaseError::Query(e),
        })
    }

    pub async fn list_movies(&self, user_id: i64) -> Result<Vec<MovieRow>> {
        sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, name, director, year, poster_url, user_id
            FROM movies
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    pub async fn rename_movie(&self, id: i64, new_name: &str) -> Result<MovieRow> {
        let result = sqlx::query(
            r#"
            UPDATE movies
            SET name = ?
            WHERE id = ?
            "#,
        )
        .bind(new_name)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Movie with id {} not found",
                id
            )));
        }

        self.get_movie(id).await
    }

    /// Returns true if a movie was deleted, false if none existed with that
    /// id. Absence is not an error.
    pub async fn delete_movie(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM movies
            WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inception(user_id: i64) -> NewMovie {
        NewMovie {
            name: "Inception".to_string(),
            director: Some("Christopher Nolan".to_string()),
            year: 2010,
            poster_url: Some("https://example.com/inception.jpg".to_string()),
            user_id,
        }
    }

    #[tokio::test]
    async fn create_user_rejects_duplicate_name() {
        let db = Database::in_memory().await.unwrap();

        db.create_user("Alice").await.unwrap();
        db.create_user("Bob").await.unwrap();

        let err = db.create_user("Alice").await.unwrap_err();
        assert!(matches!(err, DatabaseError::DuplicateName(name) if name == "Alice"));

        let users = db.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn list_movies_only_returns_owned_movies() {
        let db = Database::in_memory().await.unwrap();
        let alice = db.create_user("Alice").await.unwrap();
        let bob = db.create_user("Bob").await.unwrap();

        db.add_movie(&inception(alice.id)).await.unwrap();
        db.add_movie(&NewMovie {
            name: "Heat".to_string(),
            director: Some("Michael Mann".to_string()),
            year: 1995,
            poster_url: None,
            user_id: bob.id,
        })
        .await
        .unwrap();

        let movies = db.list_movies(alice.id).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].name, "Inception");
        assert!(movies.iter().all(|m| m.user_id == alice.id));
    }

    #[tokio::test]
    async fn rename_movie_changes_only_the_name() {
        let db = Database::in_memory().await.unwrap();
        let alice = db.create_user("Alice").await.unwrap();
        let movie = db.add_movie(&inception(alice.id)).await.unwrap();

        let renamed = db.rename_movie(movie.id, "Inception (2010)").await.unwrap();
        assert_eq!(renamed.name, "Inception (2010)");
        assert_eq!(renamed.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(renamed.year, Some(2010));
        assert_eq!(renamed.user_id, alice.id);

        let read_back = db.get_movie(movie.id).await.unwrap();
        assert_eq!(read_back.name, "Inception (2010)");
    }

    #[tokio::test]
    async fn rename_missing_movie_is_not_found() {
        let db = Database::in_memory().await.unwrap();

        let err = db.rename_movie(42, "Nothing").await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_movie_twice_returns_false_the_second_time() {
        let db = Database::in_memory().await.unwrap();
        let alice = db.create_user("Alice").await.unwrap();
        let movie = db.add_movie(&inception(alice.id)).await.unwrap();

        assert!(db.delete_movie(movie.id).await.unwrap());
        assert!(matches!(
            db.get_movie(movie.id).await.unwrap_err(),
            DatabaseError::NotFound(_)
        ));
        assert!(!db.delete_movie(movie.id).await.unwrap());
    }

    #[tokio::test]
    async fn get_user_missing_is_not_found() {
        let db = Database::in_memory().await.unwrap();

        let err = db.get_user(7).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }
}
