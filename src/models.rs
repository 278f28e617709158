//! Domain Models
//!
//! Business entities that represent the core domain.
//! These are independent of the database layer.

use serde::Deserialize;

use crate::database::{MovieRow, UserRow};

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Movie {
    pub id: i64,
    pub name: String,
    pub director: Option<String>,
    pub year: Option<i64>,
    pub poster_url: Option<String>,
    pub user_id: i64,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            director: row.director,
            year: row.year,
            poster_url: row.poster_url,
            user_id: row.user_id,
        }
    }
}

// Form DTOs posted by the HTML views. Fields are optional so a POST
// missing one is treated like an empty submission instead of a 422.
#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddMovieForm {
    pub movie_title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameMovieForm {
    pub new_title: Option<String>,
}
