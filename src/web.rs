//! Web UI Handlers
//!
//! Serves the HTML interface for the movie lists:
//! - `GET /` - Home page with the list of users
//! - `POST /` - Create a user, redirect home
//! - `GET /users/{user_id}/movies` - A user's movie list
//! - `POST /users/{user_id}/movies` - Look up a title and add it
//! - `POST /users/{user_id}/movies/{movie_id}/update` - Rename a movie
//! - `POST /users/{user_id}/movies/{movie_id}/delete` - Delete a movie
//!
//! Recoverable failures (duplicate user name, failed lookup) are logged and
//! swallowed; the request still redirects to the canonical view. Only
//! missing entities surface as a 404 page.

use askama::Template;
use axum::{
    Router,
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};

use crate::{
    config::Config,
    database::{Database, DatabaseError},
    models::{AddMovieForm, CreateUserForm, Movie, RenameMovieForm, User},
    omdb::OmdbClient,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub omdb: OmdbClient,
}

impl AppState {
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db,
            omdb: OmdbClient::new(&config.omdb_base_url, &config.omdb_api_key),
        }
    }
}

// Template rendering helper
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!("Template error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Template error: {}", err),
                )
                    .into_response()
            }
        }
    }
}

// Templates
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    users: Vec<User>,
}

#[derive(Template)]
#[template(path = "user_movies.html")]
struct UserMoviesTemplate {
    user: User,
    movies: Vec<Movie>,
}

#[derive(Template)]
#[template(path = "404.html")]
struct NotFoundTemplate;

fn not_found_page() -> Response {
    match NotFoundTemplate.render() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(err) => {
            tracing::error!("Template error: {}", err);
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}

fn movies_url(user_id: i64) -> String {
    format!("/users/{}/movies", user_id)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Home page - list of users
async fn home(State(state): State<AppState>) -> Response {
    match state.db.list_users().await {
        Ok(rows) => {
            let users = rows.into_iter().map(User::from).collect();
            HtmlTemplate(IndexTemplate { users }).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list users: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to list users: {}", e),
            )
                .into_response()
        }
    }
}

/// Create a new user, then redirect home whatever happened
async fn create_user(
    State(state): State<AppState>,
    Form(form): Form<CreateUserForm>,
) -> Redirect {
    let name = form.user_name.as_deref().unwrap_or("").trim();
    if !name.is_empty() {
        match state.db.create_user(name).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, name = user.name, "User created");
            }
            Err(DatabaseError::DuplicateName(name)) => {
                tracing::warn!(name, "User name already taken, ignoring");
            }
            Err(e) => {
                tracing::error!("Failed to create user: {}", e);
            }
        }
    }

    Redirect::to("/")
}

/// A user's movie list; 404 page when the user id does not exist
async fn user_movies(State(state): State<AppState>, Path(user_id): Path<i64>) -> Response {
    let user = match state.db.get_user(user_id).await {
        Ok(row) => User::from(row),
        Err(DatabaseError::NotFound(_)) => return not_found_page(),
        Err(e) => {
            tracing::error!("Failed to get user {}: {}", user_id, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    match state.db.list_movies(user_id).await {
        Ok(rows) => {
            let movies = rows.into_iter().map(Movie::from).collect();
            HtmlTemplate(UserMoviesTemplate { user, movies }).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list movies for user {}: {}", user_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Look up a title and store the match under the user, then redirect back.
/// A failed lookup adds nothing and is only logged.
async fn add_movie(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Form(form): Form<AddMovieForm>,
) -> Response {
    match state.db.get_user(user_id).await {
        Ok(_) => {}
        Err(DatabaseError::NotFound(_)) => return not_found_page(),
        Err(e) => {
            tracing::error!("Failed to get user {}: {}", user_id, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    }

    let title = form.movie_title.as_deref().unwrap_or("").trim();
    if !title.is_empty() {
        match state.omdb.lookup(title, user_id).await {
            Ok(candidate) => match state.db.add_movie(&candidate).await {
                Ok(movie) => {
                    tracing::info!(movie_id = movie.id, user_id, name = movie.name, "Movie added");
                }
                Err(e) => {
                    tracing::error!("Failed to add movie for user {}: {}", user_id, e);
                }
            },
            Err(e) => {
                tracing::warn!(title, user_id, "Failed to add movie: {}", e);
            }
        }
    }

    Redirect::to(&movies_url(user_id)).into_response()
}

/// Rename a movie, then redirect to the owning user's movie list
async fn update_movie(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(i64, i64)>,
    Form(form): Form<RenameMovieForm>,
) -> Response {
    let new_title = form.new_title.as_deref().unwrap_or("").trim();
    if !new_title.is_empty() {
        match state.db.rename_movie(movie_id, new_title).await {
            Ok(movie) => {
                tracing::info!(movie_id = movie.id, name = movie.name, "Movie renamed");
            }
            Err(DatabaseError::NotFound(_)) => return not_found_page(),
            Err(e) => {
                tracing::error!("Failed to rename movie {}: {}", movie_id, e);
                return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
            }
        }
    }

    Redirect::to(&movies_url(user_id)).into_response()
}

/// Delete a movie, then redirect to the owning user's movie list.
/// Deleting an already-missing movie is a silent no-op.
async fn delete_movie(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(i64, i64)>,
) -> Response {
    match state.db.delete_movie(movie_id).await {
        Ok(true) => {
            tracing::info!(movie_id, user_id, "Movie deleted");
        }
        Ok(false) => {
            tracing::warn!(movie_id, "No movie to delete");
        }
        Err(e) => {
            tracing::error!("Failed to delete movie {}: {}", movie_id, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    }

    Redirect::to(&movies_url(user_id)).into_response()
}

/// Fixed 404 page for any unmatched route
async fn not_found() -> Response {
    not_found_page()
}

/// Build the web UI routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home).post(create_user))
        .route("/users/{user_id}/movies", get(user_movies).post(add_movie))
        .route(
            "/users/{user_id}/movies/{movie_id}/update",
            post(update_movie),
        )
        .route(
            "/users/{user_id}/movies/{movie_id}/delete",
            post(delete_movie),
        )
        .fallback(not_found)
}
