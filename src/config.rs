#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub omdb_base_url: String,
    pub omdb_api_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://movie_database.db".to_string(),
            bind_address: "0.0.0.0:5000".to_string(),
            omdb_base_url: "http://www.omdbapi.com/".to_string(),
            omdb_api_key: String::new(),
        }
    }
}

impl Config {
    /// Build a config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            omdb_base_url: std::env::var("OMDB_BASE_URL").unwrap_or(defaults.omdb_base_url),
            omdb_api_key: std::env::var("OMDB_API_KEY").unwrap_or(defaults.omdb_api_key),
        }
    }
}
