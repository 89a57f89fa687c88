use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub output: OutputConfig,
    /// Prefix for the per-category table names, e.g. `extracted_urls`.
    pub table_prefix: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig {
                url: env::var("DOCSIFT_DATABASE_URL").unwrap_or_else(|_| "docsift.db".to_string()),
            },
            output: OutputConfig {
                dir: env::var("DOCSIFT_OUTPUT_DIR").unwrap_or_else(|_| "out".to_string()),
            },
            table_prefix: env::var("DOCSIFT_TABLE_PREFIX")
                .unwrap_or_else(|_| "extracted".to_string()),
        }
    }
}
