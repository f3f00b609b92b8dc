use std::env;

use crate::services::evaluator::GradingBands;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub grading_bands: GradingBands,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "quizfy-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            grading_bands: env::var("GRADING_BANDS")
                .ok()
                .and_then(|spec| match GradingBands::from_spec(&spec) {
                    Ok(bands) => Some(bands),
                    Err(err) => {
                        log::warn!("Ignoring invalid GRADING_BANDS: {}", err);
                        None
                    }
                })
                .unwrap_or_default(),
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizfy-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            grading_bands: GradingBands::default(),
        }
    }
}
