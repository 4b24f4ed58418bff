use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to parse forecast response from {url}")]
    JsonParse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
