use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalsError {
    #[error("No NOAA token configured; set one of {tried:?}")]
    MissingToken { tried: &'static [&'static str] },

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to read response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),

    #[error("Failed to parse normals response from {url}")]
    JsonParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
