use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationIndexError {
    #[error("Failed to parse station dataset")]
    DatasetParse(#[from] serde_json::Error),

    #[error("Station dataset contains no records")]
    EmptyDataset,
}
