use crate::forecast::error::ForecastError;
use crate::normals::error::NormalsError;
use crate::stations::error::StationIndexError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrostcastError {
    #[error(transparent)]
    StationIndex(#[from] StationIndexError),

    #[error(transparent)]
    Normals(#[from] NormalsError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}
