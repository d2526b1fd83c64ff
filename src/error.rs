use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while converting a single LabelMe shape
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("rectangle needs 2 points, got {0}")]
    RectanglePoints(usize),

    #[error("polygon needs at least 3 points, got {0}")]
    PolygonPoints(usize),

    #[error("polygon does not cover any pixel of the {width}x{height} image")]
    EmptyMask { width: u32, height: u32 },
}

/// Errors that abort a conversion run
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("the json folder does not exist: {}", .0.display())]
    MissingJsonDir(PathBuf),

    #[error("the image folder does not exist: {}", .0.display())]
    MissingImageDir(PathBuf),

    #[error("proportion must be between 0.0 and 1.0, got {name}={value}")]
    ProportionOutOfRange { name: &'static str, value: f64 },

    #[error("the sum of train, val and test proportions must be 1, got {0}")]
    ProportionSum(f64),

    #[error("no annotation file {} for image {}", json.display(), image.display())]
    MissingAnnotation { image: PathBuf, json: PathBuf },

    #[error("failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid shape '{label}' in '{}': {source}", path.display())]
    InvalidShape {
        path: PathBuf,
        label: String,
        #[source]
        source: ShapeError,
    },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
