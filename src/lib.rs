//! LabelMe to COCO dataset converter
//!
//! This library converts a directory of images with one LabelMe JSON file per image
//! into a COCO object-detection dataset split into train, val and test sets.

pub mod coco;
pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod mask;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use coco::{CocoFile, CocoWriter};
pub use config::{Args, ConverterConfig, SplitRatios};
pub use dataset::{process_dataset, LabelVocabulary};
pub use error::{ConvertError, ShapeError};
pub use types::{ImageAnnotation, ProcessingStats, Shape, ShapeKind, Split, SplitData};
