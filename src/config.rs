use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ConvertError, Result};

/// Tolerance used when checking that the split proportions add up to one
pub const PROPORTION_TOLERANCE: f64 = 1e-6;

/// Command-line arguments for converting LabelMe JSON to a COCO dataset.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Directory containing one LabelMe JSON file per image
    #[arg(long = "json_input_dir")]
    pub json_input_dir: PathBuf,

    /// Directory containing the images
    #[arg(long = "image_input_dir")]
    pub image_input_dir: PathBuf,

    /// Output dataset directory
    #[arg(long = "output_dir", default_value = "COCODataset")]
    pub output_dir: PathBuf,

    /// Proportion of the dataset to use for training
    #[arg(long = "train_proportion", default_value_t = 1.0, value_parser = validate_size)]
    pub train_proportion: f64,

    /// Proportion of the dataset to use for validation
    #[arg(long = "val_proportion", default_value_t = 0.0, value_parser = validate_size)]
    pub val_proportion: f64,

    /// Proportion of the dataset to use for testing
    #[arg(long = "test_proportion", default_value_t = 0.0, value_parser = validate_size)]
    pub test_proportion: f64,

    /// Shuffle the images with a fixed seed before splitting, instead of the
    /// default sequential split in file name order
    #[arg(long = "shuffle")]
    pub shuffle: bool,

    /// Seed for shuffling, only used with --shuffle
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// Fixed, ordered list of labels; shapes with other labels are skipped
    #[arg(long = "label_list", value_delimiter = ',')]
    pub label_list: Vec<String>,
}

impl Args {
    /// Validate the arguments and build the configuration used by the converter
    pub fn to_converter_config(&self) -> Result<ConverterConfig> {
        if !self.json_input_dir.is_dir() {
            return Err(ConvertError::MissingJsonDir(self.json_input_dir.clone()));
        }
        if !self.image_input_dir.is_dir() {
            return Err(ConvertError::MissingImageDir(self.image_input_dir.clone()));
        }
        let ratios = SplitRatios::new(
            self.train_proportion,
            self.val_proportion,
            self.test_proportion,
        )?;

        Ok(ConverterConfig {
            json_dir: self.json_input_dir.clone(),
            image_dir: self.image_input_dir.clone(),
            output_dir: self.output_dir.clone(),
            ratios,
            shuffle_seed: self.shuffle.then_some(self.seed),
            label_list: self.label_list.clone(),
        })
    }
}

/// Validated converter configuration
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    pub json_dir: PathBuf,
    pub image_dir: PathBuf,
    pub output_dir: PathBuf,
    pub ratios: SplitRatios,
    /// `Some(seed)` shuffles the image list before splitting
    pub shuffle_seed: Option<u64>,
    pub label_list: Vec<String>,
}

/// Train/val/test proportions, each in `[0, 1]` and summing to one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRatios {
    pub train: f64,
    pub val: f64,
    pub test: f64,
}

impl SplitRatios {
    pub fn new(train: f64, val: f64, test: f64) -> Result<Self> {
        for (name, value) in [("train", train), ("val", val), ("test", test)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConvertError::ProportionOutOfRange { name, value });
            }
        }
        let sum = train + val + test;
        if (sum - 1.0).abs() > PROPORTION_TOLERANCE {
            return Err(ConvertError::ProportionSum(sum));
        }
        Ok(Self { train, val, test })
    }
}

// Validate that the size is between 0.0 and 1.0
pub fn validate_size(s: &str) -> std::result::Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("SIZE must be between 0.0 and 1.0".to_string()),
    }
}
