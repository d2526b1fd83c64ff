use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;

use crate::coco::{Category, CocoFile, CocoWriter, SUPERCATEGORY};
use crate::config::{ConverterConfig, SplitRatios};
use crate::conversion::convert_annotation;
use crate::error::Result;
use crate::io::{
    copy_image, count_json_files, list_images, read_annotated_images, setup_output_directories,
    write_coco_file, OutputDirs,
};
use crate::types::{AnnotatedImage, ProcessingStats, Split, SplitData};
use crate::utils::create_progress_bar;

/// Number of images in each split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitCounts {
    pub train: usize,
    pub val: usize,
    pub test: usize,
}

/// Train and val take `floor(total * proportion)`, test takes the remainder
pub fn split_counts(total: usize, ratios: &SplitRatios) -> SplitCounts {
    let train = ((total as f64 * ratios.train).floor() as usize).min(total);
    let val = if ratios.val == 0.0 {
        0
    } else {
        ((total as f64 * ratios.val).floor() as usize).min(total - train)
    };

    SplitCounts {
        train,
        val,
        test: total - train - val,
    }
}

/// Split the annotated images into training, validation, and testing sets.
///
/// The order is kept unless a shuffle seed is given.
pub fn split_annotations(
    mut annotations: Vec<AnnotatedImage>,
    ratios: &SplitRatios,
    shuffle_seed: Option<u64>,
) -> SplitData {
    if let Some(seed) = shuffle_seed {
        let mut rng = StdRng::seed_from_u64(seed);
        annotations.shuffle(&mut rng);
    }

    let counts = split_counts(annotations.len(), ratios);
    let test = annotations.split_off(counts.train + counts.val);
    let val = annotations.split_off(counts.train);

    SplitData {
        train: annotations,
        val,
        test,
    }
}

/// Label to category id mapping shared by all splits of a dataset.
///
/// Ids start at 1 and follow first-seen order.
#[derive(Debug, Clone, Default)]
pub struct LabelVocabulary {
    ids: HashMap<String, u32>,
    labels: Vec<String>,
}

impl LabelVocabulary {
    /// Vocabulary restricted to a fixed, ordered label list
    pub fn from_label_list(labels: &[String]) -> Self {
        let mut vocabulary = Self::default();
        for label in labels {
            vocabulary.insert(label);
        }
        vocabulary
    }

    /// Build the vocabulary from every shape of the given images, in order
    pub fn build<'a>(
        items: impl IntoIterator<Item = &'a AnnotatedImage>,
        label_list: &[String],
    ) -> Self {
        if !label_list.is_empty() {
            return Self::from_label_list(label_list);
        }

        let mut vocabulary = Self::default();
        for shape in items.into_iter().flat_map(|item| &item.annotation.shapes) {
            vocabulary.insert(&shape.label);
        }
        vocabulary
    }

    fn insert(&mut self, label: &str) -> u32 {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        self.labels.push(label.to_string());
        let id = self.labels.len() as u32;
        self.ids.insert(label.to_string(), id);
        id
    }

    pub fn id(&self, label: &str) -> Option<u32> {
        self.ids.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.labels
            .iter()
            .zip(1u32..)
            .map(|(name, id)| Category {
                id,
                name: name.clone(),
                supercategory: SUPERCATEGORY.to_string(),
            })
            .collect()
    }
}

/// Convert the images of one split into a COCO document
pub fn convert_split(
    items: &[AnnotatedImage],
    vocabulary: &LabelVocabulary,
) -> Result<(CocoFile, ProcessingStats)> {
    let mut writer = CocoWriter::new(vocabulary.categories());
    let mut stats = ProcessingStats::default();

    for item in items {
        convert_annotation(&mut writer, item, vocabulary, &mut stats)?;
    }

    Ok((writer.build(), stats))
}

/// Copy the images of one split, then convert and write its annotation file
pub fn process_split(
    split: Split,
    items: &[AnnotatedImage],
    vocabulary: &LabelVocabulary,
    output_dirs: &OutputDirs,
) -> Result<ProcessingStats> {
    let label = match split {
        Split::Train => "Train",
        Split::Val => "Val",
        Split::Test => "Test",
    };
    let pb = create_progress_bar(items.len() as u64, label);
    let images_dir = output_dirs.images_dir(split);
    for item in items {
        copy_image(&item.image_path, &images_dir)?;
        pb.inc(1);
    }
    pb.finish_with_message(format!("{} processing complete", label));

    let (coco, stats) = convert_split(items, vocabulary)?;
    write_coco_file(&output_dirs.annotation_file(split), &coco)?;
    Ok(stats)
}

/// Main dataset processing pipeline
pub fn process_dataset(config: &ConverterConfig) -> Result<ProcessingStats> {
    let images = list_images(&config.image_dir)?;
    let json_count = count_json_files(&config.json_dir);
    info!(
        "Found {} images and {} JSON files.",
        images.len(),
        json_count
    );
    if json_count != images.len() {
        warn!(
            "Image count ({}) differs from JSON file count ({}); JSON files without an image are ignored",
            images.len(),
            json_count
        );
    }

    let annotations = read_annotated_images(images, &config.json_dir)?;
    let split_data = split_annotations(annotations, &config.ratios, config.shuffle_seed);
    info!(
        "Split into train={}, val={}, test={}",
        split_data.train.len(),
        split_data.val.len(),
        split_data.test.len()
    );

    let vocabulary = LabelVocabulary::build(
        split_data
            .train
            .iter()
            .chain(&split_data.val)
            .chain(&split_data.test),
        &config.label_list,
    );
    info!("Using {} categories.", vocabulary.len());

    let output_dirs = setup_output_directories(&config.output_dir, &split_data)?;

    let mut stats = ProcessingStats::default();
    for (split, items) in split_data.populated() {
        let split_stats = process_split(split, items, &vocabulary, &output_dirs)?;
        stats.merge(&split_stats);
    }

    stats.print_summary();
    Ok(stats)
}
