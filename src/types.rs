use serde::Deserialize;
use std::path::PathBuf;

// The Shape struct representing one annotated shape
#[derive(Debug, Deserialize, Clone)]
pub struct Shape {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    #[serde(default = "default_shape_type")]
    pub shape_type: String,
}

fn default_shape_type() -> String {
    "polygon".to_string()
}

/// Shape kinds understood by the converter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    /// Two opposite corners
    Rectangle,
    Polygon,
    /// Any other LabelMe shape type (circle, line, point, ...)
    Unsupported(String),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self.shape_type.as_str() {
            "rectangle" => ShapeKind::Rectangle,
            "polygon" => ShapeKind::Polygon,
            other => ShapeKind::Unsupported(other.to_string()),
        }
    }
}

// The ImageAnnotation struct representing the LabelMe annotation of an image
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnnotation {
    #[serde(default)]
    pub shapes: Vec<Shape>,
    pub image_path: String,
    pub image_height: u32,
    pub image_width: u32,
}

impl ImageAnnotation {
    /// File name part of `imagePath`, accepting both `/` and `\` separators
    pub fn image_file_name(&self) -> &str {
        self.image_path
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(&self.image_path)
    }
}

/// An image paired with its parsed annotation file
#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    pub image_path: PathBuf,
    pub json_path: PathBuf,
    pub annotation: ImageAnnotation,
}

// Struct to hold the split datasets for training, validation, and testing
#[derive(Debug, Default)]
pub struct SplitData {
    pub train: Vec<AnnotatedImage>,
    pub val: Vec<AnnotatedImage>,
    pub test: Vec<AnnotatedImage>,
}

impl SplitData {
    pub fn get(&self, split: Split) -> &[AnnotatedImage] {
        match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
            Split::Test => &self.test,
        }
    }

    /// Non-empty splits in conversion order
    pub fn populated(&self) -> impl Iterator<Item = (Split, &[AnnotatedImage])> {
        Split::ALL
            .into_iter()
            .map(move |split| (split, self.get(split)))
            .filter(|(_, items)| !items.is_empty())
    }
}

/// Dataset split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Test];

    pub fn name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }

    /// File name of the COCO document for this split
    pub fn annotation_file_name(self) -> String {
        format!("instance_{}.json", self.name())
    }
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub images: usize,
    pub annotations: usize,
    pub unsupported_shapes: usize,
    pub unknown_labels: usize,
}

impl ProcessingStats {
    pub fn merge(&mut self, other: &ProcessingStats) {
        self.images += other.images;
        self.annotations += other.annotations;
        self.unsupported_shapes += other.unsupported_shapes;
        self.unknown_labels += other.unknown_labels;
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Images converted: {}", self.images);
        log::info!("Annotations written: {}", self.annotations);

        if self.unsupported_shapes > 0 {
            log::warn!(
                "Skipped {} shapes with unsupported shape_type",
                self.unsupported_shapes
            );
        }
        if self.unknown_labels > 0 {
            log::warn!(
                "Skipped {} shapes whose label is not in label_list",
                self.unknown_labels
            );
        }
    }
}
