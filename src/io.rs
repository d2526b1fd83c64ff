use glob::glob;
use log::{debug, info, warn};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::coco::CocoFile;
use crate::error::{ConvertError, Result};
use crate::types::{AnnotatedImage, Split, SplitData};
use crate::utils::{create_output_directory, read_and_parse_json};

// Supported image formats
pub const IMG_FORMATS: &[&str] = &[
    "bmp", "dng", "jpeg", "jpg", "mpo", "png", "tif", "tiff", "webp", "pfm",
];

/// Paths of the output dataset tree
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub root: PathBuf,
    pub annotations_dir: PathBuf,
}

impl OutputDirs {
    pub fn images_dir(&self, split: Split) -> PathBuf {
        self.root.join(split.name())
    }

    pub fn annotation_file(&self, split: Split) -> PathBuf {
        self.annotations_dir.join(split.annotation_file_name())
    }
}

/// Set up `annotations/` and one image directory per populated split.
///
/// Annotation files left by an earlier run for splits that are now empty are
/// removed, so every `instance_<split>.json` in the tree belongs to this run.
pub fn setup_output_directories(output_dir: &Path, split_data: &SplitData) -> Result<OutputDirs> {
    let root = create_output_directory(output_dir)?;
    let annotations_dir = create_output_directory(&root.join("annotations"))?;
    let dirs = OutputDirs {
        root,
        annotations_dir,
    };

    for split in Split::ALL {
        if split_data.get(split).is_empty() {
            remove_stale_split(&dirs, split)?;
        } else {
            create_output_directory(&dirs.images_dir(split))?;
        }
    }

    Ok(dirs)
}

fn remove_stale_split(dirs: &OutputDirs, split: Split) -> Result<()> {
    let annotation_file = dirs.annotation_file(split);
    if annotation_file.is_file() {
        fs::remove_file(&annotation_file).map_err(|e| ConvertError::io(&annotation_file, e))?;
        info!("Removed stale {}", annotation_file.display());
    }

    let images_dir = dirs.images_dir(split);
    if images_dir.is_dir() {
        warn!(
            "{} is left over from an earlier run and is not part of this dataset",
            images_dir.display()
        );
    }
    Ok(())
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMG_FORMATS.contains(&ext.as_str()))
}

/// List the images of a directory, sorted by file name
pub fn list_images(image_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(image_dir).map_err(|e| ConvertError::io(image_dir, e))?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConvertError::io(image_dir, e))?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || !path.is_file() {
            continue;
        }
        if is_image_file(&path) {
            images.push(path);
        } else {
            debug!("Skipping non-image file {}", path.display());
        }
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Annotation file expected for an image: `<json_dir>/<image stem>.json`
pub fn annotation_path_for(image_path: &Path, json_dir: &Path) -> PathBuf {
    let mut file_name = image_path.file_stem().unwrap_or_default().to_os_string();
    file_name.push(".json");
    json_dir.join(file_name)
}

/// Number of `*.json` files directly inside `json_dir`
pub fn count_json_files(json_dir: &Path) -> usize {
    let pattern = format!(
        "{}/*.json",
        glob::Pattern::escape(&json_dir.to_string_lossy())
    );
    match glob(&pattern) {
        Ok(paths) => paths.filter_map(|entry| entry.ok()).count(),
        Err(e) => {
            log::warn!("Invalid glob pattern {}: {}", pattern, e);
            0
        }
    }
}

/// Pair every image with its parsed annotation file.
///
/// Fails on the first image without an annotation file or with a malformed one, so
/// nothing is written for an inconsistent input.
pub fn read_annotated_images(images: Vec<PathBuf>, json_dir: &Path) -> Result<Vec<AnnotatedImage>> {
    images
        .into_iter()
        .map(|image_path| {
            let json_path = annotation_path_for(&image_path, json_dir);
            if !json_path.is_file() {
                return Err(ConvertError::MissingAnnotation {
                    image: image_path,
                    json: json_path,
                });
            }
            debug!("Generating dataset from: {}", json_path.display());
            let annotation = read_and_parse_json(&json_path)?;
            Ok(AnnotatedImage {
                image_path,
                json_path,
                annotation,
            })
        })
        .collect()
}

/// Copy one image into a split directory, keeping its file name
pub fn copy_image(image_path: &Path, images_dir: &Path) -> Result<()> {
    let file_name = image_path.file_name().ok_or_else(|| {
        ConvertError::io(
            image_path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let dest_path = images_dir.join(file_name);
    fs::copy(image_path, &dest_path).map_err(|e| ConvertError::io(&dest_path, e))?;
    Ok(())
}

/// Write a COCO document as JSON indented with four spaces
pub fn write_coco_file(path: &Path, coco: &CocoFile) -> Result<()> {
    let file = File::create(path).map_err(|e| ConvertError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    coco.serialize(&mut serializer)
        .map_err(|e| ConvertError::io(path, e.into()))?;
    writer.flush().map_err(|e| ConvertError::io(path, e))?;

    info!("Wrote {}", path.display());
    Ok(())
}
