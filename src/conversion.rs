use log::{debug, warn};

use crate::coco::{polygon_geometry, rectangle_geometry, CocoWriter, ShapeGeometry};
use crate::dataset::LabelVocabulary;
use crate::error::{ConvertError, Result, ShapeError};
use crate::types::{AnnotatedImage, ProcessingStats, Shape, ShapeKind};

/// Geometry of a shape, or `None` for shape types the converter does not handle
pub fn shape_geometry(
    shape: &Shape,
    image_width: u32,
    image_height: u32,
) -> std::result::Result<Option<ShapeGeometry>, ShapeError> {
    match shape.kind() {
        ShapeKind::Rectangle => rectangle_geometry(&shape.points).map(Some),
        ShapeKind::Polygon => polygon_geometry(&shape.points, image_width, image_height).map(Some),
        ShapeKind::Unsupported(_) => Ok(None),
    }
}

/// Add one image and its supported shapes to the writer
pub fn convert_annotation(
    writer: &mut CocoWriter,
    item: &AnnotatedImage,
    vocabulary: &LabelVocabulary,
    stats: &mut ProcessingStats,
) -> Result<()> {
    let annotation = &item.annotation;
    let image_id = writer.add_image(
        annotation.image_file_name().to_string(),
        annotation.image_width,
        annotation.image_height,
    );
    stats.images += 1;

    for shape in &annotation.shapes {
        let Some(category_id) = vocabulary.id(&shape.label) else {
            debug!(
                "Skipping shape with unknown label '{}' in {}",
                shape.label,
                item.json_path.display()
            );
            stats.unknown_labels += 1;
            continue;
        };

        let geometry = shape_geometry(shape, annotation.image_width, annotation.image_height)
            .map_err(|source| ConvertError::InvalidShape {
                path: item.json_path.clone(),
                label: shape.label.clone(),
                source,
            })?;

        match geometry {
            Some(geometry) => {
                writer.add_annotation(image_id, category_id, geometry);
                stats.annotations += 1;
            }
            None => {
                warn!(
                    "Unsupported shape_type '{}' for label '{}' in {}, skipping",
                    shape.shape_type,
                    shape.label,
                    item.json_path.display()
                );
                stats.unsupported_shapes += 1;
            }
        }
    }

    Ok(())
}
