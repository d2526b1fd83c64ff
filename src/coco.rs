//! COCO format data structures and utilities
//!
//! This module holds the COCO detection records written by the converter and the
//! geometry used to derive boxes and segmentations from LabelMe shapes.

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;
use crate::mask::{mask_to_box, polygon_to_mask};

/// Supercategory given to every discovered label
pub const SUPERCATEGORY: &str = "component";

/// COCO category information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub supercategory: String,
}

/// COCO image information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: u32,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// COCO annotation information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u32,
    pub image_id: u32,
    pub category_id: u32,
    pub segmentation: Vec<Vec<f64>>,
    pub bbox: [f64; 4], // [x, y, width, height]
    pub area: f64,
    pub iscrowd: u32,
}

/// Complete COCO dataset structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CocoFile {
    pub images: Vec<Image>,
    pub categories: Vec<Category>,
    pub annotations: Vec<Annotation>,
}

/// Box, area and segmentation derived from one shape
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGeometry {
    pub bbox: [f64; 4],
    pub area: f64,
    pub segmentation: Vec<f64>,
}

/// Accumulates the records of one split and hands out dense 1-based ids
pub struct CocoWriter {
    next_image_id: u32,
    next_annotation_id: u32,
    file: CocoFile,
}

impl CocoWriter {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            next_image_id: 1,
            next_annotation_id: 1,
            file: CocoFile {
                categories,
                ..CocoFile::default()
            },
        }
    }

    /// Add an image and return its id
    pub fn add_image(&mut self, file_name: String, width: u32, height: u32) -> u32 {
        let id = self.next_image_id;
        self.next_image_id += 1;
        self.file.images.push(Image {
            id,
            file_name,
            width,
            height,
        });
        id
    }

    /// Add an annotation for an already added image and return its id
    pub fn add_annotation(
        &mut self,
        image_id: u32,
        category_id: u32,
        geometry: ShapeGeometry,
    ) -> u32 {
        let id = self.next_annotation_id;
        self.next_annotation_id += 1;
        self.file.annotations.push(Annotation {
            id,
            image_id,
            category_id,
            segmentation: vec![geometry.segmentation],
            bbox: geometry.bbox,
            area: geometry.area,
            iscrowd: 0,
        });
        id
    }

    pub fn build(self) -> CocoFile {
        self.file
    }
}

/// Geometry of a rectangle given by two opposite corners.
///
/// The segmentation walks `(x1,y1) (x1,y2) (x2,y2) (x2,y1)`; the box is taken
/// directly from the corners.
pub fn rectangle_geometry(points: &[(f64, f64)]) -> Result<ShapeGeometry, ShapeError> {
    let [(x1, y1), (x2, y2)] = points else {
        return Err(ShapeError::RectanglePoints(points.len()));
    };
    let (x1, y1, x2, y2) = (*x1, *y1, *x2, *y2);

    let bbox = rectangle_bbox(x1, y1, x2, y2);
    Ok(ShapeGeometry {
        bbox,
        area: bbox[2] * bbox[3],
        segmentation: rectangle_to_polygon(x1, y1, x2, y2),
    })
}

/// Geometry of a polygon on a `width x height` image.
///
/// The box is the tight box of the rasterized mask, so it always lies inside the
/// image even when vertices do not.
pub fn polygon_geometry(
    points: &[(f64, f64)],
    width: u32,
    height: u32,
) -> Result<ShapeGeometry, ShapeError> {
    if points.len() < 3 {
        return Err(ShapeError::PolygonPoints(points.len()));
    }

    let mask = polygon_to_mask(points, width, height);
    let pixels = mask_to_box(&mask).ok_or(ShapeError::EmptyMask { width, height })?;
    let bbox = [
        pixels.col_min as f64,
        pixels.row_min as f64,
        (pixels.col_max - pixels.col_min) as f64,
        (pixels.row_max - pixels.row_min) as f64,
    ];

    Ok(ShapeGeometry {
        bbox,
        area: bbox[2] * bbox[3],
        segmentation: points.iter().flat_map(|&(x, y)| [x, y]).collect(),
    })
}

/// Bounding box `[x, y, w, h]` of two opposite corners, in any order
pub fn rectangle_bbox(x1: f64, y1: f64, x2: f64, y2: f64) -> [f64; 4] {
    [x1.min(x2), y1.min(y2), (x2 - x1).abs(), (y2 - y1).abs()]
}

/// Convert a rectangle to polygon points
pub fn rectangle_to_polygon(x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<f64> {
    vec![x1, y1, x1, y2, x2, y2, x2, y1]
}
