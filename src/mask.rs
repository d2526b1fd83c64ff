//! Polygon rasterization
//!
//! Polygons are filled onto a binary `GrayImage` of the annotated image's size and
//! the box is read back from the set pixels. This matches the mask-based boxes COCO
//! tooling computes, which can differ from the raw vertex extrema by the rounding of
//! fractional vertices and by clipping to the image.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

const FOREGROUND: Luma<u8> = Luma([1]);

// Vertices are kept within this many canvas sizes of the origin
const VERTEX_BOUND_FACTOR: i64 = 4;

/// Inclusive pixel extrema of a rasterized mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub col_min: u32,
    pub row_min: u32,
    pub col_max: u32,
    pub row_max: u32,
}

/// Rasterize a polygon (fill and outline) into a `height x width` mask
pub fn polygon_to_mask(points: &[(f64, f64)], width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return mask;
    }
    let vertices = snap_vertices(points, vertex_bound(width, height));

    match vertices.as_slice() {
        [] => {}
        [single] => {
            if single.x >= 0
                && single.y >= 0
                && (single.x as u32) < width
                && (single.y as u32) < height
            {
                mask.put_pixel(single.x as u32, single.y as u32, FOREGROUND);
            }
        }
        _ => draw_polygon_mut(&mut mask, &vertices, FOREGROUND),
    }

    mask
}

/// Pixel extrema of the set region, or `None` for an empty mask
pub fn mask_to_box(mask: &GrayImage) -> Option<PixelBox> {
    mask.enumerate_pixels()
        .filter(|(_, _, pixel)| pixel[0] != 0)
        .fold(None, |acc: Option<PixelBox>, (x, y, _)| {
            Some(match acc {
                None => PixelBox {
                    col_min: x,
                    row_min: y,
                    col_max: x,
                    row_max: y,
                },
                Some(b) => PixelBox {
                    col_min: b.col_min.min(x),
                    row_min: b.row_min.min(y),
                    col_max: b.col_max.max(x),
                    row_max: b.row_max.max(y),
                },
            })
        })
}

// imageproc walks polygon edges in i32, so far-out vertices must be pulled in
// before drawing. The part of the polygon inside the canvas is unaffected for
// any vertex within the bound.
fn vertex_bound(width: u32, height: u32) -> f64 {
    let size = i64::from(width.max(height));
    (size * VERTEX_BOUND_FACTOR).min(i64::from(i32::MAX / 4)) as f64
}

// Round to the pixel grid, dropping repeated vertices and the closing vertex;
// draw_polygon_mut rejects polygons whose first and last points coincide.
fn snap_vertices(points: &[(f64, f64)], bound: f64) -> Vec<Point<i32>> {
    let snap = |v: f64| v.round().clamp(-bound, bound) as i32;
    let mut vertices: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for &(x, y) in points {
        let vertex = Point::new(snap(x), snap(y));
        if vertices.last() != Some(&vertex) {
            vertices.push(vertex);
        }
    }
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_vertices_drops_closing_point() {
        let vertices = snap_vertices(&[(0.0, 0.0), (4.2, 0.0), (4.0, 3.6), (0.1, 0.2)], 100.0);
        assert_eq!(
            vertices,
            vec![Point::new(0, 0), Point::new(4, 0), Point::new(4, 4)]
        );
    }

    #[test]
    fn test_snap_vertices_bounds_far_points() {
        assert_eq!(vertex_bound(8, 5), 32.0);
        let vertices = snap_vertices(&[(-1e12, 3.0), (f64::MAX, 1e9), (2.0, f64::NAN)], 32.0);
        assert_eq!(
            vertices,
            vec![Point::new(-32, 3), Point::new(32, 32), Point::new(2, 0)]
        );
    }

    #[test]
    fn test_far_out_polygon_covers_canvas() {
        let points = [(-1e12, -1e12), (1e12, -1e12), (1e12, 1e12), (-1e12, 1e12)];
        let mask = polygon_to_mask(&points, 8, 8);
        assert!(mask.pixels().all(|pixel| pixel[0] == 1));
    }

    #[test]
    fn test_single_pixel_polygon() {
        let mask = polygon_to_mask(&[(2.0, 3.0), (2.2, 3.1), (1.9, 2.8)], 5, 5);
        assert_eq!(
            mask_to_box(&mask),
            Some(PixelBox {
                col_min: 2,
                row_min: 3,
                col_max: 2,
                row_max: 3,
            })
        );
    }

    #[test]
    fn test_empty_mask() {
        let mask = GrayImage::new(4, 4);
        assert_eq!(mask_to_box(&mask), None);
    }
}
