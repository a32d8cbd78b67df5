//! Label clipping against candidate tile rectangles
//!
//! Determines which labels survive extraction of a rectangle from the mosaic
//! and relocates the survivors to rectangle-relative coordinates.

use crate::labels::{AbsoluteLabel, PixelRect};

/// Result of intersecting a label list with a rectangle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipOutcome {
    /// Surviving labels, clipped and relocated to the rectangle origin
    pub labels: Vec<AbsoluteLabel>,
    /// Whether a partially contained label stopped the scan
    pub is_partial: bool,
}

/// Clip labels against a rectangle
///
/// A label is a candidate when its box overlaps the rectangle at all. Each
/// candidate is clipped to the rectangle, translated to rectangle-relative
/// coordinates, and kept when the clipped area is at least `min_area_ratio`
/// of the label's original area. The area stored on a surviving label is the
/// clipped area.
///
/// With `reject_partial` set, the scan stops at the first candidate whose
/// clipped area falls short of its original area and returns an empty label
/// list with `is_partial` raised; the caller is expected to discard the
/// rectangle and redraw. Labels with a non-positive stored area are skipped
/// outright since no retention threshold can hold for them.
///
/// Output order follows input order.
pub fn labels_in_rect(
    labels: &[AbsoluteLabel],
    rect: &PixelRect,
    min_area_ratio: f64,
    reject_partial: bool,
) -> ClipOutcome {
    let mut kept = Vec::new();

    for label in labels {
        let overlaps = label.x_right >= rect.x_left
            && label.x_left < rect.x_right
            && label.y_bottom >= rect.y_top
            && label.y_top < rect.y_bottom;
        if !overlaps || label.area <= 0 {
            continue;
        }

        let x_left = (label.x_left - rect.x_left).max(0);
        let y_top = (label.y_top - rect.y_top).max(0);
        let x_right = (label.x_right - rect.x_left).min(rect.width());
        let y_bottom = (label.y_bottom - rect.y_top).min(rect.height());

        let clipped_area = (x_right - x_left) * (y_bottom - y_top);
        let area_ratio = clipped_area as f64 / label.area as f64;

        if reject_partial && area_ratio < 1.0 {
            return ClipOutcome {
                labels: Vec::new(),
                is_partial: true,
            };
        }

        if area_ratio >= min_area_ratio {
            kept.push(AbsoluteLabel {
                class_id: label.class_id,
                x_left,
                y_top,
                x_right,
                y_bottom,
                area: clipped_area,
            });
        }
    }

    ClipOutcome {
        labels: kept,
        is_partial: false,
    }
}
