//! YOLO-formatted label file reading and writing
//!
//! One row per label: `class x_center y_center width height`, the class as an
//! integer and the geometry as fractions of the image dimensions. Rows are
//! whitespace-delimited; blank lines are ignored on input.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use crate::io::error::{DatasetError, Result, file_system_error};
use crate::labels::NormalizedLabel;

/// Read a normalized label file
///
/// # Errors
///
/// Returns an error if the file cannot be read or any non-blank row does not
/// hold exactly five parseable columns.
pub fn read_labels<P: AsRef<Path>>(path: P) -> Result<Vec<NormalizedLabel>> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).map_err(|e| file_system_error(path, "read labels", e))?;

    let mut labels = Vec::new();
    for (line_index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        labels.push(parse_label_row(trimmed, path, line_index + 1)?);
    }

    Ok(labels)
}

fn parse_label_row(row: &str, path: &Path, line: usize) -> Result<NormalizedLabel> {
    let mut tokens = row.split_whitespace();

    let class_id = parse_class(tokens.next(), path, line)?;
    let x_center = parse_fraction(tokens.next(), "x_center", path, line)?;
    let y_center = parse_fraction(tokens.next(), "y_center", path, line)?;
    let width = parse_fraction(tokens.next(), "width", path, line)?;
    let height = parse_fraction(tokens.next(), "height", path, line)?;

    if let Some(extra) = tokens.next() {
        return Err(DatasetError::LabelParse {
            path: path.to_path_buf(),
            line,
            reason: format!("unexpected trailing column '{extra}'; expected 5 columns"),
        });
    }

    Ok(NormalizedLabel {
        class_id,
        x_center,
        y_center,
        width,
        height,
    })
}

fn parse_class(token: Option<&str>, path: &Path, line: usize) -> Result<u32> {
    let raw = token.ok_or_else(|| missing_column("class", path, line))?;
    raw.parse::<u32>().map_err(|_| DatasetError::LabelParse {
        path: path.to_path_buf(),
        line,
        reason: format!("invalid class '{raw}'; expected a non-negative integer"),
    })
}

fn parse_fraction(token: Option<&str>, field: &str, path: &Path, line: usize) -> Result<f64> {
    let raw = token.ok_or_else(|| missing_column(field, path, line))?;
    raw.parse::<f64>().map_err(|_| DatasetError::LabelParse {
        path: path.to_path_buf(),
        line,
        reason: format!("invalid {field} '{raw}'; expected a floating-point number"),
    })
}

fn missing_column(field: &str, path: &Path, line: usize) -> DatasetError {
    DatasetError::LabelParse {
        path: path.to_path_buf(),
        line,
        reason: format!("missing {field} column; expected 5 columns"),
    }
}

/// Write a normalized label file
///
/// Geometry fields are emitted as fixed 6-decimal floats. An empty label list
/// still produces a file, with no rows.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_labels<P: AsRef<Path>>(path: P, labels: &[NormalizedLabel]) -> Result<()> {
    let path = path.as_ref();
    let mut file =
        fs::File::create(path).map_err(|e| file_system_error(path, "create labels", e))?;

    for label in labels {
        writeln!(
            file,
            "{} {:.6} {:.6} {:.6} {:.6}",
            label.class_id, label.x_center, label.y_center, label.width, label.height
        )
        .map_err(|e| file_system_error(path, "write labels", e))?;
    }

    Ok(())
}
