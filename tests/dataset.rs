//! Validates end-to-end dataset generation through the CLI orchestration layer

use clap::Parser;
use mosaictile::io::cli::{Cli, DatasetGenerator};
use mosaictile::io::error::DatasetError;
use mosaictile::io::{image, labels as label_io};
use mosaictile::labels::NormalizedLabel;
use ndarray::Array3;
use std::path::{Path, PathBuf};

fn temp_dir() -> tempfile::TempDir {
    match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => unreachable!("temp directory creation must succeed: {e}"),
    }
}

/// Write a 300x200 gradient mosaic with a handful of labels next to it
fn write_mosaic(dir: &Path, stem: &str) -> PathBuf {
    let pixels = Array3::from_shape_fn((200, 300, 3), |(row, col, channel)| {
        ((row + col + channel * 20) % 256) as f64 / 255.0
    });
    let image_path = dir.join(format!("{stem}.png"));
    match image::save_image(&image_path, &pixels) {
        Ok(()) => {}
        Err(e) => unreachable!("mosaic image write must succeed: {e}"),
    }

    let labels = vec![
        NormalizedLabel {
            class_id: 0,
            x_center: 0.25,
            y_center: 0.2,
            width: 0.04,
            height: 0.06,
        },
        NormalizedLabel {
            class_id: 1,
            x_center: 0.7,
            y_center: 0.35,
            width: 0.05,
            height: 0.05,
        },
        NormalizedLabel {
            class_id: 0,
            x_center: 0.5,
            y_center: 0.75,
            width: 0.06,
            height: 0.04,
        },
    ];
    match label_io::write_labels(dir.join(format!("{stem}.txt")), &labels) {
        Ok(()) => {}
        Err(e) => unreachable!("mosaic label write must succeed: {e}"),
    }

    image_path
}

fn base_args(mosaic: &Path, test_mosaic: &Path, output: &Path) -> Vec<String> {
    vec![
        "mosaictile".to_string(),
        mosaic.display().to_string(),
        "--test".to_string(),
        test_mosaic.display().to_string(),
        "--output".to_string(),
        output.display().to_string(),
        "--count".to_string(),
        "12".to_string(),
        "--train-ratio".to_string(),
        "0.5".to_string(),
        "--validation-ratio".to_string(),
        "0.25".to_string(),
        "--test-ratio".to_string(),
        "0.25".to_string(),
        "-W".to_string(),
        "48".to_string(),
        "-H".to_string(),
        "32".to_string(),
        "--min-labels".to_string(),
        "1".to_string(),
        "-i".to_string(),
        "200".to_string(),
        "--seed".to_string(),
        "99".to_string(),
        "--quiet".to_string(),
    ]
}

fn run_generator(args: &[String]) -> mosaictile::Result<()> {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => unreachable!("arguments must parse: {e}"),
    };
    DatasetGenerator::new(cli).run()
}

fn count_files(dir: &Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.count(),
        Err(e) => unreachable!("split directory must exist at {}: {e}", dir.display()),
    }
}

#[test]
fn test_generation_fills_every_split() {
    let workspace = temp_dir();
    let mosaic = write_mosaic(workspace.path(), "north_field");
    let test_mosaic = write_mosaic(workspace.path(), "south_field");
    let output = workspace.path().join("dataset");

    let mut args = base_args(&mosaic, &test_mosaic, &output);
    args.push("--preview".to_string());

    match run_generator(&args) {
        Ok(()) => {}
        Err(e) => unreachable!("generation must succeed: {e}"),
    }

    // 12 images split 0.5/0.25/0.25 over one mosaic per role: image and
    // label counts match in every split, previews mirror the images.
    assert_eq!(count_files(&output.join("images").join("train")), 6);
    assert_eq!(count_files(&output.join("labels").join("train")), 6);
    assert_eq!(count_files(&output.join("preview").join("train")), 6);
    assert_eq!(count_files(&output.join("images").join("validation")), 3);
    assert_eq!(count_files(&output.join("labels").join("validation")), 3);
    assert_eq!(count_files(&output.join("images").join("test")), 3);
    assert_eq!(count_files(&output.join("labels").join("test")), 3);

    // Every emitted label file parses back as normalized rows.
    for index in 0..6 {
        let path = output
            .join("labels")
            .join("train")
            .join(format!("IMG_{index:05}.txt"));
        match label_io::read_labels(&path) {
            Ok(labels) => {
                for label in labels {
                    assert!(label.width > 0.0);
                    assert!(label.height > 0.0);
                }
            }
            Err(e) => unreachable!("emitted labels must parse: {e}"),
        }
    }

    // Emitted tiles have the requested geometry.
    let tile = match image::load_image(output.join("images").join("train").join("IMG_00000.png")) {
        Ok(tile) => tile,
        Err(e) => unreachable!("emitted tile must load: {e}"),
    };
    assert_eq!(tile.dim(), (32, 48, 3));
}

#[test]
fn test_generation_is_reproducible_with_a_seed() {
    let workspace = temp_dir();
    let mosaic = write_mosaic(workspace.path(), "field");
    let test_mosaic = write_mosaic(workspace.path(), "reef");

    let output_a = workspace.path().join("run_a");
    let output_b = workspace.path().join("run_b");

    match run_generator(&base_args(&mosaic, &test_mosaic, &output_a)) {
        Ok(()) => {}
        Err(e) => unreachable!("first run must succeed: {e}"),
    }
    match run_generator(&base_args(&mosaic, &test_mosaic, &output_b)) {
        Ok(()) => {}
        Err(e) => unreachable!("second run must succeed: {e}"),
    }

    for split in ["train", "validation", "test"] {
        let labels_a = output_a.join("labels").join(split).join("IMG_00000.txt");
        let labels_b = output_b.join("labels").join(split).join("IMG_00000.txt");
        assert_eq!(read_text(&labels_a), read_text(&labels_b));

        let image_a = output_a.join("images").join(split).join("IMG_00000.png");
        let image_b = output_b.join("images").join(split).join("IMG_00000.png");
        assert_eq!(read_bytes(&image_a), read_bytes(&image_b));
    }
}

#[test]
fn test_non_empty_output_is_refused_without_overwrite() {
    let workspace = temp_dir();
    let mosaic = write_mosaic(workspace.path(), "field");
    let test_mosaic = write_mosaic(workspace.path(), "reef");
    let output = workspace.path().join("dataset");

    match run_generator(&base_args(&mosaic, &test_mosaic, &output)) {
        Ok(()) => {}
        Err(e) => unreachable!("first run must succeed: {e}"),
    }

    match run_generator(&base_args(&mosaic, &test_mosaic, &output)) {
        Err(DatasetError::TargetDirectoryNotEmpty { .. }) => {}
        _ => unreachable!("Expected TargetDirectoryNotEmpty error type"),
    }

    let mut args = base_args(&mosaic, &test_mosaic, &output);
    args.push("--overwrite".to_string());
    match run_generator(&args) {
        Ok(()) => {}
        Err(e) => unreachable!("overwriting run must succeed: {e}"),
    }
}

fn read_text(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => unreachable!("file must be readable at {}: {e}", path.display()),
    }
}

fn read_bytes(path: &Path) -> Vec<u8> {
    match std::fs::read(path) {
        Ok(content) => content,
        Err(e) => unreachable!("file must be readable at {}: {e}", path.display()),
    }
}
