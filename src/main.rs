//! CLI entry point for the mosaic tile dataset generator

use clap::Parser;
use mosaictile::io::cli::{Cli, DatasetGenerator};

fn main() -> mosaictile::Result<()> {
    let cli = Cli::parse();
    let mut generator = DatasetGenerator::new(cli);
    generator.run()
}
