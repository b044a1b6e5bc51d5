use bioplan::logging;
use std::path::PathBuf;

const USAGE: &str = "usage: bioplan <dataset.json> [output_dir]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args_os().skip(1);
    let document = PathBuf::from(args.next().ok_or(USAGE)?);
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    bioplan::run(&document, &output_dir)?;

    Ok(())
}
