/// offview - report the normalized geometry of an OFF mesh
///
/// Usage: offview <mesh.off> [--target-diagonal <length>]
/// Set RUST_LOG=debug for parser and normalization details.
use std::env;

use anyhow::Result;
use offview_cli::{load, report, Args};
use offview_core::logging::{init_logging, LoggingConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let args = Args::parse(env::args().skip(1))?;
    log::debug!("loading {}", args.path.display());
    let mesh = load(&args)?;

    println!("{}", report(&mesh));
    Ok(())
}
