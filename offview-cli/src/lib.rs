/// Command-line front end for offview
///
/// Loads an OFF mesh through the same path the viewer uses and reports the
/// normalized geometry, without needing a GPU context.
use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use offview_core::{LoadOptions, Mesh, TARGET_DIAGONAL};

pub const USAGE: &str = "Usage: offview <mesh.off> [--target-diagonal <length>]";

/// Parsed command-line arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub path: PathBuf,
    pub target_diagonal: f32,
}

impl Args {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut path = None;
        let mut target_diagonal = TARGET_DIAGONAL;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--target-diagonal" => {
                    let value = args.next().context("--target-diagonal needs a value")?;
                    target_diagonal = value
                        .parse()
                        .with_context(|| format!("invalid target diagonal '{}'", value))?;
                    if !(target_diagonal.is_finite() && target_diagonal > 0.0) {
                        bail!("target diagonal must be positive, got {}", target_diagonal);
                    }
                }
                flag if flag.starts_with("--") => bail!("unknown option '{}'\n{}", flag, USAGE),
                _ if path.is_some() => bail!("more than one mesh file given\n{}", USAGE),
                _ => path = Some(PathBuf::from(&arg)),
            }
        }

        let Some(path) = path else {
            bail!("{}", USAGE);
        };
        Ok(Self {
            path,
            target_diagonal,
        })
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            target_diagonal: self.target_diagonal,
            ..LoadOptions::default()
        }
    }
}

/// Load the mesh named by `args`
pub fn load(args: &Args) -> Result<Mesh> {
    Mesh::load_with(&args.path, &args.load_options())
        .with_context(|| format!("failed to load '{}'", args.path.display()))
}

/// Status line followed by the normalized bounding box
pub fn report(mesh: &Mesh) -> String {
    let bbox = mesh.bounding_box();
    let mut out = mesh.status_line();
    let _ = write!(
        out,
        "\nBounds: min ({:.4}, {:.4}, {:.4}) max ({:.4}, {:.4}, {:.4})\nDiagonal: {:.4}",
        bbox.min.x, bbox.min.y, bbox.min.z, bbox.max.x, bbox.max.y, bbox.max.z, bbox.diagonal
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_path_only() {
        let parsed = args(&["bunny.off"]).unwrap();
        assert_eq!(parsed.path, PathBuf::from("bunny.off"));
        assert_eq!(parsed.target_diagonal, TARGET_DIAGONAL);
    }

    #[test]
    fn test_parse_target_diagonal() {
        let parsed = args(&["--target-diagonal", "4", "bunny.off"]).unwrap();
        assert_eq!(parsed.target_diagonal, 4.0);
        assert_eq!(parsed.load_options().target_diagonal, 4.0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(args(&[]).is_err());
        assert!(args(&["a.off", "b.off"]).is_err());
        assert!(args(&["--target-diagonal"]).is_err());
        assert!(args(&["--target-diagonal", "0", "a.off"]).is_err());
        assert!(args(&["--verbose", "a.off"]).is_err());
    }

    #[test]
    fn test_report() {
        let mesh = Mesh::parse("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n").unwrap();
        let text = report(&mesh);
        assert!(text.starts_with("Vertices: 3, Faces: 1\n"));
        assert!(text.ends_with("Diagonal: 2.5000"));
    }
}
