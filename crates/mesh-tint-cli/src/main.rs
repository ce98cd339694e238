//! stl-to-glb: convert mesh files to GLB with category colors.
//!
//! ```text
//! stl-to-glb <input> <output.glb> [category]
//! stl-to-glb --split <input> <output-prefix> [category]
//! ```

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: stl-to-glb <input> <output.glb> [category]";
const SPLIT_USAGE: &str = "Usage: stl-to-glb --split <input> <output-prefix> [category]";

#[derive(Parser, Debug)]
#[command(name = "stl-to-glb")]
#[command(
    author,
    version,
    about = "Convert STL, 3MF, OBJ, PLY, OFF and glTF models to GLB tinted by part category"
)]
struct Cli {
    /// Write one GLB per geometry as <output-prefix>-<n>.glb and print the
    /// results as a JSON array
    #[arg(long)]
    split: bool,

    /// Input model file
    input: PathBuf,

    /// Output GLB path, or output prefix with --split
    output: PathBuf,

    /// Part category: supports, connectors, lockpins or other
    #[arg(default_value = mesh_tint::DEFAULT_CATEGORY)]
    category: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress the success message
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let split = std::env::args().skip(1).any(|a| a == "--split");
            eprintln!("{}", if split { SPLIT_USAGE } else { USAGE });
            if let Some(reason) = e.kind().as_str() {
                eprintln!("error: {}", reason);
            }
            return ExitCode::from(1);
        }
    };

    init_logging(cli.verbose);

    let result = if cli.split {
        commands::split::run(&cli.input, &cli.output, &cli.category, cli.quiet)
    } else {
        commands::convert::run(&cli.input, &cli.output, &cli.category, cli.quiet)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&err);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_category_defaults_to_supports() {
        let cli = Cli::try_parse_from(["stl-to-glb", "in.stl", "out.glb"]).unwrap();
        assert!(!cli.split);
        assert_eq!(cli.category, "supports");
    }

    #[test]
    fn test_split_form() {
        let cli =
            Cli::try_parse_from(["stl-to-glb", "--split", "kit.3mf", "kit", "lockpins"]).unwrap();
        assert!(cli.split);
        assert_eq!(cli.input, PathBuf::from("kit.3mf"));
        assert_eq!(cli.output, PathBuf::from("kit"));
        assert_eq!(cli.category, "lockpins");
    }

    #[test]
    fn test_missing_output_is_rejected() {
        assert!(Cli::try_parse_from(["stl-to-glb", "in.stl"]).is_err());
        assert!(Cli::try_parse_from(["stl-to-glb", "--split", "in.stl"]).is_err());
    }
}
