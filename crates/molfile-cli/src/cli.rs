use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "molfile - Read, normalise, inspect and validate MDL Molfile (V2000) structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used when validating many files.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S write.program=MYTOOL
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,

    /// Read files with an unrecognized version token as empty structures
    /// instead of failing.
    #[arg(long, global = true)]
    pub legacy_version_fallback: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a Molfile and write it back in normalised V2000 form.
    Convert(ConvertArgs),
    /// Print a summary of a Molfile (formula, bond types, extent).
    Inspect(InspectArgs),
    /// Check that one or more Molfiles parse, in parallel.
    Validate(ValidateArgs),
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Path to the input Molfile.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output Molfile.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Molecule name for the output header. Defaults to the input's name.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Write atoms only, without the bond block.
    #[arg(long)]
    pub no_bonds: bool,

    /// Leave the timestamp field of the program line blank.
    #[arg(long)]
    pub no_timestamp: bool,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the Molfile to inspect.
    #[arg(required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Print the summary as TOML instead of plain text.
    #[arg(long)]
    pub toml: bool,

    /// Also write a per-atom table (index, symbol, x, y, z, valence) as CSV.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Molfiles to check.
    #[arg(required = true, num_args = 1.., value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_convert_with_global_flags() {
        let cli = Cli::parse_from([
            "molfile", "-vv", "convert", "-i", "in.mol", "-o", "out.mol", "--no-bonds", "-S",
            "write.program=TOOL",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.set_values, vec!["write.program=TOOL".to_string()]);
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.input, PathBuf::from("in.mol"));
                assert!(args.no_bonds);
                assert!(!args.no_timestamp);
                assert_eq!(args.name, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn validate_requires_at_least_one_path() {
        assert!(Cli::try_parse_from(["molfile", "validate"]).is_err());
        let cli = Cli::try_parse_from(["molfile", "validate", "a.mol", "b.mol", "-j", "2"]).unwrap();
        assert_eq!(cli.threads, Some(2));
        match cli.command {
            Commands::Validate(args) => assert_eq!(args.paths.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["molfile", "-q", "-v", "inspect", "x.mol"]).is_err());
    }
}
