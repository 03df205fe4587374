//! Command line surface.

use clap::Parser;
use std::path::PathBuf;

use crate::batch::RunOptions;

/// Apply a JSON metadata template to a CSV batch for Internet Archive uploads
#[derive(Debug, Parser)]
#[command(name = "ia-templatizer", version, about)]
pub struct Cli {
    /// Expand rows whose `file` is a directory into one record per member file
    #[arg(short = 'E', long = "expand-directories")]
    pub expand_directories: bool,

    /// Template JSON file
    pub template: PathBuf,

    /// Input CSV file with a header row
    pub csv: PathBuf,

    /// Output CSV file
    pub output: PathBuf,
}

impl Cli {
    pub fn into_options(self) -> RunOptions {
        RunOptions {
            template_path: self.template,
            records_path: self.csv,
            output_path: self.output,
            expand_directories: self.expand_directories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positionals_and_flag() {
        let cli = Cli::try_parse_from(["ia-templatizer", "-E", "t.json", "in.csv", "out.csv"]).unwrap();
        let options = cli.into_options();

        assert!(options.expand_directories);
        assert_eq!(options.template_path, PathBuf::from("t.json"));
        assert_eq!(options.records_path, PathBuf::from("in.csv"));
        assert_eq!(options.output_path, PathBuf::from("out.csv"));
    }

    #[test]
    fn test_long_flag_and_default() {
        let cli = Cli::try_parse_from([
            "ia-templatizer",
            "--expand-directories",
            "t.json",
            "in.csv",
            "out.csv",
        ])
        .unwrap();
        assert!(cli.expand_directories);

        let cli = Cli::try_parse_from(["ia-templatizer", "t.json", "in.csv", "out.csv"]).unwrap();
        assert!(!cli.expand_directories);
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let err = Cli::try_parse_from(["ia-templatizer", "--bogus", "t.json", "in.csv", "out.csv"])
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_positional_is_usage_error() {
        let err = Cli::try_parse_from(["ia-templatizer", "t.json", "in.csv"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
