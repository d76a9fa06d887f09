use clap::Subcommand;
use std::path::PathBuf;

use crate::archive::Addressing;

pub mod extract;
pub mod info;
pub mod list;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the entries of an archive
    List {
        /// Source archive
        #[arg(short, long)]
        source: PathBuf,

        /// Show location and size of each entry
        #[arg(long)]
        detailed: bool,

        /// Only list entries matching glob pattern (e.g., "*.blk")
        #[arg(long)]
        filter: Option<String>,

        /// Only print the number of matching entries
        #[arg(long)]
        count: bool,

        /// How entry locations are addressed: directory (after the directory) or stream (from 0x10)
        #[arg(long, default_value = "directory")]
        addressing: Addressing,
    },

    /// Extract an archive
    Extract {
        /// Source archive
        #[arg(short, long)]
        source: PathBuf,

        /// Output directory
        #[arg(short, long)]
        destination: PathBuf,

        /// Only extract entries matching glob pattern (e.g., "*.blk")
        #[arg(long, conflicts_with = "file")]
        filter: Option<String>,

        /// Extract a single entry by its name in the archive
        #[arg(long, conflicts_with = "filter")]
        file: Option<String>,

        /// Leave files that already exist in the output directory untouched
        #[arg(long)]
        keep_existing: bool,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,

        /// How entry locations are addressed: directory (after the directory) or stream (from 0x10)
        #[arg(long, default_value = "directory")]
        addressing: Addressing,
    },

    /// Show header and directory information
    Info {
        /// Source archive
        #[arg(short, long)]
        source: PathBuf,

        /// Print a hex dump of the primary header
        #[arg(long)]
        dump: bool,

        /// How entry locations are addressed: directory (after the directory) or stream (from 0x10)
        #[arg(long, default_value = "directory")]
        addressing: Addressing,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::List {
                source,
                detailed,
                filter,
                count,
                addressing,
            } => list::execute(source, *detailed, filter.as_deref(), *count, *addressing),
            Commands::Extract {
                source,
                destination,
                filter,
                file,
                keep_existing,
                quiet,
                addressing,
            } => extract::execute(
                source,
                destination,
                filter.as_deref(),
                file.as_deref(),
                *keep_existing,
                !*quiet,
                *addressing,
            ),
            Commands::Info {
                source,
                dump,
                addressing,
            } => info::execute(source, *dump, *addressing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_parse_extract_single_file() {
        let cli = Cli::try_parse_from([
            "dagorarc", "extract", "-s", "a.vromfs.bin", "-d", "out", "--file", "b/c.txt",
        ])
        .unwrap();
        match cli.command {
            Commands::Extract { file, filter, quiet, addressing, .. } => {
                assert_eq!(file.as_deref(), Some("b/c.txt"));
                assert!(filter.is_none());
                assert!(!quiet);
                assert_eq!(addressing, Addressing::AfterDirectory);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_file_conflicts_with_filter() {
        let result = Cli::try_parse_from([
            "dagorarc", "extract", "-s", "a.bin", "-d", "out", "--file", "x", "--filter", "*.blk",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_list_addressing() {
        let cli = Cli::try_parse_from([
            "dagorarc", "list", "-s", "a.bin", "--addressing", "stream", "--detailed",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::List { detailed: true, addressing: Addressing::StreamStart, .. }
        ));
    }
}
