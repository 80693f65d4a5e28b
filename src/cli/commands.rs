use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::sidecar::tags_file::tags_file_path;

#[derive(Parser, Debug)]
#[command(name = "utag")]
#[command(version)]
#[command(about = "Edit the tags of an album through a plain text file", long_about = None)]
pub struct Cli {
    /// Without a command: import and rename when a tags file exists, export otherwise
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Write the tags of the audio files into `tags` and `Folder.<ext>`
    #[command(visible_alias = "e")]
    Export {
        /// Album directory (defaults to the current directory)
        dir: Option<PathBuf>,
    },

    /// Write `tags` and `Folder.<ext>` back into the audio files
    #[command(visible_alias = "i")]
    Import {
        /// Album directory (defaults to the current directory)
        dir: Option<PathBuf>,
    },

    /// Rename the audio files after the titles in `tags`
    #[command(visible_alias = "r")]
    Rename {
        /// Album directory (defaults to the current directory)
        dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Export,
    Import,
    Rename,
}

impl Cli {
    /// The steps to run, in order, and the directory to run them in.
    pub fn plan(&self, cwd: &Path) -> (Vec<Step>, PathBuf) {
        let or_cwd = |dir: &Option<PathBuf>| dir.clone().unwrap_or_else(|| cwd.to_path_buf());
        match &self.command {
            Some(Commands::Export { dir }) => (vec![Step::Export], or_cwd(dir)),
            Some(Commands::Import { dir }) => (vec![Step::Import], or_cwd(dir)),
            Some(Commands::Rename { dir }) => (vec![Step::Rename], or_cwd(dir)),
            None if tags_file_path(cwd).exists() => {
                (vec![Step::Import, Step::Rename], cwd.to_path_buf())
            }
            None => (vec![Step::Export], cwd.to_path_buf()),
        }
    }
}
