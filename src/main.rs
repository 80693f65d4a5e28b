use std::path::Path;
use std::process;

use clap::Parser;
use utag::cli::commands::{Cli, Step};
use utag::{export, import, rename};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("Cannot determine the current directory: {}", e);
            process::exit(1);
        }
    };

    let (steps, dir) = cli.plan(&cwd);
    for step in steps {
        if let Err(e) = run(step, &dir) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(step: Step, dir: &Path) -> utag::Result<()> {
    match step {
        Step::Export => {
            println!("=== Starting Export ===");
            println!("Album directory: {}", dir.display());

            let report = export(dir)?;
            println!("Exported {} tracks to {}", report.track_count, report.tags_file.display());
            match report.image_file {
                Some(path) => println!("Cover image saved to {}", path.display()),
                None => println!("No cover image saved"),
            }

            println!("=== Export Complete ===");
        }

        Step::Import => {
            println!("=== Starting Import ===");
            println!("Album directory: {}", dir.display());

            let count = import(dir)?;
            println!("Updated tags of {} files", count);

            println!("=== Import Complete ===");
        }

        Step::Rename => {
            println!("=== Starting Rename ===");

            let renamed = rename(dir)?;
            for path in &renamed {
                let name = path.file_name().unwrap_or_default().to_string_lossy();
                println!("  Renamed to: {}", name);
            }
            println!("Renamed {} files", renamed.len());

            println!("=== Rename Complete ===");
        }
    }
    Ok(())
}
