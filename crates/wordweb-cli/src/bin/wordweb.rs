//! Word Web command-line tool.

use std::{io, process::ExitCode};

use clap::Parser as _;
use wordweb_cli::Args;
use wordweb_levels::FileStorage;

fn main() -> ExitCode {
    better_panic::install();
    env_logger::init();

    let args = Args::parse();
    log::debug!("using data directory {}", args.data_dir.display());

    let storage = FileStorage::new(args.data_dir);
    match wordweb_cli::run(args.command, storage, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
