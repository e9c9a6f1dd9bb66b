// goldcheck-cli/src/main.rs
//
// Entry point for the `goldcheck` binary.
//
// Responsibilities:
// - Parsing command-line arguments.
// - Initializing logging.
// - Dispatching to the `compare` or `subtitles` command.
// - Mapping the outcome to the process exit code:
//   0 success, 1 missing input/baseline, 2 checks failed, 3 internal error.

use clap::Parser;
use goldcheck_cli::{Cli, Commands, logging, run_compare, run_subtitles};
use goldcheck_core::{CoreError, HarnessExit};
use std::backtrace::Backtrace;
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Compare(args) => run_compare(args),
        Commands::Subtitles(args) => run_subtitles(args),
    };

    let exit = match result {
        Ok(exit) => exit,
        Err(e) => report_error(&e),
    };
    process::exit(exit.code());
}

fn report_error(e: &CoreError) -> HarnessExit {
    let exit = e.exit_code();
    match exit {
        HarnessExit::InternalError => {
            log::error!("Unexpected error: {e}");
            log::error!("Details: {e:?}");
            log::error!("Backtrace:\n{}", Backtrace::force_capture());
        }
        _ => log::error!("{e}"),
    }
    exit
}
