//! vcsurl - editor-side client for `vcs-resolve`

use clap::Parser;
use colored::Colorize;

use vcsurl::cli::{self, Cli};
use vcsurl::core::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.quiet, cli.verbose);

    if let Err(e) = cli::run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
