//! vcs-resolve - map a file, line range, object id or word to a repository URL
//!
//! Prints the URL on stdout. On failure prints a message on stderr, nothing on
//! stdout, and exits with status 1.

use clap::Parser;
use colored::Colorize;
use std::ffi::OsString;
use std::path::PathBuf;

use vcsurl::backends::deliver::{DeliveryOptions, SystemTargets};
use vcsurl::core::logging;
use vcsurl::core::render::RenderConfig;
use vcsurl::flows::resolve::run_resolve;
use vcsurl::resolver::ResolveOptions;

#[derive(Parser, Debug, Default)]
#[command(name = "vcs-resolve", version, about)]
#[command(long_about = r#"Resolve LOCATOR to a URL on the repository's hosting service.

LOCATOR is one of:
- PATH              a file or directory
- PATH:START,END    a line range
- HEX               an object id (6+ hex digits)
- WORD              a search term

Supported hosts: GitHub and Kiln, detected from the `origin` remote.
"#)]
struct Args {
    /// File, directory, PATH:START,END, object id or word.
    #[arg(value_name = "LOCATOR", allow_hyphen_values = true)]
    locator: String,

    /// Repository for object ids and words (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    repo: Option<PathBuf>,

    /// Revision to link to instead of the current branch.
    #[arg(long, value_name = "REV")]
    rev: Option<String>,

    /// Copy the URL to the clipboard.
    #[arg(long)]
    copy: bool,

    /// Open the URL in a browser.
    #[arg(long)]
    open: bool,

    /// Suppress warnings.
    #[arg(short, long)]
    quiet: bool,

    /// Log git invocations on stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// `vcs-resolve LOCATOR` with nothing else takes LOCATOR verbatim, even
    /// when it looks like a flag
    fn from_argv(argv: Vec<OsString>) -> Self {
        match argv.as_slice() {
            [_, locator] => Self {
                locator: locator.to_string_lossy().into_owned(),
                ..Self::default()
            },
            _ => Self::parse_from(argv),
        }
    }
}

fn main() {
    let args = Args::from_argv(std::env::args_os().collect());
    logging::init(args.quiet, args.verbose);

    let delivery = DeliveryOptions {
        copy: args.copy,
        open: args.open,
    };
    let helpers = SystemTargets::detect(delivery);

    let options = ResolveOptions {
        base: None,
        repo: args.repo,
        rev: args.rev,
    };

    if let Err(e) = run_resolve(
        &args.locator,
        &options,
        delivery,
        helpers.targets(),
        RenderConfig::default(),
        args.quiet,
    ) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
