//! CLI module - Command-line interface definitions and handlers

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::backends::deliver::{DeliveryOptions, SystemTargets};
use crate::backends::invoke::{Capture, ExternalResolver, DEFAULT_RESOLVER};
use crate::core::model::{ResultItem, ResultSet};
use crate::core::paths::absolutize;
use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::locator::commands::{lookup, COMMANDS};
use crate::locator::context::{Action, EditingContext, Position, Selection};
use crate::resolver::ResolveOptions;

/// vcsurl - turn the file, region or word you are editing into a repository URL.
#[derive(Parser, Debug)]
#[command(name = "vcsurl")]
#[command(
    author,
    version,
    about,
    long_about = r#"vcsurl builds a locator from explicit editing context, hands it to a
resolver program as one argument, and takes the first token the resolver prints
as the URL.

The URL is printed to stdout (default format: raw). With --copy it is placed on
the clipboard, with --open it is opened in a browser.

Locators passed to the resolver:
- /path/to/file            a file
- /path/to/dir             a directory
- /path/to/file:10,15      lines 10 through 15
- deadbeef                 an object id (6+ hex digits)
- anything else            a word to search for

Examples:
    vcsurl buffer --file src/main.rs --copy
    vcsurl region --file src/main.rs --from 10 --to 16
    vcsurl point --file src/main.rs --token 3f9a2c1
    vcsurl run vcs-url-dwim --file src/main.rs --from 4:2 --to 9:0
    vcsurl resolve src/main.rs:10,15
"#
)]
pub struct Cli {
    /// Resolver program to run.
    #[arg(
        long,
        global = true,
        env = "VCSURL_RESOLVER",
        default_value = DEFAULT_RESOLVER,
        value_name = "PROGRAM",
        long_help = "Resolver program to run for client actions.\n\n\
It is looked up on PATH, receives the locator as its last argument and must print\n\
the URL as the first token of its stdout."
    )]
    pub resolver: String,

    /// Extra argument placed before the locator (repeatable).
    #[arg(
        long = "resolver-arg",
        global = true,
        value_name = "ARG",
        allow_hyphen_values = true,
        long_help = "Fixed argument passed to the resolver before the locator. Repeat for\n\
several arguments.\n\n\
Example: --resolver python3 --resolver-arg ~/bin/vcs-resolve.py"
    )]
    pub resolver_args: Vec<String>,

    /// Read the URL from stdout and stderr combined.
    #[arg(long, global = true)]
    pub combined_output: bool,

    /// Accept resolver output even when it exits non-zero.
    #[arg(
        long,
        global = true,
        long_help = "Ignore the resolver's exit status and only look at its output.\n\
Empty output is still an error."
    )]
    pub no_check_status: bool,

    /// Copy the URL to the clipboard.
    #[arg(
        long,
        global = true,
        long_help = "Copy the URL to the clipboard using wl-copy, xclip, xsel or pbcopy.\n\n\
Set VCSURL_CLIPBOARD to a command line to use a different helper."
    )]
    pub copy: bool,

    /// Open the URL in a browser.
    #[arg(
        long,
        global = true,
        long_help = "Open the URL using xdg-open or open.\n\n\
Set VCSURL_BROWSER to use a different program."
    )]
    pub open: bool,

    /// Output format (raw/jsonl/json/md).
    #[arg(
        long,
        global = true,
        default_value = "raw",
        value_name = "FORMAT",
        value_parser = ["raw", "jsonl", "json", "md", "markdown"],
        long_help = "Select the output format.\n\n\
Supported values:\n\
- raw (default): the URL alone, for editor hosts\n\
- jsonl\n\
- json\n\
- md (markdown)"
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output (when applicable).
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Suppress status lines and warnings on stderr. Results are still\n\
printed to stdout."
    )]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log resolver invocations and repository inspection on stderr.\n\
VCSURL_LOG takes a tracing filter directive and overrides this flag."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Editing context shared by the actions
#[derive(Args, Debug, Default, Clone)]
pub struct ContextArgs {
    /// File backing the current buffer.
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Buffer directory (defaults to the file's directory, else the current directory).
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Token under the cursor.
    #[arg(long, value_name = "TOKEN", allow_hyphen_values = true)]
    pub token: Option<String>,

    /// Directory-listing entry under the cursor.
    #[arg(long, value_name = "NAME")]
    pub entry: Option<String>,

    /// Selection start (LINE or LINE:COLUMN, lines from 1, columns from 0).
    #[arg(long, value_name = "POS", requires = "to")]
    pub from: Option<Position>,

    /// Selection end, exclusive (LINE or LINE:COLUMN).
    #[arg(long, value_name = "POS", requires = "from")]
    pub to: Option<Position>,
}

impl ContextArgs {
    /// Build the editing context, resolving relative paths against `cwd`
    pub fn editing_context(&self, cwd: &Path) -> Result<EditingContext> {
        let mut ctx = match &self.file {
            Some(file) => EditingContext::for_file(absolutize(file, cwd)),
            None => EditingContext::for_directory(cwd),
        };
        if let Some(dir) = &self.dir {
            ctx.directory = absolutize(dir, cwd);
        }
        if let Some(token) = &self.token {
            ctx = ctx.with_token(token.clone());
        }
        if let Some(entry) = &self.entry {
            ctx = ctx.with_listing_entry(entry.clone());
        }
        match (self.from, self.to) {
            (Some(from), Some(to)) => Ok(ctx.with_selection(Selection::new(from, to))),
            (None, None) => Ok(ctx),
            _ => bail!("--from and --to must be given together"),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// URL of the current file, or of its directory.
    #[command(
        long_about = "Resolve the file backing the buffer. Without --file the buffer directory\n\
(--dir, else the current directory) is resolved instead.\n\n\
Examples:\n\
  vcsurl buffer --file src/lib.rs\n\
  vcsurl buffer --dir docs\n"
    )]
    Buffer {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// URL of a selected line range.
    #[command(
        long_about = "Resolve the selection as a line range. The end position is exclusive:\n\
a selection ending at column 0 of line 16 covers lines up to 15. Without a\n\
selection the whole file is resolved; without a file the action fails.\n\n\
Example:\n\
  vcsurl region --file src/lib.rs --from 10 --to 16\n"
    )]
    Region {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// URL of the object id or listing entry at point, else of the file.
    #[command(
        long_about = "Classify the context at point:\n\
1) a directory-listing entry (--entry) resolves to that entry\n\
2) a token of six or more hex digits (--token) resolves as an object id\n\
3) otherwise the buffer is resolved as with `buffer`\n\n\
Examples:\n\
  vcsurl point --file src/lib.rs --token 3f9a2c1\n\
  vcsurl point --dir src --entry backends\n"
    )]
    Point {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Region URL when a selection is given, point URL otherwise.
    #[command(
        long_about = "Dispatch on the selection: with --from/--to behave as `region`,\n\
otherwise as `point`.\n\n\
Example:\n\
  vcsurl dwim --file src/lib.rs --token deadbeef --from 3 --to 5\n"
    )]
    Dwim {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Search URL for a word.
    #[command(
        long_about = "Pass TEXT to the resolver verbatim as a word to search for.\n\n\
Example:\n\
  vcsurl word parse_origin\n"
    )]
    Word {
        /// Word at point.
        #[arg(value_name = "TEXT", allow_hyphen_values = true)]
        text: String,
    },

    /// Run an action by its command name.
    #[command(
        long_about = "Run the action bound to a command name from `vcsurl commands`.\n\
This is the entry point for editor key bindings.\n\n\
Example:\n\
  vcsurl run vcs-url-dwim --file src/lib.rs --token deadbeef\n"
    )]
    Run {
        /// Command name (see `vcsurl commands`).
        #[arg(value_name = "NAME")]
        name: String,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Resolve a locator with the built-in resolver.
    #[command(
        long_about = "Map a locator to a URL on the repository's hosting service without\n\
running an external resolver. Works for git working copies whose origin remote\n\
is on GitHub or Kiln. Same behavior as the `vcs-resolve` binary.\n\n\
Examples:\n\
  vcsurl resolve src/lib.rs:10,15\n\
  vcsurl resolve 3f9a2c1 --repo ~/src/project\n"
    )]
    Resolve {
        /// Locator: PATH, PATH:START,END, an object id, or a word.
        #[arg(value_name = "LOCATOR", allow_hyphen_values = true)]
        locator: String,

        /// Repository for object ids and words (defaults to the current directory).
        #[arg(long, value_name = "DIR")]
        repo: Option<PathBuf>,

        /// Revision to link to instead of the current branch.
        #[arg(long, value_name = "REV")]
        rev: Option<String>,
    },

    /// List the command names an editor can bind.
    Commands,

    /// Check external dependencies and system status.
    #[command(
        long_about = "Check whether the resolver, git, a clipboard helper and a browser opener\n\
are installed and discoverable.\n\n\
Example:\n\
  vcsurl doctor\n"
    )]
    Doctor,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);
    let delivery = DeliveryOptions {
        copy: cli.copy,
        open: cli.open,
    };

    let resolver = ExternalResolver::new(&cli.resolver)
        .with_leading_args(cli.resolver_args.clone())
        .with_capture(if cli.combined_output {
            Capture::Combined
        } else {
            Capture::Stdout
        })
        .with_check_status(!cli.no_check_status);

    let cwd = std::env::current_dir().context("cannot read the current directory")?;

    let (action, ctx) = match cli.command {
        Commands::Buffer { context } => (Action::Buffer, context.editing_context(&cwd)?),
        Commands::Region { context } => (Action::Region, context.editing_context(&cwd)?),
        Commands::Point { context } => (Action::Point, context.editing_context(&cwd)?),
        Commands::Dwim { context } => (Action::RegionOrPoint, context.editing_context(&cwd)?),
        Commands::Word { text } => (
            Action::Word,
            EditingContext::for_directory(cwd.clone()).with_token(text),
        ),
        Commands::Run { name, context } => (lookup(&name)?.action, context.editing_context(&cwd)?),

        Commands::Resolve { locator, repo, rev } => {
            let options = ResolveOptions {
                base: Some(cwd),
                repo,
                rev,
            };
            let helpers = SystemTargets::detect(delivery);
            return crate::flows::resolve::run_resolve(
                &locator,
                &options,
                delivery,
                helpers.targets(),
                render_config,
                cli.quiet,
            );
        }

        Commands::Commands => return run_commands(render_config),

        Commands::Doctor => return crate::backends::doctor::run_doctor(&cli.resolver, render_config),
    };

    let helpers = SystemTargets::detect(delivery);
    crate::flows::action::run_action(
        action,
        &ctx,
        &resolver,
        delivery,
        helpers.targets(),
        render_config,
        cli.quiet,
    )
}

/// List the command table
fn run_commands(config: RenderConfig) -> Result<()> {
    let result_set: ResultSet = COMMANDS
        .iter()
        .map(|c| ResultItem::command(c.name, c.description))
        .collect();
    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;
    Ok(())
}
