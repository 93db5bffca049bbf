mod build;
mod commands;
mod core;
mod metadata;
mod release;

use clap::{Parser, Subcommand};
use crate::core::error::{ResultExt, SetupError, print_error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate versioned package metadata and drive the package build tool
#[derive(Parser)]
#[command(name = "dill-setup")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Project root (defaults to the current directory)
  #[arg(long, global = true, value_name = "DIR")]
  root: Option<PathBuf>,

  /// Enable debug logging on stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Regenerate metadata, then hand the build parameters to the build tool
  Build {
    /// Print the build parameters as JSON instead of writing or building anything
    #[arg(long)]
    dry_run: bool,
    /// Arguments passed through to the build tool (e.g. `-- sdist`)
    #[arg(last = true)]
    tool_args: Vec<String>,
  },

  /// Regenerate the description file and the info module only
  Generate,

  /// Print the version this build would use
  Version {
    /// Output the full release state in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_tracing(verbose: bool) {
  // RUST_LOG wins over --verbose
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .without_time()
    .with_writer(std::io::stderr)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let root = match cli.root {
    Some(root) => root,
    None => match std::env::current_dir().context("Failed to get current directory") {
      Ok(dir) => dir,
      Err(e) => handle_error(e),
    },
  };

  // Built once; every command reads configuration from here
  let ctx = match crate::core::context::SetupContext::build(&root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Build { dry_run, tool_args } => commands::run_build(&ctx, dry_run, tool_args),
    Commands::Generate => commands::run_generate(&ctx),
    Commands::Version { json } => commands::run_version(&ctx, json),
  };

  if let Err(e) = result {
    handle_error(e);
  }
}

fn handle_error(err: SetupError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
