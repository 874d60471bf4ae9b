use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pybreakpoints::{
    Buffer,
    Config,
    Outcome,
    Preferences,
    Selection,
    Settings,
    Style,
    clear_all,
    goto_items,
    io::{clear_file, load_buffer, toggle_file},
    toggle,
};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Toggle debugger breakpoints in Python sources")]
struct Cli {
    /// Plugin settings file (JSON)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Editor preferences file (JSON) supplying the fallback tab size
    #[arg(long, global = true)]
    preferences: Option<PathBuf>,
    /// Columns per indent stop, overriding the settings file
    #[arg(long = "tab-size", global = true, value_parser = clap::value_parser!(u16).range(1..))]
    tab_size: Option<u16>,
    /// Breakpoint statement style
    #[arg(long, global = true, value_enum)]
    style: Option<Style>,
    /// Debugger module imported by classic breakpoints
    #[arg(long, global = true)]
    debugger: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Insert or remove a breakpoint, or wrap a line range in a guard
    Toggle {
        /// Python file; standard input when omitted
        file: Option<PathBuf>,
        /// 1-based line of the cursor or first selected line
        #[arg(long, value_parser = parse_row)]
        line: usize,
        /// 1-based last selected line; wraps the range in a guard
        #[arg(long = "end-line", value_parser = parse_row)]
        end_line: Option<usize>,
        /// Rewrite the file in place
        #[arg(long = "in-place", requires = "file")]
        in_place: bool,
    },
    /// List breakpoints with the code that follows them
    List {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Remove every breakpoint
    Clear {
        /// Python files; standard input when omitted
        files: Vec<PathBuf>,
        /// Rewrite files in place
        #[arg(long = "in-place", requires = "files")]
        in_place: bool,
    },
    /// Print the highlight regions restored when a file is loaded
    Highlights { file: PathBuf },
}

/// Parse a 1-based line number into a zero-based row.
fn parse_row(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("line numbers start at 1".into()),
        Ok(n) => Ok(n - 1),
        Err(e) => Err(e.to_string()),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let prefs = match &cli.preferences {
        Some(path) => Preferences::load(path)
            .with_context(|| format!("loading preferences from {}", path.display()))?,
        None => Preferences::default(),
    };
    let resolved = settings.resolve(&prefs);
    Ok(Config {
        tab_size: cli.tab_size.map_or(resolved.tab_size, usize::from),
        style: cli.style.unwrap_or(resolved.style),
        debugger: cli.debugger.clone().unwrap_or(resolved.debugger),
        ..resolved
    })
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("reading standard input")?;
    Ok(input)
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Inserted { uid, cursor } => format!("inserted {uid} at {cursor}"),
        Outcome::Wrapped { uid, cursor } => format!("wrapped with {uid} at {cursor}"),
        Outcome::Removed { uid } => format!("removed {uid}"),
        Outcome::Unchanged => "unchanged".into(),
    }
}

fn run_toggle(
    file: Option<&Path>,
    selection: Selection,
    in_place: bool,
    config: &Config,
) -> Result<()> {
    let Some(path) = file else {
        let mut buffer = Buffer::new(read_stdin()?);
        let outcome = toggle(&mut buffer, selection, config)?;
        eprintln!("{}", describe(&outcome));
        print!("{}", buffer.text());
        return Ok(());
    };
    let write = in_place || config.save_on_toggle;
    let (outcome, text) = toggle_file(path, selection, config, write)
        .with_context(|| format!("toggling breakpoint in {}", path.display()))?;
    if write {
        println!("{}: {}", path.display(), describe(&outcome));
    } else {
        eprintln!("{}", describe(&outcome));
        print!("{text}");
    }
    Ok(())
}

fn run_list(files: &[PathBuf], config: &Config) -> Result<()> {
    for path in files {
        let Some(buffer) =
            load_buffer(path, config).with_context(|| format!("reading {}", path.display()))?
        else {
            continue;
        };
        for item in goto_items(&buffer) {
            println!("{}:", path.display());
            for line in &item.lines {
                println!("  {line}");
            }
        }
    }
    Ok(())
}

fn run_clear(files: &[PathBuf], in_place: bool, config: &Config) -> Result<()> {
    if files.is_empty() {
        let mut buffer = Buffer::new(read_stdin()?);
        clear_all(&mut buffer, config)?;
        print!("{}", buffer.text());
        return Ok(());
    }

    let results: Vec<_> = files
        .par_iter()
        .map(|path| clear_file(path, config, in_place))
        .collect();
    let mut failed = 0;
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok((removed, _)) if in_place => println!("{}: removed {removed}", path.display()),
            Ok((_, text)) => print!("{text}"),
            Err(err) => {
                eprintln!("{}: {err}", path.display());
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} files could not be cleared", files.len());
    }
    Ok(())
}

fn run_highlights(path: &Path, config: &Config) -> Result<()> {
    let Some(buffer) =
        load_buffer(path, config).with_context(|| format!("reading {}", path.display()))?
    else {
        return Ok(());
    };
    for (id, hl) in buffer.regions() {
        println!(
            "{id} {} {} {} {}",
            hl.region.start,
            hl.region.end,
            hl.scope,
            hl.icon.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

/// Entry point for the `pybreakpoints` command-line tool.
///
/// # Examples
///
/// ```sh
/// # Toggle a breakpoint above line 12 and print the result
/// pybreakpoints toggle app.py --line 12
///
/// # Wrap lines 10 to 14 in a guard, editing the file
/// pybreakpoints toggle app.py --line 10 --end-line 14 --in-place
///
/// # Remove every breakpoint from several files
/// pybreakpoints clear --in-place src/*.py
/// ```
fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Toggle {
            file,
            line,
            end_line,
            in_place,
        } => {
            let selection = match end_line {
                Some(end) => Selection::Lines {
                    first: *line,
                    last: *end,
                },
                None => Selection::Cursor(*line),
            };
            run_toggle(file.as_deref(), selection, *in_place, &config)
        }
        Command::List { files } => run_list(files, &config),
        Command::Clear { files, in_place } => run_clear(files, *in_place, &config),
        Command::Highlights { file } => run_highlights(file, &config),
    }
}
