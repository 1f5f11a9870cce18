use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use wraptab::config;
use wraptab::error::{Result, WraptabError};
use wraptab::layout::{self, Layout};
use wraptab::model::UserWidths;
use wraptab::parse::parse_table;
use wraptab::wrap::WrapOpts;
use wraptab::{plan_and_fill, RunOptions};

/// Plans column widths and renders delimited text into a minimum-height
/// fixed-width table.
#[derive(Parser, Debug)]
#[command(name = "wraptab")]
#[command(about = "Render delimited text as a word-wrapped, fixed-width table", long_about = None)]
struct Args {
    /// Comma-separated column widths; use `-` for a column the planner
    /// should size automatically. Defaults to all columns unset.
    #[arg(short = 'W', long, value_name = "LIST")]
    widths: Option<String>,

    /// Total display width the rendered table must fit into. Defaults to
    /// the detected terminal width, or 80 when not running in a terminal.
    #[arg(short = 'T', long, value_name = "N")]
    table_width: Option<usize>,

    /// Table layout to render.
    #[arg(short = 'L', long, default_value_t = config::DEFAULT_LAYOUT)]
    layout: Layout,

    /// Treat an over-width line at final widths as an error instead of a
    /// warning.
    #[arg(short = 'S', long)]
    strict: bool,

    /// Single-character field delimiter.
    #[arg(short = 'd', long, default_value_t = config::DEFAULT_DELIMITER as char)]
    delimiter: char,

    /// Allow the wrapper to split a word too long to fit a column.
    #[arg(short = 'b', long = "break-long-words", overrides_with = "no_break_long_words")]
    break_long_words: bool,

    /// Never split a word even if it overflows its column (the `--strict`
    /// check will then catch it).
    #[arg(long = "no-break-long-words", overrides_with = "break_long_words")]
    no_break_long_words: bool,

    /// Use the reference brute-force decision rule instead of the
    /// bisection-accelerated one. Produces identical output; exists for
    /// debugging and the brute/bisect equivalence property tests.
    #[arg(long)]
    brute: bool,

    /// Increase log verbosity (repeatable).
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Input file; `-` or omitted means standard input.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

impl Args {
    fn break_long_words(&self) -> bool {
        if self.no_break_long_words {
            false
        } else if self.break_long_words {
            true
        } else {
            config::DEFAULT_BREAK_LONG_WORDS
        }
    }

    fn delimiter_byte(&self) -> Result<u8> {
        let mut buf = [0u8; 4];
        let encoded = self.delimiter.encode_utf8(&mut buf);
        if encoded.len() != 1 {
            return Err(WraptabError::Argument(format!(
                "delimiter must be a single ASCII byte, got {:?}",
                self.delimiter
            )));
        }
        Ok(buf[0])
    }
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn resolve_table_width(requested: Option<usize>) -> Result<usize> {
    match requested {
        Some(w) if w == 0 => Err(WraptabError::Argument(
            "--table-width must be positive".to_string(),
        )),
        Some(w) => Ok(w),
        None => Ok(terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(config::DEFAULT_TABLE_WIDTH)),
    }
}

fn read_input(file: &Option<PathBuf>) -> Result<String> {
    match file {
        None => wraptab::parse::read_all(io::stdin()),
        Some(p) if p.as_os_str() == "-" => wraptab::parse::read_all(io::stdin()),
        Some(p) => Ok(fs::read_to_string(p)?),
    }
}

fn run(args: Args) -> Result<()> {
    init_logging(args.verbose);
    log::debug!("starting with args: {args:?}");

    let delimiter = args.delimiter_byte()?;
    let table_width = resolve_table_width(args.table_width)?;
    let input = read_input(&args.file)?;
    let table = parse_table(&input, delimiter)?;
    log::debug!(
        "parsed {} rows x {} columns",
        table.n_rows(),
        table.n_cols()
    );

    let user_widths = match &args.widths {
        Some(spec) => UserWidths::parse(spec, table.n_cols())?,
        None => UserWidths::all_unset(table.n_cols()),
    };

    let wrap_opts = WrapOpts {
        break_long_words: args.break_long_words(),
        ..WrapOpts::default()
    };

    let run_opts = RunOptions {
        table_width,
        layout: args.layout,
        strict: args.strict,
        wrap_opts,
        brute: args.brute,
    };

    log::trace!("entering plan_and_fill");
    let planned = plan_and_fill(&table, &user_widths, &run_opts)?;
    log::trace!("leaving plan_and_fill, widths = {:?}", planned.widths);

    let rendered = layout::render(args.layout, &planned.filled);
    let mut stdout = io::stdout();
    if let Err(e) = stdout.write_all(rendered.as_bytes()) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(WraptabError::Input(e));
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
