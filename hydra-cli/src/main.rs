//! Hydra CLI: run hydra programs and save the drawing.

use std::fs;
use std::io;
use std::process;

use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

use hydra_core::error::Severity;
use hydra_core::filesystem::FileSystem;
use hydra_core::interpreter::Interpreter;
use hydra_core::program::LineGroup;
use hydra_core::source;
use hydra_core::types::Value;

#[derive(Parser)]
#[command(version, about = "Hydra: a language for drawing in the hyperbolic plane")]
struct Cli {
    /// Program file to run; without it (and without -e) start a REPL
    file: Option<String>,

    /// Run the given source instead of reading a file
    #[arg(short = 'e', long = "eval", value_name = "SOURCE")]
    eval: Option<String>,

    /// Save the drawing after a successful run (.svg or .ipe)
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Number of samples per curve
    #[arg(long, value_name = "N")]
    resolution: Option<f64>,

    /// Seed for `random`, for reproducible drawings
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Log statements, loop iterations and tokens to stderr
    #[arg(long)]
    trace: bool,

    /// Print the value of every top-level statement
    #[arg(long)]
    echo: bool,
}

/// Filesystem that reads and writes relative to the working directory.
struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_file(&self, name: &str) -> Option<String> {
        fs::read_to_string(name).ok()
    }

    fn write_file(&mut self, name: &str, contents: &str) -> Result<(), String> {
        fs::write(name, contents).map_err(|e| e.to_string())
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.trace);

    let mut interp = Interpreter::new();
    interp.set_filesystem(Box::new(OsFileSystem));
    if let Some(seed) = cli.seed {
        interp.set_random_seed(seed);
    }
    if let Some(samples) = cli.resolution {
        if let Err(e) = interp.canvas.set_resolution(samples) {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    }

    let source = match (&cli.eval, &cli.file) {
        (Some(source), _) => source.clone(),
        (None, Some(file)) => match OsFileSystem.read_file(file) {
            Some(source) => source,
            None => {
                eprintln!("Error reading {file}");
                process::exit(1);
            }
        },
        (None, None) => {
            repl(&mut interp);
            return;
        }
    };

    if !run_batch(&mut interp, &source, &cli) {
        process::exit(1);
    }
}

/// Run a whole program. Returns whether it ran (and saved) without error.
fn run_batch(interp: &mut Interpreter, source: &str, cli: &Cli) -> bool {
    let result = interp.run(source);
    print!("{}", interp.take_output());
    print_diagnostics(interp, 0);

    let Ok(values) = result else {
        return false;
    };
    if cli.echo {
        print_values(&values);
    }

    if let Some(ref file) = cli.output {
        if let Err(e) = interp.save(file) {
            eprintln!("Error: {e}");
            return false;
        }
        eprintln!("Wrote {file}");
    }
    true
}

/// Install the stderr log subscriber. `--trace` turns on everything the
/// interpreter reports; otherwise `RUST_LOG` decides, defaulting to warnings.
fn init_tracing(trace: bool) {
    let filter = if trace {
        EnvFilter::new("hydra_core=trace,hydra=debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(Level::WARN.into())
            .from_env_lossy()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .compact()
        .init();
}

/// Read statements interactively until end of input.
///
/// Loops are collected until their closing brace before they run. Errors
/// are reported and the session continues with the state it had.
fn repl(interp: &mut Interpreter) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("Error: cannot start line editor: {err}");
            return;
        }
    };
    let mut group = LineGroup::new();
    let mut reported = 0;

    loop {
        let line = match editor.readline(&prompt(group.depth())) {
            Ok(line) => line,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        };
        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.as_str());
        }

        let line = source::convert_line(&line);
        if let Some(lines) = group.push(interp.system(), &line) {
            debug!(count = lines.len(), "running REPL input");
            let result = interp.run_lines(&lines);
            print!("{}", interp.take_output());
            reported = print_diagnostics(interp, reported);
            if let Ok(values) = result {
                print_values(&values);
            }
        }
    }
    if group.is_pending() {
        eprintln!("Warning: input ended inside an unclosed loop");
    }
}

fn prompt(depth: usize) -> String {
    let marker = if depth == 0 { ">" } else { "." };
    format!("{} ", marker.repeat(depth.max(1)))
}

fn print_values(values: &[Value]) {
    for value in values.iter().filter(|v| !v.is_vacuous()) {
        println!("{value}");
    }
}

/// Print the diagnostics recorded since index `from`; returns the new
/// count.
fn print_diagnostics(interp: &Interpreter, from: usize) -> usize {
    for diagnostic in interp.diagnostics.iter().skip(from) {
        match diagnostic.severity {
            Severity::Info => eprintln!("{}", diagnostic.message),
            Severity::Warning => eprintln!("Warning: {}", diagnostic.message),
            Severity::Error | Severity::Fatal => eprintln!("{diagnostic}"),
        }
    }
    interp.diagnostics.len()
}
