use blockplan::prelude::*;
use clap::{Parser, Subcommand};
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Compile visual command-block programs into nested command trees
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the block catalog as JSON
    Kinds,
    /// Import a canvas document and compile it
    Compile {
        /// Path to the canvas JSON export
        canvas_path: String,
        /// Insert edges without the connection rules, as when restoring stored graphs
        #[arg(long)]
        restore: bool,
        /// Fail when a required block input is unset
        #[arg(long)]
        enforce_required: bool,
        /// Print an indented tree instead of JSON
        #[arg(long)]
        tree: bool,
        /// Also write a binary snapshot of the imported graph
        #[arg(long)]
        snapshot: Option<String>,
    },
    /// Load a binary graph snapshot and compile it
    Inspect {
        /// Path to a snapshot written by `compile --snapshot`
        snapshot_path: String,
        /// Fail when a required block input is unset
        #[arg(long)]
        enforce_required: bool,
        /// Print an indented tree instead of JSON
        #[arg(long)]
        tree: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Kinds => print_json(&list_block_kinds()),
        Command::Compile {
            canvas_path,
            restore,
            enforce_required,
            tree,
            snapshot,
        } => run_compile(&canvas_path, restore, enforce_required, tree, snapshot),
        Command::Inspect {
            snapshot_path,
            enforce_required,
            tree,
        } => run_inspect(&snapshot_path, enforce_required, tree),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_compile(
    canvas_path: &str,
    restore: bool,
    enforce_required: bool,
    tree: bool,
    snapshot_path: Option<String>,
) {
    let start = Instant::now();

    let canvas_json = fs::read_to_string(canvas_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read canvas file '{}': {}",
            canvas_path, e
        ))
    });
    let mode = if restore {
        ImportMode::Restore
    } else {
        ImportMode::Validated
    };
    let imported = CanvasDocument::from_json(&canvas_json)
        .and_then(|document| document.into_graph(mode))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to import canvas: {}", e)));

    if let Some(path) = snapshot_path {
        imported
            .graph
            .snapshot()
            .save(&path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write snapshot: {}", e)));
        tracing::info!(path = %path, "snapshot written");
    }

    let compiler = Compiler::builder()
        .enforce_required_inputs(enforce_required)
        .build();
    let program = compiler
        .compile(&imported.graph)
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", imported.describe(&e))));

    print_program(&program, tree);
    tracing::info!(elapsed = ?start.elapsed(), "done");
}

fn run_inspect(snapshot_path: &str, enforce_required: bool, tree: bool) {
    let snapshot = GraphSnapshot::from_file(snapshot_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load snapshot: {}", e)));
    let graph = ProgramGraph::restore(snapshot)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to restore graph: {}", e)));

    let compiler = Compiler::builder()
        .enforce_required_inputs(enforce_required)
        .build();
    let program = compiler
        .compile(&graph)
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));

    print_program(&program, tree);
}

fn print_program(program: &[CompiledStatement], tree: bool) {
    if tree {
        print!("{}", render_program(program));
    } else {
        print_json(&program);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with_error(&format!("Failed to serialize output: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
