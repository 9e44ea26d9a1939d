use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use testloom::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// CLI-side mirror of the backend choice for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendCli {
    Selenium,
    Cypress,
}

impl From<BackendCli> for BackendChoice {
    fn from(value: BackendCli) -> Self {
        match value {
            BackendCli::Selenium => BackendChoice::Selenium,
            BackendCli::Cypress => BackendChoice::Cypress,
        }
    }
}

/// Input document shape.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormat {
    /// The visual editor's export (`type`, `source`, `sourceHandle`, ...)
    Editor,
    /// The canonical graph (`kind`, `sourceNodeId`, `sourceRole`, ...)
    Canonical,
}

/// Compiles a browser test flow into a Selenium or Cypress test suite
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the flow JSON file
    graph_path: PathBuf,

    /// The output format to generate
    #[arg(short, long, value_enum, default_value = "selenium")]
    backend: BackendCli,

    /// Shape of the input document
    #[arg(short, long, value_enum, default_value = "editor")]
    format: InputFormat,

    /// Name of the generated suite
    #[arg(short = 'n', long)]
    suite_name: Option<String>,

    /// Write one file per test case, honouring each entry's framework field
    #[arg(short, long)]
    split: bool,

    /// Directory to write generated files into (stdout when omitted)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let started = Instant::now();
    let graph = load_graph(&cli.graph_path, cli.format);
    info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        path = %cli.graph_path.display(),
        "loaded graph"
    );

    let mut builder = Compiler::builder(graph).backend(cli.backend.into());
    if let Some(name) = &cli.suite_name {
        builder = builder.suite_name(name);
    }
    let compiler = builder.build();

    if cli.split {
        let files = compiler
            .compile_files()
            .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));
        let diagnostics: usize = files.iter().map(|f| f.diagnostics.len()).sum();
        for file in &files {
            emit(cli.out_dir.as_deref(), &file.filename, &file.content, true);
        }
        info!(files = files.len(), diagnostics, elapsed = ?started.elapsed(), "done");
    } else {
        let suite = compiler
            .compile()
            .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));
        for case in &suite.cases {
            debug!(case = %case.name, steps = case.steps, diagnostics = case.diagnostics, "case compiled");
        }
        emit(cli.out_dir.as_deref(), &suite.file_name, &suite.source, false);
        info!(
            cases = suite.cases.len(),
            diagnostics = suite.diagnostics.len(),
            elapsed = ?started.elapsed(),
            "done"
        );
    }
}

fn load_graph(path: &Path, format: InputFormat) -> Graph {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read flow file '{}': {}", path.display(), e))
    });
    let parsed = match format {
        InputFormat::Editor => EditorFlow::from_json(&json).and_then(IntoGraph::into_graph),
        InputFormat::Canonical => Graph::from_json(&json),
    };
    parsed.unwrap_or_else(|e| exit_with_error(&format!("Failed to load flow: {}", e)))
}

/// Writes into `out_dir`, or prints to stdout with an optional file banner.
fn emit(out_dir: Option<&Path>, filename: &str, content: &str, banner: bool) {
    match out_dir {
        Some(dir) => {
            fs::create_dir_all(dir).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to create '{}': {}", dir.display(), e))
            });
            let path = dir.join(filename);
            fs::write(&path, content).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path.display(), e))
            });
            info!(path = %path.display(), "wrote file");
        }
        None => {
            if banner {
                println!("---- {} ----", filename);
            }
            print!("{}", content);
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
