//! Graph-to-source compilation.
//!
//! [`Compiler`] drives one walk per entry point through a [`Walker`], which handles
//! traversal and cycle detection and hands every step to the selected
//! [`Backend`](crate::backend::Backend) for emission.

mod assembler;
mod code;
mod walker;

pub use assembler::CaseSummary;
pub use code::{Code, INDENT, indentation};
pub use walker::{Diagnostic, DiagnosticKind, EmitContext, Scope, Trail, Walker};

use crate::backend::BackendChoice;
use crate::error::CompileError;
use crate::graph::{EntryStep, Graph, Node};
use crate::traversal::Traversal;
use ahash::{AHashMap, AHashSet};
use assembler::CaseEntry;
use tracing::{info, warn};

pub const DEFAULT_SUITE_NAME: &str = "Generated Suite";

/// Output of [`Compiler::compile`]: one source file holding every test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSuite {
    pub backend: BackendChoice,
    /// Suggested file name, e.g. `test_generated_suite.py`.
    pub file_name: String,
    pub source: String,
    pub cases: Vec<CaseSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledSuite {
    /// True when no step had to be degraded to a comment.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// One file of [`Compiler::compile_files`], holding a single test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub filename: String,
    pub content: String,
    pub backend: BackendChoice,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Compiler {
    graph: Graph,
    backend: BackendChoice,
    suite_name: String,
}

pub struct CompilerBuilder {
    graph: Graph,
    backend: BackendChoice,
    suite_name: String,
}

impl CompilerBuilder {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            backend: BackendChoice::default(),
            suite_name: DEFAULT_SUITE_NAME.to_string(),
        }
    }

    /// Selects the output format. Defaults to [`BackendChoice::Selenium`].
    pub fn backend(mut self, backend: BackendChoice) -> Self {
        self.backend = backend;
        self
    }

    /// Names the generated suite (test class or `describe` block, and the file name).
    pub fn suite_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.suite_name = name.trim().to_string();
        }
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            graph: self.graph,
            backend: self.backend,
            suite_name: self.suite_name,
        }
    }
}

impl Compiler {
    pub fn builder(graph: Graph) -> CompilerBuilder {
        CompilerBuilder::new(graph)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn backend(&self) -> BackendChoice {
        self.backend
    }

    /// Compiles every entry point into one suite for the selected backend.
    pub fn compile(&self) -> Result<CompiledSuite, CompileError> {
        let entries = self.entries()?;
        let backend = self.backend.profile();
        info!(
            suite = %self.suite_name,
            backend = %self.backend,
            cases = entries.len(),
            "compiling suite"
        );

        let assembly = assembler::assemble(
            Traversal::new(&self.graph),
            backend,
            &self.suite_name,
            &entries,
        );
        Ok(CompiledSuite {
            backend: self.backend,
            file_name: backend.file_name(&self.suite_name),
            source: assembly.source,
            cases: assembly.cases,
            diagnostics: assembly.diagnostics,
        })
    }

    /// Compiles each entry point into its own file.
    ///
    /// An entry's `framework` field overrides the selected backend for that file; an
    /// unknown framework falls back to the selected backend.
    ///
    /// Files and the case inside them are named after the entry's `testName`, or
    /// `"<suite> <index>"` for an unnamed entry.
    pub fn compile_files(&self) -> Result<Vec<GeneratedFile>, CompileError> {
        let entries = self.entries()?;
        let mut taken: AHashMap<BackendChoice, AHashSet<String>> = AHashMap::new();
        let mut files = Vec::with_capacity(entries.len());

        for CaseEntry { index, node: entry, .. } in entries {
            let step = EntryStep::from_node(entry);
            let choice = self.backend_for(entry, &step);
            let backend = choice.profile();
            let title = step
                .test_name
                .unwrap_or_else(|| format!("{} {}", self.suite_name, index));
            let stem = assembler::unique(
                backend.test_name(Some(&title), index),
                taken.entry(choice).or_default(),
            );
            let filename = backend.file_name(&stem);
            info!(file = %filename, backend = %choice, entry = %entry.id, "compiling file");

            let assembly = assembler::assemble(
                Traversal::new(&self.graph),
                backend,
                &title,
                &[CaseEntry {
                    index,
                    node: entry,
                    title: Some(title.clone()),
                }],
            );
            files.push(GeneratedFile {
                filename,
                content: assembly.source,
                backend: choice,
                diagnostics: assembly.diagnostics,
            });
        }
        Ok(files)
    }

    /// Entry points with their 1-based positions.
    fn entries(&self) -> Result<Vec<CaseEntry<'_>>, CompileError> {
        let entries: Vec<_> = self
            .graph
            .entry_points()
            .enumerate()
            .map(|(i, node)| CaseEntry {
                index: i + 1,
                node,
                title: None,
            })
            .collect();
        if entries.is_empty() {
            warn!(nodes = self.graph.nodes.len(), "graph has no entry point");
            return Err(CompileError::NoEntryPoint);
        }
        Ok(entries)
    }

    fn backend_for(&self, entry: &Node, step: &EntryStep) -> BackendChoice {
        match step.framework.as_deref().map(str::parse::<BackendChoice>) {
            None => self.backend,
            Some(Ok(choice)) => choice,
            Some(Err(err)) => {
                warn!(entry = %entry.id, error = %err, fallback = %self.backend, "ignoring entry framework");
                self.backend
            }
        }
    }
}
