//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the testloom crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use testloom::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! // Load an editor export and compile it for Selenium
//! let json = std::fs::read_to_string("path/to/flow.json")?;
//! let graph = EditorFlow::from_json(&json)?.into_graph()?;
//!
//! let suite = Compiler::builder(graph).build().compile()?;
//! std::fs::write(&suite.file_name, &suite.source)?;
//! # Ok(())
//! # }
//! ```

// Compilation
pub use crate::compiler::{CompiledSuite, Compiler, CompilerBuilder, Diagnostic, DiagnosticKind, GeneratedFile};

// Backends
pub use crate::backend::{Backend, BackendChoice};

// Graph model and import
pub use crate::editor::EditorFlow;
pub use crate::graph::{Edge, Graph, IntoGraph, Node, NodeKind, SourceRole, TargetRole};

// Error types
pub use crate::error::{CompileError, GraphError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
