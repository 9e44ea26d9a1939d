//! # Testloom - Browser Test Graph Compiler
//!
//! **Testloom** compiles a visual browser-test flow, a directed graph of typed steps, into
//! runnable test source code. The same graph can target a Python Selenium `unittest` suite
//! or a JavaScript Cypress spec.
//!
//! ## Core Workflow
//!
//! The compiler is format-agnostic. It operates on a canonical [`Graph`](graph::Graph) of
//! steps and connections. The primary workflow is:
//!
//! 1.  **Load Your Flow**: Parse the editor's export with [`EditorFlow`](editor::EditorFlow), read a canonical graph with `Graph::from_json`, or build one in code.
//! 2.  **Convert to Testloom's Model**: Implement the `IntoGraph` trait for any other format to translate it into a `Graph`.
//! 3.  **Compile**: Use `Compiler::builder` to pick a backend and suite name, then `compile()` for one suite file or `compile_files()` for one file per test case.
//!
//! Each `EntryPoint` step roots one test case. Steps that cannot be compiled as wired
//! (a missing element connection, a construct the backend lacks) degrade to comments and
//! are reported as [`Diagnostic`](compiler::Diagnostic)s. Only a graph without any entry
//! point fails to compile.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use testloom::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // Start a session, then click the element with id "go".
//!     let graph = Graph {
//!         nodes: vec![
//!             Node::new("start", NodeKind::EntryPoint)
//!                 .with("testName", "Login")
//!                 .with("url", "https://example.com/login"),
//!             Node::new("button", NodeKind::ElementDescriptor)
//!                 .with("selectorType", "ID")
//!                 .with("selectorValue", "go"),
//!             Node::new("click", NodeKind::Interact).with("action", "Click"),
//!         ],
//!         edges: vec![
//!             Edge::flow("e1", "start", "click"),
//!             Edge::data("e2", "button", "click"),
//!         ],
//!     };
//!
//!     let compiler = Compiler::builder(graph)
//!         .backend(BackendChoice::Cypress)
//!         .suite_name("Smoke Tests")
//!         .build();
//!
//!     let suite = compiler.compile()?;
//!     println!("// {}", suite.file_name);
//!     println!("{}", suite.source);
//!     for diagnostic in &suite.diagnostics {
//!         eprintln!("{}", diagnostic);
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod compiler;
pub mod editor;
pub mod error;
pub mod expression;
pub mod graph;
pub mod prelude;
pub mod selector;
pub mod traversal;
