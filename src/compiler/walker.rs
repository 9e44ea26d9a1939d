use super::code::{Code, indentation};
use crate::backend::Backend;
use crate::expression::{ValueForm, ValueSyntax};
use crate::graph::{ElementStep, Node, SourceRole, Step};
use crate::traversal::Traversal;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// An immutable, structurally shared set of visited node ids.
///
/// Extending a trail never changes it: [`Trail::with`] returns a new trail that shares
/// its tail with the old one, so every recursive call owns its own view of the path.
#[derive(Clone, Default)]
pub struct Trail<'a>(Option<Rc<Link<'a>>>);

struct Link<'a> {
    id: &'a str,
    next: Trail<'a>,
}

impl<'a> Trail<'a> {
    pub fn new() -> Self {
        Self(None)
    }

    pub fn with(&self, id: &'a str) -> Self {
        Self(Some(Rc::new(Link {
            id,
            next: self.clone(),
        })))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.iter().any(|visited| visited == id)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        let mut cursor = self.0.as_deref();
        std::iter::from_fn(move || {
            let link = cursor?;
            cursor = link.next.0.as_deref();
            Some(link.id)
        })
    }
}

impl fmt::Debug for Trail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Cycle-detection state threaded through one recursive walk.
///
/// `visited` holds the nodes on the current path. `loops` holds the Repeat nodes whose
/// bodies enclose the current position; a body starts with an empty `visited` trail but
/// reaching one of its enclosing Repeat nodes again still counts as a cycle.
#[derive(Clone, Debug, Default)]
pub struct Scope<'a> {
    visited: Trail<'a>,
    loops: Trail<'a>,
}

impl<'a> Scope<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn closes_cycle(&self, id: &str) -> bool {
        self.visited.contains(id) || self.loops.contains(id)
    }

    fn enter(&self, id: &'a str) -> Self {
        Self {
            visited: self.visited.with(id),
            loops: self.loops.clone(),
        }
    }

    /// A fresh scope for the body of the Repeat node `repeat_id`.
    fn loop_body(&self, repeat_id: &'a str) -> Self {
        Self {
            visited: Trail::new(),
            loops: self.loops.with(repeat_id),
        }
    }

    pub fn visited(&self) -> &Trail<'a> {
        &self.visited
    }
}

/// A per-node problem that degraded to a comment in the generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub node_id: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] node '{}': {}", self.kind, self.node_id, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A step that needs an element has no `dataIn` connection.
    MissingElement,
    /// A text capture has no destination variable.
    MissingVariable,
    /// The backend cannot express the construct natively.
    Unsupported,
    /// An enumerated field holds a value outside its vocabulary.
    UnrecognizedValue,
    /// Generation stopped at a node already on the current path.
    CycleTruncated,
    /// A step reached through a connection it should never have.
    MisplacedStep,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::MissingElement => "missing-element",
            DiagnosticKind::MissingVariable => "missing-variable",
            DiagnosticKind::Unsupported => "unsupported",
            DiagnosticKind::UnrecognizedValue => "unrecognized-value",
            DiagnosticKind::CycleTruncated => "cycle-truncated",
            DiagnosticKind::MisplacedStep => "misplaced-step",
        };
        f.write_str(name)
    }
}

/// Drives emission for one backend over one graph snapshot.
///
/// The walker owns the traversal/continuation machinery; backends only decide what text
/// a step becomes, through [`Backend::emit`].
pub struct Walker<'a> {
    traversal: Traversal<'a>,
    backend: &'a dyn Backend,
    diagnostics: RefCell<Vec<Diagnostic>>,
    emitted: Cell<usize>,
}

impl<'a> Walker<'a> {
    pub fn new(traversal: Traversal<'a>, backend: &'a dyn Backend) -> Self {
        Self {
            traversal,
            backend,
            diagnostics: RefCell::new(Vec::new()),
            emitted: Cell::new(0),
        }
    }

    /// Emits the body of the test case rooted at `entry`.
    pub fn walk_entry(&self, entry: &'a Node, indent: usize) -> String {
        self.walk(entry, indent, Scope::new(), 0)
    }

    fn walk(&self, node: &'a Node, indent: usize, scope: Scope<'a>, depth: usize) -> String {
        if scope.closes_cycle(&node.id) {
            self.report(
                &node.id,
                DiagnosticKind::CycleTruncated,
                "flow returns to a step already on this path; generation stops here".to_string(),
            );
            let marker = self.backend.comment(&format!(
                "... (flow merges or cycle detected at '{}')",
                node.id
            ));
            return format!("{}{}\n", indentation(indent), marker);
        }

        debug!(node = %node.id, kind = %node.kind, indent, "emitting step");
        self.emitted.set(self.emitted.get() + 1);

        let ctx = EmitContext {
            walker: self,
            node,
            indent,
            scope: scope.enter(&node.id),
            depth,
            notes: RefCell::new(Vec::new()),
        };
        let emitted = self.backend.emit(&Step::from_node(node), &ctx);
        let notes = ctx.notes.into_inner();
        if notes.is_empty() {
            return emitted;
        }
        let mut code = Code::new(indent);
        for note in &notes {
            code.line(self.backend.comment(note));
        }
        code.push(emitted);
        code.finish()
    }

    fn report(&self, node_id: &str, kind: DiagnosticKind, message: String) {
        warn!(node = %node_id, %kind, "{}", message);
        self.diagnostics.borrow_mut().push(Diagnostic {
            node_id: node_id.to_string(),
            kind,
            message,
        });
    }

    /// Number of steps emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted.get()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }
}

/// Everything an emitter may consult about the node being emitted.
pub struct EmitContext<'a> {
    walker: &'a Walker<'a>,
    node: &'a Node,
    indent: usize,
    scope: Scope<'a>,
    depth: usize,
    /// Warning comments placed above the step's own code.
    notes: RefCell<Vec<String>>,
}

impl<'a> EmitContext<'a> {
    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    /// A code buffer anchored at this node's indentation.
    pub fn code(&self) -> Code {
        Code::new(self.indent)
    }

    /// Whether this node is the root of the current test case.
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Resumes linear emission from this node's flow successor at the same indentation.
    pub fn proceed(&self) -> String {
        match self.walker.traversal.next_flow(self.node) {
            Some(next) => self.recurse(next, self.indent, self.scope()),
            None => String::new(),
        }
    }

    /// Emits the subgraph starting at `target`.
    pub fn recurse(&self, target: &'a Node, indent: usize, scope: Scope<'a>) -> String {
        self.walker.walk(target, indent, scope, self.depth + 1)
    }

    /// The scope of this node, with the node itself marked visited.
    pub fn scope(&self) -> Scope<'a> {
        self.scope.clone()
    }

    /// A fresh scope for the body of this (Repeat) node.
    pub fn loop_body_scope(&self) -> Scope<'a> {
        self.scope.loop_body(&self.node.id)
    }

    pub fn branch_target(&self, role: SourceRole) -> Option<&'a Node> {
        self.walker.traversal.branch_target(self.node, role)
    }

    /// The element wired into this node through its `dataIn` connection.
    ///
    /// An unknown locator strategy is reported here, once per lookup, and treated as ID.
    pub fn element(&self) -> Option<ElementStep> {
        let element = ElementStep::from_node(self.walker.traversal.data_source(self.node)?);
        if let Some(raw) = &element.unrecognized_locator {
            self.unrecognized("selector type", raw, "ID");
        }
        Some(element)
    }

    pub fn syntax(&self) -> &'a dyn ValueSyntax {
        self.walker.backend.syntax()
    }

    /// Translates a raw field value into a backend expression.
    pub fn translate(&self, raw: &str) -> String {
        ValueForm::classify(raw).render(self.syntax())
    }

    /// Reports an enumerated field value outside its vocabulary and the default used instead.
    pub fn unrecognized(&self, field: &str, raw: &str, fallback: &str) {
        let message = format!("unknown {} '{}', using {}", field, raw, fallback);
        self.notes.borrow_mut().push(format!("Warning: {}", message));
        self.warn(DiagnosticKind::UnrecognizedValue, message);
    }

    /// Records a diagnostic against this node.
    pub fn warn(&self, kind: DiagnosticKind, message: impl Into<String>) {
        self.walker.report(&self.node.id, kind, message.into());
    }
}
