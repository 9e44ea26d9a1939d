use super::walker::{Diagnostic, Walker};
use crate::backend::{Backend, SuiteInfo, TestCase};
use crate::graph::{EntryStep, Node};
use crate::traversal::Traversal;
use ahash::AHashSet;
use tracing::info;

/// What one compiled test case contributed to its suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSummary {
    /// Final, de-duplicated test name as it appears in the output.
    pub name: String,
    pub entry_id: String,
    /// Steps emitted for this case, cycle markers excluded.
    pub steps: usize,
    /// Diagnostics recorded while emitting this case.
    pub diagnostics: usize,
}

pub(super) struct Assembly {
    pub(super) source: String,
    pub(super) cases: Vec<CaseSummary>,
    pub(super) diagnostics: Vec<Diagnostic>,
}

/// One entry point to compile.
pub(super) struct CaseEntry<'g> {
    /// 1-based position among the graph's entry points.
    pub(super) index: usize,
    pub(super) node: &'g Node,
    /// Names the case instead of the entry's own `testName`.
    pub(super) title: Option<String>,
}

/// Emits file boilerplate once and one wrapped test case per entry.
pub(super) fn assemble<'g>(
    traversal: Traversal<'g>,
    backend: &'g dyn Backend,
    suite_name: &str,
    entries: &[CaseEntry<'g>],
) -> Assembly {
    let walker = Walker::new(traversal, backend);
    let suite = SuiteInfo {
        name: suite_name.to_string(),
        cases: entries.len(),
    };

    let mut source = backend.prologue(&suite);
    let mut taken = AHashSet::with_capacity(entries.len());
    let mut cases = Vec::with_capacity(entries.len());

    for case_entry in entries {
        let (index, entry) = (case_entry.index, case_entry.node);
        let step = EntryStep::from_node(entry);
        let raw = case_entry.title.as_deref().or(step.test_name.as_deref());
        let name = unique(backend.test_name(raw, index), &mut taken);
        info!(case = %name, entry = %entry.id, backend = %backend.choice(), "compiling test case");

        let (emitted, reported) = (walker.emitted(), walker.diagnostic_count());
        let body = walker.walk_entry(entry, backend.body_indent());
        let case = TestCase {
            name: &name,
            index,
            entry: &step,
        };
        source.push_str(&backend.test_case(&case, &body));

        cases.push(CaseSummary {
            name,
            entry_id: entry.id.clone(),
            steps: walker.emitted() - emitted,
            diagnostics: walker.diagnostic_count() - reported,
        });
    }

    source.push_str(&backend.epilogue(&suite));
    Assembly {
        source,
        cases,
        diagnostics: walker.into_diagnostics(),
    }
}

/// `name`, or `name_2`, `name_3`, ... when already taken.
pub(super) fn unique(name: String, taken: &mut AHashSet<String>) -> String {
    let candidate = std::iter::once(name.clone())
        .chain((2..).map(|n| format!("{}_{}", name, n)))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(name);
    taken.insert(candidate.clone());
    candidate
}
