use std::collections::HashMap;
use std::collections::hash_map::Entry;

use director_protocol::{FlowEdge, FlowNode, StepSummary};

use crate::config::LayoutConfig;
use crate::flow::layout::build_flow_layout;

/// Fingerprint of a layout's inputs: step ids and edges, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutSignature(String);

impl LayoutSignature {
    pub fn of(steps: &[StepSummary], edges: &[FlowEdge]) -> Self {
        let step_part = steps
            .iter()
            .map(|step| step.id.as_str())
            .collect::<Vec<_>>()
            .join("|");
        let edge_part = edges
            .iter()
            .map(|edge| format!("{}->{}", edge.source, edge.target))
            .collect::<Vec<_>>()
            .join("|");
        Self(format!(
            "{}:{}:{step_part}:{edge_part}",
            steps.len(),
            edges.len()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
struct CachedLayout {
    signature: LayoutSignature,
    layout: Vec<FlowNode>,
}

/// Memoized flow layouts, keyed by a caller-chosen key (typically a trace id).
///
/// An entry is only reused while its signature matches, so changed steps or
/// edges under the same key recompute. The cache is a plain value owned by
/// whoever needs it; nothing here is global.
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    entries: HashMap<String, CachedLayout>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached layout for `key`, if it was computed from `signature`.
    pub fn get(&self, key: &str, signature: &LayoutSignature) -> Option<&[FlowNode]> {
        self.entries
            .get(key)
            .filter(|cached| &cached.signature == signature)
            .map(|cached| cached.layout.as_slice())
    }

    pub fn put(
        &mut self,
        key: impl Into<String>,
        signature: LayoutSignature,
        layout: Vec<FlowNode>,
    ) {
        self.entries.insert(key.into(), CachedLayout { signature, layout });
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the layout for `key`, computing and storing it unless a layout
    /// with the same signature is already cached.
    pub fn layout_or_compute(
        &mut self,
        key: &str,
        steps: &[StepSummary],
        edges: &[FlowEdge],
        config: &LayoutConfig,
    ) -> &[FlowNode] {
        let signature = LayoutSignature::of(steps, edges);
        let cached = match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                if entry.get().signature == signature {
                    tracing::trace!(key, "flow layout cache hit");
                } else {
                    tracing::trace!(key, "flow layout cache stale");
                    entry.insert(CachedLayout {
                        signature,
                        layout: build_flow_layout(steps, edges, config),
                    });
                }
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                tracing::trace!(key, "flow layout cache miss");
                entry.insert(CachedLayout {
                    signature,
                    layout: build_flow_layout(steps, edges, config),
                })
            }
        };
        &cached.layout
    }
}
