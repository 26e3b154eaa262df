//! Lane groups for the timeline studio.
//!
//! Independent of the interval lanes: here steps are partitioned by a
//! user-selected strategy, and the user's saved order/visibility for those
//! groups is reconciled against the groups present in the current trace.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use director_protocol::{LaneConfig, LaneStrategy, StepSummary, TimelineStudioConfig};

/// Group key for steps without a parent under [`LaneStrategy::Parent`].
pub const ROOT_GROUP: &str = "root";

pub fn lane_group_key_for_step(step: &StepSummary, strategy: LaneStrategy) -> &str {
    match strategy {
        LaneStrategy::Type => step.step_type.as_str(),
        LaneStrategy::Status => step.status.as_str(),
        LaneStrategy::Parent => step.parent_step_id.as_deref().unwrap_or(ROOT_GROUP),
    }
}

/// Punctuation in root-collation order; all of it sorts before digits.
const PUNCTUATION: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Primary collation weight of one character: whitespace, punctuation,
/// digits, letters (case-folded), then anything else by code point.
fn primary_weight(c: char) -> (u8, u32) {
    if c.is_whitespace() {
        (0, 0)
    } else if let Some(rank) = PUNCTUATION.find(c) {
        (1, rank as u32)
    } else if let Some(digit) = c.to_digit(10) {
        (2, digit)
    } else if c.is_alphabetic() {
        let folded = c.to_lowercase().next().unwrap_or(c);
        (3, folded as u32)
    } else {
        (4, c as u32)
    }
}

/// Locale-style ordering: compare primary weights over the whole string
/// first, so case only breaks ties, and then lowercase sorts first.
fn locale_cmp(left: &str, right: &str) -> Ordering {
    left.chars()
        .map(primary_weight)
        .cmp(right.chars().map(primary_weight))
        .then_with(|| {
            left.chars()
                .map(char::is_uppercase)
                .cmp(right.chars().map(char::is_uppercase))
        })
        .then_with(|| left.cmp(right))
}

/// Unique group keys present in `steps`, sorted.
pub fn derive_lane_groups(steps: &[StepSummary], strategy: LaneStrategy) -> Vec<String> {
    let unique: BTreeSet<&str> = steps
        .iter()
        .map(|step| lane_group_key_for_step(step, strategy))
        .collect();
    let mut groups: Vec<String> = unique.into_iter().map(str::to_string).collect();
    groups.sort_by(|a, b| locale_cmp(a, b));
    groups
}

/// Reconcile a saved lane config against the groups currently known.
///
/// Unknown keys are dropped and duplicates collapse to their first
/// occurrence. Known groups missing from `order` are appended in `known`
/// order. Applying it to its own output changes nothing.
pub fn normalize_lane_order(known: &[String], order: &[String], hidden: &[String]) -> LaneConfig {
    let known_set: HashSet<&str> = known.iter().map(String::as_str).collect();

    let mut seen: HashSet<&str> = HashSet::with_capacity(known.len());
    let mut normalized_order: Vec<String> = Vec::with_capacity(known.len());
    for key in order.iter().chain(known) {
        if known_set.contains(key.as_str()) && seen.insert(key.as_str()) {
            normalized_order.push(key.clone());
        }
    }

    let mut seen_hidden: HashSet<&str> = HashSet::new();
    let normalized_hidden = hidden
        .iter()
        .filter(|&key| known_set.contains(key.as_str()) && seen_hidden.insert(key.as_str()))
        .cloned()
        .collect();

    LaneConfig {
        order: normalized_order,
        hidden: normalized_hidden,
    }
}

/// Groups to draw, in the configured order.
pub fn visible_lane_groups(config: &LaneConfig) -> Vec<&str> {
    let hidden: HashSet<&str> = config.hidden.iter().map(String::as_str).collect();
    config
        .order
        .iter()
        .map(String::as_str)
        .filter(|key| !hidden.contains(key))
        .collect()
}

/// Reconciliation over the per-strategy config the UI persists.
pub trait StudioConfigExt {
    /// The strategy's config normalized against `known`.
    fn normalized(&self, strategy: LaneStrategy, known: &[String]) -> LaneConfig;

    /// An updated config when normalization changed the strategy's entry,
    /// `None` when it was already normalized and nothing needs saving.
    fn reconcile(&self, strategy: LaneStrategy, known: &[String]) -> Option<TimelineStudioConfig>;
}

impl StudioConfigExt for TimelineStudioConfig {
    fn normalized(&self, strategy: LaneStrategy, known: &[String]) -> LaneConfig {
        let current = self.for_strategy(strategy);
        normalize_lane_order(known, &current.order, &current.hidden)
    }

    fn reconcile(&self, strategy: LaneStrategy, known: &[String]) -> Option<TimelineStudioConfig> {
        if known.is_empty() {
            return None;
        }
        let normalized = self.normalized(strategy, known);
        if &normalized == self.for_strategy(strategy) {
            return None;
        }
        let mut next = self.clone();
        *next.for_strategy_mut(strategy) = normalized;
        Some(next)
    }
}
