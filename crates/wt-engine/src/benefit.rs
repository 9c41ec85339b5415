//! The benefit order: finite scores with an infinite top element.

use std::cmp::Ordering;
use std::collections::HashMap;

use wt_core::QueueId;

use crate::candidate::Candidate;
use crate::snapshot::EngineQueue;

// ── Benefit ──────────────────────────────────────────────────────────────────

/// The value an assignment candidate is ranked by.
///
/// `Infinite` is an ordinal override, not a float sentinel: two
/// `Infinite`s are equal and `Infinite` beats every finite value
/// regardless of representation.  Finite values order by `f64::total_cmp`,
/// so fractional differences are significant.
#[derive(Copy, Clone, Debug)]
pub enum Benefit {
    Finite(f64),
    Infinite,
}

impl PartialEq for Benefit {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Benefit {}

impl PartialOrd for Benefit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Benefit {
    fn cmp(&self, other: &Self) -> Ordering {
        use Benefit::*;
        match (self, other) {
            (Infinite, Infinite) => Ordering::Equal,
            (Infinite, Finite(_)) => Ordering::Greater,
            (Finite(_), Infinite) => Ordering::Less,
            (Finite(a), Finite(b)) => a.total_cmp(b),
        }
    }
}

// ── Candidate benefit ────────────────────────────────────────────────────────

/// Benefit of one candidate given the per-queue counts already assigned
/// this engine call.
///
/// The finite base is `real_capacity × weight(bias) / max(priority, 1)`.
/// Overrides apply in order: must-run promotes priority-1 candidates to
/// `Infinite`; a queue at its `max_resources` demotes to `Finite(0)`;
/// a queue below its `min_resources` (or below `max_resources` with
/// `force_max`) promotes to `Infinite`.
pub(crate) fn candidate_benefit(
    candidate: &Candidate,
    queues: &[EngineQueue],
    assigned: &HashMap<QueueId, u32>,
    bias: f64,
) -> Benefit {
    let queue = &queues[candidate.queue_idx];
    let base = candidate.real_capacity as f64 * queue.weight(bias)
        / candidate.priority.max(1) as f64;
    let mut value = Benefit::Finite(base);

    if queue.params.must_run && candidate.priority == 1 {
        value = Benefit::Infinite;
    }
    let already = assigned.get(&queue.id).copied().unwrap_or(0);
    if let Some(max) = queue.params.max_resources {
        if already >= max {
            value = Benefit::Finite(0.0);
        }
    }
    if let Some(min) = queue.params.min_resources {
        if min > 0 && already < min {
            value = Benefit::Infinite;
        }
    }
    if queue.params.force_max {
        if let Some(max) = queue.params.max_resources {
            if already < max {
                value = Benefit::Infinite;
            }
        }
    }
    value
}

/// Tie-break key for equal benefits: must-run beats not, higher
/// criticality wins, shorter SLA wins.  Larger key is preferred.
pub(crate) fn tiebreak_key(queue: &EngineQueue) -> (bool, u32, std::cmp::Reverse<u64>) {
    (
        queue.params.must_run,
        queue.params.criticality,
        std::cmp::Reverse(queue.params.sla_secs),
    )
}
