//! Task-count equalization across candidates.
//!
//! Run before every selection step.  Candidates are packed into a stack
//! that pops most-urgent-priority first; an overloaded candidate (more
//! tasks than capacity) sheds the difference onto the next candidate on
//! the stack.  The move is signed arithmetic — shedding is a negative
//! move "from B to A" — so one pass settles each popped candidate at or
//! below its capacity while the remainder accumulates further down.

use crate::candidate::Candidate;

pub fn redistribute(candidates: &mut [Candidate]) {
    // Stack packed so that pop() yields ascending (priority, index):
    // the most urgent candidates are balanced first.
    let mut stack: Vec<usize> = (0..candidates.len()).collect();
    stack.sort_by_key(|&i| (std::cmp::Reverse(candidates[i].priority), std::cmp::Reverse(i)));

    while let Some(a) = stack.pop() {
        if candidates[a].task_count <= candidates[a].real_capacity {
            continue;
        }
        let Some(b) = stack.pop() else { break };

        let moved =
            (candidates[a].real_capacity - candidates[a].task_count).min(candidates[b].task_count);
        candidates[a].task_count += moved;
        candidates[b].task_count -= moved;

        if candidates[b].task_count > 0 {
            stack.push(b);
        }
        if candidates[a].task_count > candidates[a].real_capacity {
            stack.push(a);
        }
    }
}
