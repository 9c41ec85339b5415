//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  `AgentId` and `QueueId` double as
//! indices into the state store's vectors (the builder assigns them in
//! insertion order); `UserId` and `TaskId` are opaque external identifiers.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }
    };
}

typed_id! {
    /// Index of an agent (RPA robot, human operator, or AI worker) in the
    /// state store.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a work queue in the state store.
    pub struct QueueId(u32);
}

typed_id! {
    /// An orchestrator user credential.  Queues are owned by exactly one
    /// user; agents log in as one user at a time.
    pub struct UserId(u32);
}

typed_id! {
    /// A work item inside a queue.  `u64` because item ids come from
    /// external connectors and can be large.
    pub struct TaskId(u64);
}
