//! Fluent builder for a `PoseStore` with a static priority ordering.
//!
//! # Usage
//!
//! ```rust
//! use dc_agent::{PoseStoreBuilder, Priority};
//!
//! let store = PoseStoreBuilder::new()
//!     .agent("turtle1")                         // priority 0: yields
//!     .agent("turtle2")                         // priority 1
//!     .agent_with_priority("rover", Priority(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(store.count, 3);
//! assert_eq!(store.known_count(), 0);
//! ```

use dc_core::DcResult;

use crate::{PoseStore, Priority};

/// Fluent builder for [`PoseStore`].
///
/// Agents added with [`agent`](Self::agent) get a priority equal to their
/// registration index, so the first-registered agent always yields.
#[derive(Default)]
pub struct PoseStoreBuilder {
    entries: Vec<(String, Option<Priority>)>,
}

impl PoseStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` with the default priority: its registration index.
    ///
    /// The index counts every earlier entry, including those added with
    /// [`agent_with_priority`](Self::agent_with_priority).  After
    /// `.agent_with_priority("a", Priority(5)).agent("b")`, `b` gets
    /// `Priority(1)` and yields to `a`.
    pub fn agent(mut self, name: impl Into<String>) -> Self {
        self.entries.push((name.into(), None));
        self
    }

    /// Register `name` with an explicit priority.
    pub fn agent_with_priority(mut self, name: impl Into<String>, priority: Priority) -> Self {
        self.entries.push((name.into(), Some(priority)));
        self
    }

    /// Number of agents queued for registration.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register every queued agent.
    ///
    /// # Errors
    ///
    /// `DcError::DuplicateAgent` if a name appears twice.
    pub fn build(self) -> DcResult<PoseStore> {
        let mut store = PoseStore::new();
        for (i, (name, priority)) in self.entries.into_iter().enumerate() {
            let priority = priority.unwrap_or(Priority(i as u32));
            store.register(&name, priority)?;
        }
        Ok(store)
    }
}
