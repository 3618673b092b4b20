//! Intrusive ordered lists over a shared link arena.
//!
//! Every list node lives in a [`Links`] arena next to the data that owns it.
//! A list is identified by its sentinel root node ([`List`]); the root's
//! `prev`/`next` point back to itself while the list is empty.
//!
//! Splicing (`prepend`, `append`, `insert_before`, `remove`) is O(1) and never
//! allocates. Allocation happens only when a node is created in the arena.

mod links;

pub use links::{Iter, Link, Links, List, NodeId};
