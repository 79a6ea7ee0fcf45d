//! Node names and edge targets.
//!
//! Each graph names its nodes with a closed type `N` (usually a small enum), so a
//! routing function can only return a known node or [`Route::End`]. `&'static str`
//! and `String` also work for ad-hoc graphs and tests.

use std::fmt::Debug;
use std::hash::Hash;

/// Display name of the virtual entry node (visualization only).
pub const START: &str = "__start__";

/// Display name of the terminal marker.
pub const END: &str = "__end__";

/// Key type naming the nodes of one graph.
pub trait NodeKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Human-readable node name used in logs, errors and visualization.
    fn name(&self) -> &str;
}

impl NodeKey for &'static str {
    fn name(&self) -> &str {
        self
    }
}

impl NodeKey for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

/// Where to go after a node: another node, or the terminal marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route<N> {
    Node(N),
    End,
}

impl<N: NodeKey> Route<N> {
    pub fn name(&self) -> &str {
        match self {
            Route::Node(n) => n.name(),
            Route::End => END,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Route::End)
    }
}

impl<N> From<N> for Route<N> {
    fn from(node: N) -> Self {
        Route::Node(node)
    }
}
