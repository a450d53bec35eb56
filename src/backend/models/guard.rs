use std::fmt;

/// Identifier of a node in the guarded formula's registry.
///
/// Identifiers are dense, start at 1 and are never reused within a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Condition under which a value or branch holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Guard {
    /// Unconditionally true; no node needed.
    True,
    /// Unsatisfiable; the branch fails.
    False,
    Node(NodeId),
}

impl Guard {
    #[inline]
    pub fn is_true(self) -> bool {
        matches!(self, Guard::True)
    }

    #[inline]
    pub fn is_false(self) -> bool {
        matches!(self, Guard::False)
    }

    #[inline]
    pub fn node(self) -> Option<NodeId> {
        match self {
            Guard::Node(id) => Some(id),
            _ => None,
        }
    }
}

impl From<NodeId> for Guard {
    fn from(id: NodeId) -> Self {
        Guard::Node(id)
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::True => f.write_str("true"),
            Guard::False => f.write_str("false"),
            Guard::Node(id) => write!(f, "{}", id),
        }
    }
}
