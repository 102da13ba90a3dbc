//! Stable path keys for tree nodes.

use std::fmt;
use std::str::FromStr;

/// Path-qualified identity of a tree row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    Batch {
        batch_id: String,
    },
    User {
        batch_id: String,
        username: String,
    },
    Course {
        batch_id: String,
        username: String,
        course_id: String,
    },
}

impl NodeKey {
    pub fn batch(batch_id: impl Into<String>) -> Self {
        NodeKey::Batch {
            batch_id: batch_id.into(),
        }
    }

    pub fn user(batch_id: impl Into<String>, username: impl Into<String>) -> Self {
        NodeKey::User {
            batch_id: batch_id.into(),
            username: username.into(),
        }
    }

    pub fn course(
        batch_id: impl Into<String>,
        username: impl Into<String>,
        course_id: impl Into<String>,
    ) -> Self {
        NodeKey::Course {
            batch_id: batch_id.into(),
            username: username.into(),
            course_id: course_id.into(),
        }
    }

    pub fn batch_id(&self) -> &str {
        match self {
            NodeKey::Batch { batch_id }
            | NodeKey::User { batch_id, .. }
            | NodeKey::Course { batch_id, .. } => batch_id,
        }
    }

    /// Key of the enclosing node, if any.
    pub fn parent(&self) -> Option<NodeKey> {
        match self {
            NodeKey::Batch { .. } => None,
            NodeKey::User { batch_id, .. } => Some(NodeKey::batch(batch_id.clone())),
            NodeKey::Course {
                batch_id, username, ..
            } => Some(NodeKey::user(batch_id.clone(), username.clone())),
        }
    }

    /// True if `other` sits strictly below `self`.
    pub fn is_ancestor_of(&self, other: &NodeKey) -> bool {
        let mut cur = other.parent();
        while let Some(p) = cur {
            if &p == self {
                return true;
            }
            cur = p.parent();
        }
        false
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Batch { batch_id } => write!(f, "batch:{batch_id}"),
            NodeKey::User { batch_id, username } => write!(f, "user:{batch_id}:{username}"),
            NodeKey::Course {
                batch_id,
                username,
                course_id,
            } => write!(f, "course:{batch_id}:{username}:{course_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node key {0:?}")]
pub struct ParseNodeKeyError(String);

impl FromStr for NodeKey {
    type Err = ParseNodeKeyError;

    /// Usernames may contain ':'; the course id is taken from the last segment.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseNodeKeyError(s.to_string());
        let (kind, rest) = s.split_once(':').ok_or_else(err)?;
        match kind {
            "batch" if !rest.is_empty() => Ok(NodeKey::batch(rest)),
            "user" => {
                let (batch, user) = rest.split_once(':').ok_or_else(err)?;
                Ok(NodeKey::user(batch, user))
            }
            "course" => {
                let (batch, tail) = rest.split_once(':').ok_or_else(err)?;
                let (user, course) = tail.rsplit_once(':').ok_or_else(err)?;
                Ok(NodeKey::course(batch, user, course))
            }
            _ => Err(err()),
        }
    }
}
