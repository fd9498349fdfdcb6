use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API group and kind of a tracked resource. The core group is the empty
/// string.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
pub struct GroupKind {
    #[serde(default)]
    pub group: String,
    pub kind: String,
}

impl GroupKind {
    pub fn new(group: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}.{}", self.kind, self.group)
        }
    }
}

/// Identifier of a resource whose readiness is observed.
///
/// Text form is `[<namespace>/]<Kind>[.<group>]/<name>`, e.g.
/// `podinfo/Deployment.apps/podinfo` or `Namespace/podinfo` for a
/// cluster-scoped resource.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
pub struct ResourceId {
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    #[serde(flatten)]
    pub group_kind: GroupKind,
}

impl ResourceId {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        group_kind: GroupKind,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            group_kind,
        }
    }

    pub fn kind(&self) -> &str {
        &self.group_kind.kind
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.namespace.is_empty() {
            write!(f, "{}/", self.namespace)?;
        }
        write!(f, "{}/{}", self.group_kind, self.name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceIdParseError {
    #[error("expected [<namespace>/]<Kind>[.<group>]/<name>, got '{0}'")]
    Malformed(String),
    #[error("empty {field} in '{input}'")]
    Empty { field: &'static str, input: String },
}

impl FromStr for ResourceId {
    type Err = ResourceIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        let (namespace, kind_part, name) = match parts.as_slice() {
            [kind, name] => ("", *kind, *name),
            [ns, kind, name] => (*ns, *kind, *name),
            _ => return Err(ResourceIdParseError::Malformed(s.to_string())),
        };
        let (kind, group) =
            kind_part.split_once('.').unwrap_or((kind_part, ""));
        if kind.is_empty() {
            return Err(ResourceIdParseError::Empty {
                field: "kind",
                input: s.to_string(),
            });
        }
        if name.is_empty() {
            return Err(ResourceIdParseError::Empty {
                field: "name",
                input: s.to_string(),
            });
        }
        Ok(ResourceId::new(namespace, name, GroupKind::new(group, kind)))
    }
}
