//! # Resource Graph
//!
//! The contract between frozen resources and a planner. A planner decides
//! what [`Operation`] each resource needs and which resources it references;
//! this module only carries that information and renders it.
//!
//! - [`GraphNode`]: what a node exposes
//! - [`ResourceNode`]: a plain node a planner fills in
//! - [`Graph`]: nodes keyed by [`ResourceId`]
//! - [`graphviz`]: `.dot` output for visualization

pub mod graphviz;

use resource_framework::{FrozenResource, Path, Representation, ResourceId};
use std::collections::BTreeMap;
use std::fmt::Display;
use thiserror::Error;

/// What a planner decided to do with a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Delete,
    Recreate,
    Update,
    Nothing,
    Unknown,
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Operation::Create => "create",
            Operation::Delete => "delete",
            Operation::Recreate => "recreate",
            Operation::Update => "update",
            Operation::Nothing => "nothing",
            Operation::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// A reference from a field of one resource to another resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutRef {
    pub path: Path,
    pub to: ResourceId,
}

/// A resource as seen by the planner.
pub trait GraphNode {
    fn id(&self) -> &ResourceId;

    fn operation(&self) -> Operation;

    /// Extra key/value pairs shown with the node.
    fn labels(&self) -> BTreeMap<String, String>;

    /// Resources this node references, or why they could not be determined.
    fn out_refs(&self) -> Result<Vec<OutRef>, String>;

    /// An error reading the resource, if any.
    fn error(&self) -> Option<String>;
}

/// A node built field by field.
///
/// ```rust
/// use resource_recipe::graph::{GraphNode, Operation, ResourceNode};
/// use resource_framework::ResourceId;
///
/// let node = ResourceNode::new(ResourceId::global("p", "addresses", "a"), Operation::Create)
///     .with_label("state", "planned");
/// assert_eq!(node.labels()["state"], "planned");
/// ```
#[derive(Debug, Clone)]
pub struct ResourceNode {
    id: ResourceId,
    operation: Operation,
    labels: BTreeMap<String, String>,
    out_refs: Result<Vec<OutRef>, String>,
    error: Option<String>,
}

impl ResourceNode {
    pub fn new(id: ResourceId, operation: Operation) -> Self {
        Self {
            id,
            operation,
            labels: BTreeMap::new(),
            out_refs: Ok(Vec::new()),
            error: None,
        }
    }

    /// A node for a frozen resource, labeled with its canonical version.
    pub fn from_frozen<S, A, B>(frozen: &FrozenResource<'_, S, A, B>, operation: Operation) -> Self
    where
        S: Representation,
        A: Representation,
        B: Representation,
    {
        Self::new(frozen.resource_id().clone(), operation).with_label("version", frozen.version())
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.labels.insert(key.into(), value.to_string());
        self
    }

    pub fn with_out_refs<E: Display>(mut self, out_refs: Result<Vec<OutRef>, E>) -> Self {
        self.out_refs = out_refs.map_err(|e| e.to_string());
        self
    }

    pub fn with_error(mut self, error: impl Display) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

impl GraphNode for ResourceNode {
    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn operation(&self) -> Operation {
        self.operation
    }

    fn labels(&self) -> BTreeMap<String, String> {
        self.labels.clone()
    }

    fn out_refs(&self) -> Result<Vec<OutRef>, String> {
        self.out_refs.clone()
    }

    fn error(&self) -> Option<String> {
        self.error.clone()
    }
}

/// Errors building a [`Graph`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphError {
    #[error("Duplicate node: {0}")]
    DuplicateNode(ResourceId),

    #[error("Dangling reference: {from}{path} -> {to}")]
    DanglingRef {
        from: ResourceId,
        path: Path,
        to: ResourceId,
    },
}

/// A set of nodes keyed by resource ID, iterated in ID order.
#[derive(Default)]
pub struct Graph {
    nodes: BTreeMap<ResourceId, Box<dyn GraphNode>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: impl GraphNode + 'static) -> Result<(), GraphError> {
        let id = node.id().clone();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        self.nodes.insert(id, Box::new(node));
        Ok(())
    }

    pub fn get(&self, id: &ResourceId) -> Option<&dyn GraphNode> {
        self.nodes.get(id).map(|n| n.as_ref())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn all(&self) -> impl Iterator<Item = &dyn GraphNode> {
        self.nodes.values().map(|n| n.as_ref())
    }

    /// Checks that every out ref points at a node in the graph. Nodes whose
    /// out refs could not be determined are skipped.
    pub fn validate(&self) -> Result<(), GraphError> {
        for node in self.all() {
            for r in node.out_refs().unwrap_or_default() {
                if !self.nodes.contains_key(&r.to) {
                    return Err(GraphError::DanglingRef {
                        from: node.id().clone(),
                        path: r.path,
                        to: r.to,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(name: &str) -> ResourceId {
        ResourceId::global("proj", "addresses", name)
    }

    #[test]
    fn test_duplicate_node() {
        let mut g = Graph::new();
        g.add(ResourceNode::new(address("a"), Operation::Create)).unwrap();
        let err = g.add(ResourceNode::new(address("a"), Operation::Update)).unwrap_err();
        assert_eq!(err, GraphError::DuplicateNode(address("a")));
        assert_eq!(g.len(), 1);
        assert_eq!(g.get(&address("a")).unwrap().operation(), Operation::Create);
    }

    #[test]
    fn test_validate_dangling_ref() {
        let mut g = Graph::new();
        let rule = ResourceId::global("proj", "forwardingRules", "fr");
        g.add(ResourceNode::new(rule.clone(), Operation::Create).with_out_refs(Ok::<_, String>(vec![OutRef {
            path: Path::root().field("IPAddress"),
            to: address("vip"),
        }])))
        .unwrap();

        let err = g.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Dangling reference: forwardingRules:proj/global/fr.IPAddress -> addresses:proj/global/vip"
        );

        g.add(ResourceNode::new(address("vip"), Operation::Nothing)).unwrap();
        g.validate().unwrap();
    }
}
