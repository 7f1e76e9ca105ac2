use std::collections::HashMap;

use crate::error::PayloadError;

use super::MULTI_VALUE_DELIMITER;
use super::path::NodePath;

/// Handle to a node inside one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Content {
    Pair { name: String, value: String },
    Child(NodeId),
}

#[derive(Debug, Clone)]
pub(super) struct Node {
    pub(super) tag: String,
    pub(super) props: Vec<(String, String)>,
    pub(super) content: Vec<Content>,
    parent: Option<NodeId>,
    attached: bool,
}

type IndexKey = (String, String, String);

/// Arena-backed payload tree with an index over `(tag, property, value)`.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    index: HashMap<IndexKey, Vec<NodeId>>,
}

const ROOT: NodeId = NodeId(0);
const DEFAULT_ROOT_TAG: &str = "root";

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with a `<root>` element.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root(DEFAULT_ROOT_TAG, &[])
    }

    #[must_use]
    pub fn with_root(tag: &str, props: &[(&str, &str)]) -> Self {
        let mut document = Self {
            nodes: Vec::with_capacity(8),
            index: HashMap::new(),
        };
        document.push_node(None, tag, props);
        document
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        ROOT
    }

    /// Adds a node under the node selected by `parent`, or under the root
    /// when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a lookup error when `parent` does not select exactly one node.
    pub fn add_node(
        &mut self,
        parent: Option<&str>,
        tag: &str,
        props: &[(&str, &str)],
    ) -> Result<NodeId, PayloadError> {
        let parent = match parent {
            Some(path) => self.select(path)?,
            None => ROOT,
        };
        self.add_child(parent, tag, props)
    }

    /// Adds a node under an already resolved parent.
    ///
    /// # Errors
    ///
    /// Returns `DetachedNode` when `parent` was removed from the document.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        tag: &str,
        props: &[(&str, &str)],
    ) -> Result<NodeId, PayloadError> {
        self.attached(parent)?;
        let id = self.push_node(Some(parent), tag, props);
        self.node_mut(parent)?.content.push(Content::Child(id));
        Ok(id)
    }

    /// Replaces the value of the first attribute pair named `name`, walking
    /// the tree in document (pre-)order.
    ///
    /// # Errors
    ///
    /// Returns `AttributeNotFound` when no node carries the attribute.
    pub fn set_first_attr(&mut self, name: &str, value: &str) -> Result<NodeId, PayloadError> {
        let found = self
            .preorder(ROOT)
            .into_iter()
            .find(|id| self.attr(*id, name).is_some())
            .ok_or_else(|| PayloadError::AttributeNotFound {
                name: name.to_owned(),
            })?;
        self.set_attr(found, name, value)?;
        Ok(found)
    }

    /// Creates or overwrites the attribute pair `name` on the node selected
    /// by `path`.
    ///
    /// # Errors
    ///
    /// Returns a lookup error when `path` does not select exactly one node.
    pub fn add_attr_pair(&mut self, path: &str, name: &str, value: &str) -> Result<(), PayloadError> {
        let node = self.select(path)?;
        self.set_attr(node, name, value)
    }

    /// Stores `values` joined with [`MULTI_VALUE_DELIMITER`] as one attribute.
    ///
    /// # Errors
    ///
    /// Returns a lookup error when `path` does not select exactly one node.
    pub fn add_multi_value_attr<S>(
        &mut self,
        path: &str,
        name: &str,
        values: &[S],
    ) -> Result<(), PayloadError>
    where
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for (position, value) in values.iter().enumerate() {
            if position > 0 {
                joined.push(MULTI_VALUE_DELIMITER);
            }
            joined.push_str(value.as_ref());
        }
        self.add_attr_pair(path, name, &joined)
    }

    /// Creates or overwrites an attribute pair on a resolved node.
    ///
    /// # Errors
    ///
    /// Returns `DetachedNode` when `node` was removed from the document.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), PayloadError> {
        self.attached(node)?;
        let content = &mut self.node_mut(node)?.content;
        for item in content.iter_mut() {
            if let Content::Pair {
                name: existing,
                value: current,
            } = item
                && existing == name
            {
                *current = value.to_owned();
                return Ok(());
            }
        }
        content.push(Content::Pair {
            name: name.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    /// Detaches `node` and its subtree from the document.
    ///
    /// # Errors
    ///
    /// Returns `RemoveRoot` for the root and `DetachedNode` for nodes that
    /// were already removed.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), PayloadError> {
        if node == ROOT {
            return Err(PayloadError::RemoveRoot);
        }
        self.attached(node)?;
        if let Some(parent) = self.node(node)?.parent {
            self.node_mut(parent)?
                .content
                .retain(|item| *item != Content::Child(node));
        }
        for id in self.preorder(node) {
            let (tag, props) = {
                let removed = self.node_mut(id)?;
                removed.attached = false;
                (removed.tag.clone(), removed.props.clone())
            };
            for (name, value) in props {
                let key = (tag.clone(), name, value);
                if let Some(ids) = self.index.get_mut(&key) {
                    ids.retain(|candidate| *candidate != id);
                    if ids.is_empty() {
                        self.index.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolves a path expression to exactly one node.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath`, `PathNotFound` (no match) or `AmbiguousPath`
    /// (more than one match).
    pub fn select(&self, path: &str) -> Result<NodeId, PayloadError> {
        let parsed = NodePath::parse(path)?;
        let mut segments = parsed.segments().iter();
        let Some(first) = segments.next() else {
            return Err(PayloadError::PathNotFound {
                path: parsed.as_str().to_owned(),
            });
        };

        let mut candidates: Vec<NodeId> = match first.predicate.as_ref() {
            Some(predicate) => self
                .index
                .get(&(
                    first.tag.clone(),
                    predicate.name.clone(),
                    predicate.value.clone(),
                ))
                .cloned()
                .unwrap_or_default(),
            None => self.children_tagged(ROOT, &first.tag, None),
        };

        for segment in segments {
            let current = single(parsed.as_str(), &candidates)?;
            let predicate = segment
                .predicate
                .as_ref()
                .map(|selector| (selector.name.as_str(), selector.value.as_str()));
            candidates = self.children_tagged(current, &segment.tag, predicate);
        }

        single(parsed.as_str(), &candidates)
    }

    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|found| found.tag.as_str())
    }

    /// Value of a property (XML attribute) on `node`.
    #[must_use]
    pub fn prop(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node.0).and_then(|found| {
            found
                .props
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        })
    }

    /// Value of an attribute pair on `node`.
    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node.0).and_then(|found| {
            found.content.iter().find_map(|item| match item {
                Content::Pair {
                    name: existing,
                    value,
                } if existing == name => Some(value.as_str()),
                Content::Pair { .. } | Content::Child(_) => None,
            })
        })
    }

    /// Attribute pairs of `node` in insertion order.
    #[must_use]
    pub fn attrs(&self, node: NodeId) -> Vec<(&str, &str)> {
        self.nodes
            .get(node.0)
            .map(|found| {
                found
                    .content
                    .iter()
                    .filter_map(|item| match item {
                        Content::Pair { name, value } => Some((name.as_str(), value.as_str())),
                        Content::Child(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|found| {
                found
                    .content
                    .iter()
                    .filter_map(|item| match item {
                        Content::Child(id) => Some(*id),
                        Content::Pair { .. } => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).is_some_and(|found| found.attached)
    }

    pub(super) fn node(&self, id: NodeId) -> Result<&Node, PayloadError> {
        self.nodes
            .get(id.0)
            .ok_or(PayloadError::DetachedNode { id: id.0 })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, PayloadError> {
        self.nodes
            .get_mut(id.0)
            .ok_or(PayloadError::DetachedNode { id: id.0 })
    }

    fn attached(&self, id: NodeId) -> Result<(), PayloadError> {
        if self.node(id)?.attached {
            Ok(())
        } else {
            Err(PayloadError::DetachedNode { id: id.0 })
        }
    }

    fn push_node(&mut self, parent: Option<NodeId>, tag: &str, props: &[(&str, &str)]) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut owned: Vec<(String, String)> = Vec::with_capacity(props.len());
        for (name, value) in props {
            if let Some(existing) = owned.iter_mut().find(|(key, _)| key == name) {
                existing.1 = (*value).to_owned();
                continue;
            }
            owned.push(((*name).to_owned(), (*value).to_owned()));
        }
        for (name, value) in &owned {
            self.index
                .entry((tag.to_owned(), name.clone(), value.clone()))
                .or_default()
                .push(id);
        }
        self.nodes.push(Node {
            tag: tag.to_owned(),
            props: owned,
            content: Vec::new(),
            parent,
            attached: true,
        });
        id
    }

    fn children_tagged(
        &self,
        parent: NodeId,
        tag: &str,
        predicate: Option<(&str, &str)>,
    ) -> Vec<NodeId> {
        self.children(parent)
            .into_iter()
            .filter(|child| self.tag(*child) == Some(tag))
            .filter(|child| match predicate {
                Some((name, value)) => self.prop(*child, name) == Some(value),
                None => true,
            })
            .collect()
    }

    /// Attached nodes of the subtree rooted at `start`, in pre-order.
    pub(super) fn preorder(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if !self.is_attached(id) {
                continue;
            }
            order.push(id);
            let mut children = self.children(id);
            children.reverse();
            stack.extend(children);
        }
        order
    }
}

fn single(path: &str, candidates: &[NodeId]) -> Result<NodeId, PayloadError> {
    match candidates {
        [only] => Ok(*only),
        [] => Err(PayloadError::PathNotFound {
            path: path.to_owned(),
        }),
        [..] => Err(PayloadError::AmbiguousPath {
            path: path.to_owned(),
            count: candidates.len(),
        }),
    }
}
