use std::collections::HashMap;

use thiserror::Error;

/// Load-time graph integrity failures. Raised before any simulation tick; the
/// viewer never renders a graph with unresolved link endpoints.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataIntegrityError {
    #[error("duplicate node identity {id:?}")]
    DuplicateNode { id: String },
    #[error("link {position} references unknown node {id:?}")]
    DanglingLink { position: usize, id: String },
}

/// Immutable node description. Kinematic state lives in the render graph, not
/// here.
#[derive(Clone, Debug)]
pub struct NodeRecord {
    pub id: String,
    pub label: String,
    pub size: f32,
}

/// A directed relation with endpoints resolved to indices into the owned node
/// table. The node table is append-only for the lifetime of a session, so
/// indices stay valid.
#[derive(Clone, Debug)]
pub struct LinkRecord {
    pub source: usize,
    pub target: usize,
    pub label: String,
}

/// A link as it appears in the input, before endpoint resolution.
#[derive(Clone, Debug)]
pub struct UnresolvedLink {
    pub source: String,
    pub target: String,
    pub label: String,
}

#[derive(Clone, Debug, Default)]
pub struct KnowledgeGraph {
    nodes: Vec<NodeRecord>,
    links: Vec<LinkRecord>,
    index_by_id: HashMap<String, usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationDirection {
    Outgoing,
    Incoming,
}

impl RelationDirection {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Outgoing => "→",
            Self::Incoming => "←",
        }
    }
}

/// One row of the selected-node relation list, in link insertion order.
#[derive(Clone, Debug)]
pub struct RelationEntry {
    pub subject_label: String,
    pub relation_label: String,
    pub direction: RelationDirection,
    pub other_index: usize,
    pub other_id: String,
}

impl KnowledgeGraph {
    pub fn build(
        nodes: Vec<NodeRecord>,
        links: Vec<UnresolvedLink>,
    ) -> Result<Self, DataIntegrityError> {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if index_by_id.insert(node.id.clone(), index).is_some() {
                return Err(DataIntegrityError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
        }

        let mut resolved = Vec::with_capacity(links.len());
        for (position, link) in links.into_iter().enumerate() {
            let source = *index_by_id.get(&link.source).ok_or_else(|| {
                DataIntegrityError::DanglingLink {
                    position,
                    id: link.source.clone(),
                }
            })?;
            let target = *index_by_id.get(&link.target).ok_or_else(|| {
                DataIntegrityError::DanglingLink {
                    position,
                    id: link.target.clone(),
                }
            })?;

            resolved.push(LinkRecord {
                source,
                target,
                label: link.label,
            });
        }

        Ok(Self {
            nodes,
            links: resolved,
            index_by_id,
        })
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn links(&self) -> &[LinkRecord] {
        &self.links
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// Collects the relation rows for a selected node: every link whose source
    /// or target is the node, in insertion order. A self-loop is reported as
    /// outgoing only.
    pub fn relations_for(&self, index: usize) -> Vec<RelationEntry> {
        let Some(subject) = self.nodes.get(index) else {
            return Vec::new();
        };

        self.links
            .iter()
            .filter_map(|link| {
                let (direction, other_index) = if link.source == index {
                    (RelationDirection::Outgoing, link.target)
                } else if link.target == index {
                    (RelationDirection::Incoming, link.source)
                } else {
                    return None;
                };

                Some(RelationEntry {
                    subject_label: subject.label.clone(),
                    relation_label: link.label.clone(),
                    direction,
                    other_index,
                    other_id: self.nodes[other_index].id.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> NodeRecord {
        NodeRecord {
            id: id.to_string(),
            label: id.to_string(),
            size: 10.0,
        }
    }

    fn link(source: &str, target: &str, label: &str) -> UnresolvedLink {
        UnresolvedLink {
            source: source.to_string(),
            target: target.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn dangling_link_fails_at_build() {
        let result = KnowledgeGraph::build(vec![node("a"), node("b")], vec![link("a", "x", "r")]);
        assert_eq!(
            result.unwrap_err(),
            DataIntegrityError::DanglingLink {
                position: 0,
                id: "x".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_node_identity_fails_at_build() {
        let result = KnowledgeGraph::build(vec![node("a"), node("a")], Vec::new());
        assert_eq!(
            result.unwrap_err(),
            DataIntegrityError::DuplicateNode {
                id: "a".to_string(),
            }
        );
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = KnowledgeGraph::build(Vec::new(), Vec::new()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn relations_preserve_link_insertion_order() {
        let graph = KnowledgeGraph::build(
            vec![node("a"), node("b"), node("c")],
            vec![link("a", "b", "knows"), link("c", "b", "knows")],
        )
        .unwrap();

        let selected = graph.index_of("b").unwrap();
        let relations = graph.relations_for(selected);
        assert_eq!(relations.len(), 2);

        assert_eq!(relations[0].direction, RelationDirection::Incoming);
        assert_eq!(relations[0].other_id, "a");
        assert_eq!(relations[0].relation_label, "knows");
        assert_eq!(relations[0].subject_label, "b");

        assert_eq!(relations[1].direction, RelationDirection::Incoming);
        assert_eq!(relations[1].other_id, "c");
    }

    #[test]
    fn self_loop_reports_as_outgoing_once() {
        let graph =
            KnowledgeGraph::build(vec![node("a")], vec![link("a", "a", "references")]).unwrap();

        let relations = graph.relations_for(0);
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].direction, RelationDirection::Outgoing);
        assert_eq!(relations[0].other_id, "a");
    }

    #[test]
    fn relations_for_out_of_range_index_is_empty() {
        let graph = KnowledgeGraph::build(vec![node("a")], Vec::new()).unwrap();
        assert!(graph.relations_for(7).is_empty());
    }
}
