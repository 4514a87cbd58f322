use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::graph::{KnowledgeGraph, NodeRecord, UnresolvedLink};
use super::schema::{DEFAULT_NODE_SIZE, RawGraph};

pub fn load_graph(path: &Path) -> Result<KnowledgeGraph> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;

    let graph = parse_graph(&raw)
        .with_context(|| format!("failed to load graph from {}", path.display()))?;

    log::info!(
        "loaded knowledge graph: {} nodes, {} links",
        graph.node_count(),
        graph.link_count()
    );
    Ok(graph)
}

pub fn parse_graph(raw: &str) -> Result<KnowledgeGraph> {
    let parsed: RawGraph = serde_json::from_str(raw).context("invalid graph JSON")?;

    let nodes = parsed
        .nodes
        .into_iter()
        .map(|raw_node| {
            let size = if raw_node.size.is_finite() && raw_node.size > 0.0 {
                raw_node.size
            } else {
                DEFAULT_NODE_SIZE
            };

            NodeRecord {
                label: raw_node
                    .label
                    .filter(|label| !label.is_empty())
                    .unwrap_or_else(|| raw_node.id.clone()),
                size,
                id: raw_node.id,
            }
        })
        .collect::<Vec<_>>();

    let links = parsed
        .links
        .into_iter()
        .map(|raw_link| UnresolvedLink {
            source: raw_link.source,
            target: raw_link.target,
            label: raw_link.label,
        })
        .collect::<Vec<_>>();

    let graph = KnowledgeGraph::build(nodes, links).context("graph failed integrity checks")?;
    Ok(graph)
}
