use serde::Deserialize;

pub(super) const DEFAULT_NODE_SIZE: f32 = 10.0;

fn default_node_size() -> f32 {
    DEFAULT_NODE_SIZE
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawNode {
    pub(super) id: String,
    #[serde(default)]
    pub(super) label: Option<String>,
    #[serde(default = "default_node_size")]
    pub(super) size: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawLink {
    pub(super) source: String,
    pub(super) target: String,
    #[serde(default)]
    pub(super) label: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct RawGraph {
    #[serde(default)]
    pub(super) nodes: Vec<RawNode>,
    #[serde(default)]
    pub(super) links: Vec<RawLink>,
}
