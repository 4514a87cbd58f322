mod graph;
mod load;
mod schema;

pub use graph::{
    DataIntegrityError, KnowledgeGraph, LinkRecord, NodeRecord, RelationDirection, RelationEntry,
    UnresolvedLink,
};
pub use load::{load_graph, parse_graph};
