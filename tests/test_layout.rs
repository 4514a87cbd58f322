use std::io::Write;

use eframe::egui::vec2;
use tempfile::NamedTempFile;

use kgraph::app::sim::{SimNode, SimParams, Simulation};
use kgraph::data::{self, DataIntegrityError, RelationDirection};

const SAMPLE_GRAPH: &str = r#"{
    "nodes": [
        { "id": "alpha", "label": "Alpha Corp", "size": 14 },
        { "id": "beta", "size": 9 },
        { "id": "gamma", "label": "Gamma Labs" }
    ],
    "links": [
        { "source": "alpha", "target": "beta", "label": "owns" },
        { "source": "gamma", "target": "alpha", "label": "supplies" }
    ]
}"#;

fn write_graph_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_and_resolves_sample_graph() {
    let file = write_graph_file(SAMPLE_GRAPH);
    let graph = data::load_graph(file.path()).unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.link_count(), 2);

    // Missing label falls back to the identity; missing size to the default.
    let beta = &graph.nodes()[graph.index_of("beta").unwrap()];
    assert_eq!(beta.label, "beta");
    let gamma = &graph.nodes()[graph.index_of("gamma").unwrap()];
    assert_eq!(gamma.size, 10.0);

    let alpha = graph.index_of("alpha").unwrap();
    let relations = graph.relations_for(alpha);
    assert_eq!(relations.len(), 2);
    assert_eq!(relations[0].direction, RelationDirection::Outgoing);
    assert_eq!(relations[0].relation_label, "owns");
    assert_eq!(relations[0].other_id, "beta");
    assert_eq!(relations[1].direction, RelationDirection::Incoming);
    assert_eq!(relations[1].other_id, "gamma");
}

#[test]
fn rejects_file_with_dangling_link() {
    let file = write_graph_file(
        r#"{
            "nodes": [ { "id": "alpha" } ],
            "links": [ { "source": "alpha", "target": "missing" } ]
        }"#,
    );

    let error = data::load_graph(file.path()).unwrap_err();
    let integrity = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<DataIntegrityError>())
        .expect("expected a data integrity error in the chain");
    assert!(matches!(
        integrity,
        DataIntegrityError::DanglingLink { position: 0, .. }
    ));
}

#[test]
fn rejects_missing_file_with_path_in_error() {
    let error = data::load_graph(std::path::Path::new("/nonexistent/graph.json")).unwrap_err();
    assert!(format!("{error:#}").contains("/nonexistent/graph.json"));
}

#[test]
fn loaded_graph_settles_into_a_readable_layout() {
    let file = write_graph_file(SAMPLE_GRAPH);
    let graph = data::load_graph(file.path()).unwrap();

    let mut nodes = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let offset = vec2(index as f32 * 17.0, (index % 2) as f32 * 11.0);
            SimNode::at(offset, record.size)
        })
        .collect::<Vec<_>>();
    let edges = graph
        .links()
        .iter()
        .map(|link| (link.source, link.target))
        .collect::<Vec<_>>();

    let mut sim = Simulation::new(SimParams::default());
    let mut ticks = 0;
    while sim.is_active() && ticks < 400 {
        sim.tick(&mut nodes, &edges);
        ticks += 1;
    }
    assert!(sim.state.is_settled(), "layout still hot after {ticks} ticks");

    for node in &nodes {
        assert!(node.world_pos.x.is_finite() && node.world_pos.y.is_finite());
    }

    // No pair should end up visually merged.
    for a in 0..nodes.len() {
        for b in (a + 1)..nodes.len() {
            let distance = (nodes[a].world_pos - nodes[b].world_pos).length();
            assert!(
                distance > 15.0,
                "nodes {a} and {b} settled too close: {distance}"
            );
        }
    }

    // Centering keeps the layout around the viewport origin.
    let centroid = nodes
        .iter()
        .fold(vec2(0.0, 0.0), |acc, node| acc + node.world_pos)
        / nodes.len() as f32;
    assert!(
        centroid.length() < SimParams::default().link_distance,
        "layout drifted from the origin: centroid {centroid:?}"
    );
}
