use eframe::egui::vec2;

use crate::data::KnowledgeGraph;
use crate::util::stable_pair;

use super::super::sim::{SimNode, SimParams};
use super::super::{RenderGraph, ViewModel};

/// Golden angle in radians; successive nodes land on a phyllotaxis spiral so
/// the initial scatter is spread out and fully deterministic.
const SPIRAL_ANGLE: f32 = 2.399_963;

impl ViewModel {
    pub(in crate::app) fn build_render_graph(
        graph: &KnowledgeGraph,
        params: &SimParams,
    ) -> Option<RenderGraph> {
        if graph.is_empty() {
            return None;
        }

        let spiral_step = params.link_distance * 0.25;
        let nodes = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let radius = spiral_step * (0.5 + index as f32).sqrt();
                let angle = (index as f32) * SPIRAL_ANGLE;
                let (jx, jy) = stable_pair(&record.id);
                let world_pos =
                    vec2(angle.cos(), angle.sin()) * radius + vec2(jx, jy) * 4.0;

                SimNode::at(world_pos, record.size)
            })
            .collect::<Vec<_>>();

        let edges = graph
            .links()
            .iter()
            .map(|link| (link.source, link.target))
            .collect::<Vec<_>>();

        Some(RenderGraph {
            nodes,
            edges,
            screen_positions: Vec::new(),
            screen_radii: Vec::new(),
        })
    }
}
