use std::collections::HashSet;

use eframe::egui::{Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::util::ellipsize;

use super::super::render_utils::{
    blend_color, circle_visible, dim_color, draw_background, edge_visible,
};
use super::super::{Camera, RenderGraph, SearchMatchCache, ViewModel};

const NODE_FILL: Color32 = Color32::from_rgb(96, 148, 210);
const NODE_OUTLINE: Color32 = Color32::from_rgba_premultiplied(15, 15, 15, 190);
const EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(72, 72, 72, 200);
const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const HOVERED_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
const MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
const LABEL_COLOR: Color32 = Color32::from_gray(238);

fn fuzzy_match(matcher: &SkimMatcherV2, text: &str, query: &str) -> bool {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
        .is_some()
}

impl ViewModel {
    fn update_screen_space(rect: eframe::egui::Rect, camera: Camera, render: &mut RenderGraph) {
        render.screen_positions.clear();
        render.screen_radii.clear();
        for node in &render.nodes {
            render
                .screen_positions
                .push(camera.world_to_screen(rect, node.world_pos));
            render
                .screen_radii
                .push((node.size * 0.5 * camera.zoom).clamp(2.0, 80.0));
        }
    }

    fn refresh_search_matches(&mut self) {
        let query = self.search.trim();
        if query.is_empty() {
            self.search_matches = None;
            return;
        }

        if let Some(cached) = &self.search_matches
            && cached.query == query
        {
            return;
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .graph
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| fuzzy_match(&matcher, &node.label, query).then_some(index))
            .collect::<HashSet<_>>();

        self.search_matches = Some(SearchMatchCache {
            query: query.to_owned(),
            matches,
        });
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let Some(mut render) = self.render.take() else {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.label("No data to display.");
            });
            return;
        };

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.camera.pan, self.camera.zoom);

        if let Some(animation) = self.camera_animation {
            let now = ui.input(|input| input.time);
            let (camera, done) = animation.sample(now);
            self.camera = camera;
            if done {
                self.camera_animation = None;
            }
            ui.ctx().request_repaint();
        }

        self.handle_interactions(ui, rect, &response, &mut render);

        // One discrete step per frame while the system is warm or held warm
        // by a drag; painting below only ever sees post-tick state.
        if self.simulation.is_active() || self.drag.is_dragging() {
            self.simulation.tick(&mut render.nodes, &render.edges);
            ui.ctx().request_repaint();
        }

        Self::update_screen_space(rect, self.camera, &mut render);
        self.refresh_search_matches();

        let search_active = self
            .search_matches
            .as_ref()
            .is_some_and(|cache| !cache.matches.is_empty());

        for &(source, target) in &render.edges {
            let start = render.screen_positions[source];
            let end = render.screen_positions[target];
            if !edge_visible(rect, start, end, 2.0) {
                continue;
            }

            let color = if search_active {
                dim_color(EDGE_COLOR, 0.5)
            } else {
                EDGE_COLOR
            };
            painter.line_segment([start, end], Stroke::new(1.2, color));
        }

        for (index, node) in render.nodes.iter().enumerate() {
            let position = render.screen_positions[index];
            let radius = render.screen_radii[index];
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let is_selected = self.selected == Some(index);
            let is_hovered = self.hovered == Some(index);
            let is_match = self
                .search_matches
                .as_ref()
                .is_some_and(|cache| cache.matches.contains(&index));

            let color = if is_hovered {
                HOVERED_COLOR
            } else if is_selected {
                SELECTED_COLOR
            } else if is_match {
                blend_color(NODE_FILL, MATCH_COLOR, 0.65)
            } else if search_active {
                dim_color(NODE_FILL, 0.4)
            } else {
                NODE_FILL
            };

            painter.circle_filled(position, radius, color);
            painter.circle_stroke(position, radius, Stroke::new(1.0, NODE_OUTLINE));

            if node.pin.is_some() {
                painter.circle_stroke(
                    position,
                    radius + 3.0,
                    Stroke::new(1.2, blend_color(SELECTED_COLOR, NODE_OUTLINE, 0.3)),
                );
            }

            let label_visible =
                is_selected || is_hovered || is_match || self.camera.zoom > 0.7 || radius > 14.0;
            if label_visible {
                let label = &self.graph.nodes()[index].label;
                painter.text(
                    position + vec2(0.0, radius + 4.0),
                    Align2::CENTER_TOP,
                    ellipsize(label, 28),
                    FontId::proportional(12.0),
                    LABEL_COLOR,
                );
            }
        }

        if let Some(index) = self.hovered
            && let Some(record) = self.graph.nodes().get(index)
        {
            let relation_count = self.graph.relations_for(index).len();
            let status = format!(
                "{}  |  {}  |  {} relations",
                ellipsize(&record.label, 40),
                record.id,
                relation_count
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                status,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        self.render = Some(render);
    }
}
