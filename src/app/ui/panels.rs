use eframe::egui::{self, Align, Context, Layout};

use crate::data::KnowledgeGraph;

use super::super::camera::Camera;
use super::super::sim::{SimParams, Simulation};
use super::super::{DragState, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(graph: KnowledgeGraph, params: SimParams) -> Self {
        let render = Self::build_render_graph(&graph, &params);

        Self {
            graph,
            render,
            simulation: Simulation::new(params),
            camera: Camera::default(),
            camera_animation: None,
            drag: DragState::default(),
            panning: false,
            unpin_on_release: false,
            selected: None,
            info_open: false,
            hovered: None,
            search: String::new(),
            search_matches: None,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        graph_path: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("kgraph");
                    ui.separator();
                    ui.label(format!("source: {graph_path}"));
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("links: {}", self.graph.link_count()));
                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.layout_status_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.info_open {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading knowledge graph...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    fn layout_status_text(&self) -> String {
        if self.drag.is_dragging() {
            "dragging".to_owned()
        } else if self.simulation.is_active() {
            format!("settling (alpha {:.3})", self.simulation.state.alpha)
        } else {
            "settled".to_owned()
        }
    }
}
