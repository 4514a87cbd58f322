use std::collections::HashSet;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2};

use crate::data::{self, KnowledgeGraph};

pub mod camera;
mod graph;
mod render_utils;
pub mod sim;
mod ui;

use camera::{Camera, CameraAnimation};
use graph::interaction::DragState;
use sim::{SimNode, SimParams, Simulation};

type LoadResult = Result<KnowledgeGraph, String>;

pub struct GraphViewApp {
    graph_path: String,
    params: SimParams,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: KnowledgeGraph,
    /// Kinematic + projection state; `None` for a zero-node graph, which
    /// renders a placeholder and never touches the solver.
    render: Option<RenderGraph>,
    simulation: Simulation,
    camera: Camera,
    camera_animation: Option<CameraAnimation>,
    drag: DragState,
    panning: bool,
    unpin_on_release: bool,
    selected: Option<usize>,
    info_open: bool,
    hovered: Option<usize>,
    search: String,
    search_matches: Option<SearchMatchCache>,
}

struct SearchMatchCache {
    query: String,
    matches: HashSet<usize>,
}

struct RenderGraph {
    nodes: Vec<SimNode>,
    edges: Vec<(usize, usize)>,
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
}

impl GraphViewApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, graph_path: String, params: SimParams) -> Self {
        let state = Self::start_load(graph_path.clone());
        Self {
            graph_path,
            params,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(graph_path: String) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result =
                data::load_graph(Path::new(&graph_path)).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(graph_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(graph_path),
        }
    }
}

impl eframe::App for GraphViewApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(graph) => {
                            AppState::Ready(Box::new(ViewModel::new(graph, self.params)))
                        }
                        Err(error) => {
                            log::error!("graph load failed: {error}");
                            AppState::Error(error)
                        }
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading knowledge graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load knowledge graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.graph_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.graph_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.graph_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(graph) => {
                                    AppState::Ready(Box::new(ViewModel::new(graph, self.params)))
                                }
                                Err(error) => {
                                    log::error!("graph reload failed: {error}");
                                    AppState::Error(error)
                                }
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background loader disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
