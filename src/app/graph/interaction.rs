use eframe::egui::{self, CursorIcon, Rect, Ui, Vec2};

use super::super::camera::CameraAnimation;
use super::super::sim::{DRAG_ALPHA_TARGET, SimNode, SimState};
use super::super::{RenderGraph, ViewModel};

/// Gesture events fed to the drag state machine. The egui response is
/// translated into these at the edge, so the transitions themselves need no
/// live rendering surface.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) enum DragEvent {
    Start { index: usize, world: Vec2 },
    Move { world: Vec2 },
    End,
}

/// Drag phase: `Idle → Dragging → Idle`. Start reheats the simulation and
/// pins the grabbed node; Move tracks the pointer; End restores the resting
/// temperature and leaves the pin in place (release-to-unpin is opt-in).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) enum DragState {
    #[default]
    Idle,
    Dragging {
        index: usize,
    },
}

impl DragState {
    /// Applies one event; returns the released node index when a drag ends.
    /// Events that do not match the current phase are ignored, so a repeated
    /// End (gesture noise, capture loss) is a no-op.
    pub(in crate::app) fn apply(
        &mut self,
        event: DragEvent,
        nodes: &mut [SimNode],
        state: &mut SimState,
    ) -> Option<usize> {
        match (*self, event) {
            (Self::Idle, DragEvent::Start { index, world }) if index < nodes.len() => {
                state.alpha_target = DRAG_ALPHA_TARGET;
                nodes[index].pin = Some(world);
                nodes[index].world_pos = world;
                nodes[index].velocity = Vec2::ZERO;
                *self = Self::Dragging { index };
                None
            }
            (Self::Dragging { index }, DragEvent::Move { world }) => {
                if let Some(node) = nodes.get_mut(index) {
                    node.pin = Some(world);
                    node.world_pos = world;
                }
                None
            }
            (Self::Dragging { index }, DragEvent::End) => {
                state.alpha_target = 0.0;
                *self = Self::Idle;
                Some(index)
            }
            _ => None,
        }
    }

    pub(in crate::app) fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

impl ViewModel {
    /// Nearest node whose circle contains the given world-space point. A
    /// small zoom-scaled slack keeps tiny nodes clickable when zoomed out.
    pub(in crate::app) fn hovered_node(
        &self,
        render: &RenderGraph,
        pointer_world: Vec2,
    ) -> Option<usize> {
        let min_pick_radius = 4.0 / self.camera.zoom.max(0.1);

        render
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let distance = (node.world_pos - pointer_world).length();
                let radius = (node.size * 0.5).max(min_pick_radius);
                (distance <= radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.camera.zoom_around(rect, pointer, factor);
    }

    pub(in crate::app) fn handle_interactions(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        render: &mut RenderGraph,
    ) {
        self.handle_zoom(ui, rect, response);

        let pointer = ui.input(|input| input.pointer.hover_pos());
        self.hovered = pointer
            .filter(|_| response.hovered())
            .and_then(|pos| self.hovered_node(render, self.camera.screen_to_world(rect, pos)));

        if self.hovered.is_some() && !self.drag.is_dragging() {
            ui.output_mut(|output| output.cursor_icon = CursorIcon::PointingHand);
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(index) = self.hovered {
                // Grabbing a node takes over the camera's attention.
                self.camera_animation = None;
                let world = render.nodes[index].world_pos;
                self.drag.apply(
                    DragEvent::Start { index, world },
                    &mut render.nodes,
                    &mut self.simulation.state,
                );
            } else {
                self.panning = true;
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            if self.drag.is_dragging() {
                if let Some(pos) = pointer {
                    let world = self.camera.screen_to_world(rect, pos);
                    self.drag.apply(
                        DragEvent::Move { world },
                        &mut render.nodes,
                        &mut self.simulation.state,
                    );
                }
            } else if self.panning {
                self.camera.pan_by(response.drag_delta());
            }
        } else if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.camera.pan_by(response.drag_delta());
        }

        // Release, or capture loss with the button no longer down, both end
        // the drag with the pin at its last received position.
        let primary_down = ui.input(|input| input.pointer.primary_down());
        if self.drag.is_dragging() && (response.drag_stopped() || !primary_down) {
            let released = self.drag.apply(
                DragEvent::End,
                &mut render.nodes,
                &mut self.simulation.state,
            );
            if self.unpin_on_release
                && let Some(index) = released
                && let Some(node) = render.nodes.get_mut(index)
            {
                node.pin = None;
            }
        }
        if !primary_down {
            self.panning = false;
        }

        if response.double_clicked() {
            if let Some(index) = self.hovered {
                let now = ui.input(|input| input.time);
                self.camera_animation = Some(CameraAnimation::focus_on(
                    self.camera,
                    render.nodes[index].world_pos,
                    now,
                ));
            }
        } else if response.clicked()
            && let Some(index) = self.hovered
        {
            self.selected = Some(index);
            self.info_open = true;
        }
    }
}
