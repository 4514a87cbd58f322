use eframe::egui::{self, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (node label)")
            .on_hover_text("Fuzzy-highlight matching nodes without changing the layout.");
        ui.text_edit_singleline(&mut self.search);

        ui.separator();

        let mut params_changed = false;
        ui.collapsing("Force tuning", |ui| {
            let params = &mut self.simulation.params;

            params_changed |= ui
                .add(
                    egui::Slider::new(&mut params.link_distance, 30.0..=300.0)
                        .text("Link distance")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Rest length of the spring between linked nodes.")
                .changed();

            params_changed |= ui
                .add(
                    egui::Slider::new(&mut params.link_strength, 0.0..=2.0)
                        .text("Link strength")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("How strongly linked nodes pull toward their rest distance.")
                .changed();

            params_changed |= ui
                .add(
                    egui::Slider::new(&mut params.charge_strength, -2000.0..=0.0)
                        .text("Charge")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Many-body force; more negative pushes nodes apart harder.")
                .changed();

            params_changed |= ui
                .add(
                    egui::Slider::new(&mut params.center_strength, 0.0..=0.5)
                        .text("Centering")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Pull toward the center of the viewport.")
                .changed();

            params_changed |= ui
                .add(
                    egui::Slider::new(&mut params.collision_margin, 0.0..=20.0)
                        .text("Collision margin")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Extra clearance kept around every node circle.")
                .changed();
        });
        if params_changed {
            self.simulation.reheat();
        }

        ui.separator();

        ui.checkbox(&mut self.unpin_on_release, "Unpin nodes on release")
            .on_hover_text(
                "When enabled, a dragged node rejoins the simulation as soon as it is dropped. \
                 Otherwise it stays where you left it.",
            );

        ui.add_space(4.0);

        ui.horizontal(|ui| {
            if ui
                .button("Reheat layout")
                .on_hover_text("Restart the settle animation from full temperature.")
                .clicked()
            {
                self.simulation.reheat();
            }

            let pinned = self
                .render
                .as_ref()
                .map(|render| render.nodes.iter().filter(|node| node.pin.is_some()).count())
                .unwrap_or(0);
            if ui
                .add_enabled(pinned > 0, egui::Button::new(format!("Release pins ({pinned})")))
                .on_hover_text("Drop every pin left behind by dragging.")
                .clicked()
                && let Some(render) = self.render.as_mut()
            {
                for node in &mut render.nodes {
                    node.pin = None;
                }
                self.simulation.reheat();
            }
        });

        if ui
            .button("Reset view")
            .on_hover_text("Return to the initial pan and zoom.")
            .clicked()
        {
            self.camera = super::super::camera::Camera::default();
            self.camera_animation = None;
        }
    }
}
