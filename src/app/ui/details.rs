use eframe::egui::{self, Align, Layout, RichText, Ui};

use crate::util::ellipsize;

use super::super::camera::CameraAnimation;
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Node Info");
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("✕").on_hover_text("Close the info panel").clicked() {
                    self.info_open = false;
                }
            });
        });
        ui.add_space(6.0);

        let Some(index) = self.selected else {
            ui.label("Click a node in the graph to inspect it.");
            return;
        };
        let Some(record) = self.graph.nodes().get(index) else {
            ui.label("The selected node is no longer present.");
            return;
        };

        ui.label(RichText::new(record.label.as_str()).strong());
        ui.small(record.id.as_str());
        ui.add_space(6.0);
        ui.label(format!("Size: {:.1}", record.size));

        let relations = self.graph.relations_for(index);
        ui.label(format!("Relations: {}", relations.len()));

        ui.separator();
        ui.label(RichText::new("Relations").strong());
        if relations.is_empty() {
            ui.label("This node has no relations.");
            return;
        }

        let mut follow = None;
        egui::ScrollArea::vertical()
            .id_salt("relations_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entry in &relations {
                    let glyph = entry.direction.glyph();
                    let row = format!(
                        "{} {glyph} {} {glyph} {}",
                        ellipsize(&entry.subject_label, 24),
                        entry.relation_label,
                        entry.other_id,
                    );

                    if ui
                        .link(row)
                        .on_hover_text(entry.other_id.as_str())
                        .clicked()
                    {
                        follow = Some(entry.other_index);
                    }
                }
            });

        if let Some(other_index) = follow {
            self.selected = Some(other_index);
            if let Some(render) = &self.render
                && let Some(node) = render.nodes.get(other_index)
            {
                let now = ui.input(|input| input.time);
                self.camera_animation =
                    Some(CameraAnimation::focus_on(self.camera, node.world_pos, now));
            }
        }
    }
}
