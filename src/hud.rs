//! Stats panel drawn with egui (feature `egui`).

use crate::field::{ButterflyControl, Phase, Stats};

/// Button presses collected while drawing the panel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HudActions {
    pub form: bool,
    pub reset: bool,
}

impl HudActions {
    /// Forward the presses to a field.
    pub fn apply(self, control: &mut impl ButterflyControl) {
        if self.form {
            control.trigger();
        }
        if self.reset {
            control.reset();
        }
    }
}

/// Draw the stats window and return what was clicked.
pub fn show(ctx: &egui::Context, stats: &Stats) -> HudActions {
    let mut actions = HudActions::default();

    egui::Window::new("Papillon")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            egui::Grid::new("stats").num_columns(2).show(ui, |ui| {
                ui.label("Particles");
                ui.label(stats.particle_count.to_string());
                ui.end_row();

                ui.label("Formed");
                ui.label(stats.formed_count.to_string());
                ui.end_row();

                ui.label("Phase");
                ui.label(stats.phase.to_string());
                ui.end_row();

                ui.label("FPS");
                ui.label(format!("{:.0}", stats.fps));
                ui.end_row();
            });

            ui.add(
                egui::ProgressBar::new(stats.formation_progress / 100.0)
                    .text(format!("{:.0}%", stats.formation_progress)),
            );

            ui.horizontal(|ui| {
                let can_form = stats.phase == Phase::Unformed;
                actions.form = ui.add_enabled(can_form, egui::Button::new("Form")).clicked();
                let can_reset = stats.phase != Phase::Resetting;
                actions.reset = ui.add_enabled(can_reset, egui::Button::new("Reset")).clicked();
            });
        });

    actions
}
