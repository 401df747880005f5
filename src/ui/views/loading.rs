use egui::Context;

use crate::TetoEgenApp;
use crate::ui::layout::centered_panel;

pub fn ui_loading(_app: &mut TetoEgenApp, ctx: &Context) {
    centered_panel(ctx, 120.0, 400.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.spinner();
            ui.add_space(10.0);
            ui.label("Cargando preguntas…");
        });
    });
}
