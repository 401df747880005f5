use egui::{Button, Color32, Context, RichText};

use crate::TetoEgenApp;
use crate::ui::layout::centered_panel;

pub fn ui_error(app: &mut TetoEgenApp, ctx: &Context) {
    let mut retry_clicked = false;

    centered_panel(ctx, 220.0, 480.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("⚠").size(40.0));
            ui.add_space(8.0);
            ui.heading("Algo ha salido mal");
            ui.add_space(8.0);
            ui.label(RichText::new(&app.error_message).color(Color32::LIGHT_RED));
            ui.add_space(16.0);

            if ui
                .add_sized([200.0, 40.0], Button::new("🔁 Reintentar"))
                .clicked()
            {
                retry_clicked = true;
            }
        });
    });

    if retry_clicked {
        app.reintentar();
    }
}
