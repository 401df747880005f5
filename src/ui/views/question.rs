use egui::{Button, Context, ProgressBar};

use crate::TetoEgenApp;
use crate::ui::layout::centered_panel;

pub fn ui_question(app: &mut TetoEgenApp, ctx: &Context) {
    // La vista trabaja sobre una copia de render; la sesión solo se toca
    // al final, cuando ya sabemos qué opción se pulsó.
    let Some(view) = app.session.as_ref().and_then(|s| s.current_question()) else {
        return;
    };

    let mut clicked: Option<usize> = None;

    centered_panel(ctx, 420.0, 620.0, |ui| {
        ui.vertical_centered(|ui| {
            let panel_width = ui.available_width().min(560.0);

            ui.add(ProgressBar::new(view.progress).desired_width(panel_width));
            ui.label(view.progress_label());
            ui.add_space(14.0);

            ui.heading(&view.text);
            ui.add_space(16.0);

            let btn_w = (panel_width * 0.95).clamp(200.0, 520.0);
            for (option_index, option) in view.options.iter().enumerate() {
                if ui
                    .add_sized([btn_w, 40.0], Button::new(option))
                    .clicked()
                {
                    clicked = Some(option_index);
                }
                ui.add_space(6.0);
            }

            if !app.message.is_empty() {
                ui.add_space(8.0);
                ui.label(&app.message);
            }
        });
    });

    if let Some(option_index) = clicked {
        app.procesar_respuesta(option_index);
    }
}
