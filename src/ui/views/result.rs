use egui::{Color32, Context, ProgressBar, RichText};

use crate::TetoEgenApp;
use crate::model::AppState;
use crate::ui::layout::{centered_panel, two_button_row};

pub fn ui_result(app: &mut TetoEgenApp, ctx: &Context) {
    // Sin resultado no hay nada que pintar; puede pasar si el almacén se
    // limpió entre frames.
    let Some(results) = app.last_results.clone() else {
        app.state = AppState::Welcome;
        return;
    };

    let mut share_clicked = false;
    let mut restart_clicked = false;

    centered_panel(ctx, 480.0, 600.0, |ui| {
        ui.vertical_centered(|ui| {
            let panel_width = ui.available_width().min(540.0);

            ui.heading("Tu resultado");
            ui.add_space(14.0);

            ui.label(format!("🔥 Teto: {}%", results.teto_percentage));
            ui.add(
                ProgressBar::new(results.teto_percentage as f32 / 100.0)
                    .desired_width(panel_width)
                    .fill(Color32::from_rgb(230, 90, 70)),
            );
            ui.add_space(6.0);
            ui.label(format!("🌙 Egen: {}%", results.egen_percentage));
            ui.add(
                ProgressBar::new(results.egen_percentage as f32 / 100.0)
                    .desired_width(panel_width)
                    .fill(Color32::from_rgb(90, 130, 230)),
            );

            ui.add_space(18.0);
            let title_color = if results.dominant_is_teto() {
                Color32::from_rgb(230, 90, 70)
            } else {
                Color32::from_rgb(90, 130, 230)
            };
            ui.label(
                RichText::new(&results.result.title)
                    .heading()
                    .strong()
                    .color(title_color),
            );
            ui.add_space(8.0);
            ui.label(&results.result.description);
            ui.add_space(8.0);
            ui.label(RichText::new(format!("💡 {}", results.result.advice)).italics());

            ui.add_space(18.0);
            let (share, restart) = two_button_row(ui, panel_width, "📤 Compartir", "🔄 Repetir test");
            share_clicked = share;
            restart_clicked = restart;

            if !app.message.is_empty() {
                ui.add_space(8.0);
                ui.label(&app.message);
            }
        });
    });

    if share_clicked {
        app.compartir_resultado(ctx);
    }
    if restart_clicked {
        app.reiniciar_test();
    }

    share_dialog(app, ctx);
}

/// Diálogo con el texto del resultado para copiarlo a mano; el último
/// peldaño de la cadena de compartir.
fn share_dialog(app: &mut TetoEgenApp, ctx: &Context) {
    let mut copy_clicked = false;
    let mut close_clicked = false;

    if let Some(text) = &app.share_dialog {
        let mut buffer = text.clone();
        egui::Window::new("Compartir resultado")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Copia el texto y compártelo donde quieras:");
                ui.add_space(6.0);
                ui.add(
                    egui::TextEdit::multiline(&mut buffer)
                        .desired_rows(5)
                        .desired_width(360.0),
                );
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("📋 Copiar").clicked() {
                        copy_clicked = true;
                    }
                    if ui.button("Cerrar").clicked() {
                        close_clicked = true;
                    }
                });
            });
    }

    if copy_clicked {
        if let Some(text) = &app.share_dialog {
            ctx.copy_text(text.clone());
        }
        app.message = "📋 Resultado copiado al portapapeles.".into();
    }
    if close_clicked {
        app.share_dialog = None;
    }
}
