use egui::{Button, Color32, Context, RichText};

use crate::TetoEgenApp;
use crate::model::Gender;
use crate::ui::layout::centered_panel;

pub fn ui_welcome(app: &mut TetoEgenApp, ctx: &Context) {
    centered_panel(ctx, 320.0, 540.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("Test de personalidad Teto/Egen");
            ui.add_space(6.0);
            ui.label("Diez preguntas para saber hacia qué lado te inclinas.");
            ui.add_space(18.0);

            ui.label("¿Cómo quieres que te preguntemos?");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.add_space((ui.available_width() - 220.0).max(0.0) / 2.0);
                if ui
                    .radio(app.selected_gender == Some(Gender::Male), "👨 Hombre")
                    .clicked()
                {
                    app.seleccionar_genero(Gender::Male);
                }
                ui.add_space(16.0);
                if ui
                    .radio(app.selected_gender == Some(Gender::Female), "👩 Mujer")
                    .clicked()
                {
                    app.seleccionar_genero(Gender::Female);
                }
            });

            if let Some(error) = &app.gender_error {
                ui.add_space(6.0);
                ui.label(RichText::new(error).color(Color32::LIGHT_RED));
            }

            ui.add_space(18.0);
            let btn_w = (ui.available_width() * 0.9).clamp(120.0, 400.0);
            let start = ui.add_enabled(
                app.selected_gender.is_some(),
                Button::new("▶ Empezar el test").min_size([btn_w, 40.0].into()),
            );
            if start.clicked() {
                app.empezar_test();
            }

            if !app.message.is_empty() {
                ui.add_space(10.0);
                ui.label(&app.message);
            }
        });
    });

    resume_window(app, ctx);
}

/// Ventana de reanudación si quedó un test a medias guardado.
fn resume_window(app: &mut TetoEgenApp, ctx: &Context) {
    let mut resume_clicked = false;
    let mut discard_clicked = false;

    if let Some(offer) = &app.resume_offer {
        egui::Window::new("Test sin terminar")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Tienes un test a medias ({}/{} preguntas). ¿Quieres continuar donde lo dejaste?",
                    offer.progress.current, offer.progress.total
                ));
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("▶ Continuar").clicked() {
                        resume_clicked = true;
                    }
                    if ui.button("🗑 Descartar").clicked() {
                        discard_clicked = true;
                    }
                });
            });
    }

    if resume_clicked {
        app.reanudar_guardado();
    }
    if discard_clicked {
        app.descartar_guardado();
    }
}
