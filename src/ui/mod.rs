pub mod layout;
pub mod views;

use crate::TetoEgenApp;
use crate::model::AppState;
use eframe::{App, Frame};
use egui::Context;
use layout::{bottom_panel, top_panel};

impl App for TetoEgenApp {
    fn update(&mut self, ctx: &Context, frame: &mut Frame) {
        // Resultado de la carga en segundo plano, si la hay
        self.poll_data();

        // Escrituras encoladas desde el frame anterior
        if let Some(storage) = frame.storage_mut() {
            self.flush_storage(storage);
        }

        // BOTÓN SUPERIOR DE REINICIAR (solo durante el test y el resultado)
        if matches!(self.state, AppState::Question | AppState::Result) {
            top_panel(self, ctx);
        }

        // PANEL INFERIOR TEMA OSCURO O CLARO
        bottom_panel(ctx);

        // Dispatch por estado a las vistas
        match self.state {
            AppState::Welcome => views::welcome::ui_welcome(self, ctx),
            AppState::Loading => views::loading::ui_loading(self, ctx),
            AppState::Question => views::question::ui_question(self, ctx),
            AppState::Result => views::result::ui_result(self, ctx),
            AppState::Error => views::error::ui_error(self, ctx),
        }

        if self.confirm_restart {
            self.confirm_restart_window(ctx);
        }

        // que el sondeo del canal no tenga que esperar a otro evento de entrada
        if matches!(self.state, AppState::Loading) {
            ctx.request_repaint();
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.flush_storage(storage);
    }
}
