use std::sync::mpsc::TryRecvError;

use super::*;
use crate::data::{self, DataSource};

const LOAD_ERROR_MESSAGE: &str =
    "No se pudo cargar el test. Comprueba tu conexión e inténtalo de nuevo.";

impl TetoEgenApp {
    /// Lanza la descarga de los dos documentos y pasa a `Loading`. Los
    /// documentos son inmutables: con una carga por ejecución basta.
    pub(crate) fn start_loading(&mut self) {
        if self.data.is_some() {
            self.arrancar_preguntas();
            return;
        }

        let source = DataSource::from_env();
        log::info!("cargando documentos del test ({source:?})");
        self.data_rx = Some(data::spawn_fetch(source));
        self.state = AppState::Loading;
    }

    /// Sondea el canal de carga; se llama una vez por frame.
    pub(crate) fn poll_data(&mut self) {
        let Some(rx) = self.data_rx.as_ref() else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(data)) => {
                log::info!(
                    "documentos cargados: {} preguntas, {} resultados",
                    data.questions.len(),
                    data.buckets.len()
                );
                self.data = Some(data);
                self.data_rx = None;
                self.arrancar_preguntas();
            }
            Ok(Err(err)) => {
                log::error!("fallo al cargar los documentos: {err}");
                self.data_rx = None;
                self.pending_restore = None;
                self.mostrar_error(LOAD_ERROR_MESSAGE);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                log::error!("el cargador terminó sin enviar resultado");
                self.data_rx = None;
                self.pending_restore = None;
                self.mostrar_error(LOAD_ERROR_MESSAGE);
            }
        }
    }
}
