use super::*;
use crate::model::DEFAULT_QUESTION_COUNT;
use crate::share;

impl TetoEgenApp {
    /// Form de bienvenida: fija el género y lo deja persistido.
    pub fn seleccionar_genero(&mut self, gender: Gender) {
        self.selected_gender = Some(gender);
        self.gender_error = None;
        self.pending_storage.push(StorageAction::SaveGender(gender));
    }

    /// Botón de empezar: valida el form y pasa a cargar los documentos.
    pub fn empezar_test(&mut self) {
        if self.selected_gender.is_none() {
            self.gender_error = Some("Selecciona un género para empezar.".into());
            return;
        }
        self.gender_error = None;
        self.start_loading();
    }

    /// El usuario acepta continuar el test a medias. La selección de
    /// preguntas se rehace desde cero y las respuestas guardadas se
    /// reproducen encima.
    pub fn reanudar_guardado(&mut self) {
        let Some(offer) = self.resume_offer.take() else {
            return;
        };
        self.selected_gender = Some(offer.progress.gender);
        self.pending_restore = Some(offer.answers);
        self.start_loading();
    }

    /// El usuario descarta el test a medias.
    pub fn descartar_guardado(&mut self) {
        self.resume_offer = None;
        self.pending_restore = None;
        self.pending_storage.push(StorageAction::ClearTestData);
        log::info!("test a medias descartado");
    }

    /// Con los documentos ya cargados: selecciona preguntas, reproduce el
    /// progreso pendiente si lo hay y entra en la primera pregunta.
    pub(crate) fn arrancar_preguntas(&mut self) {
        let (Some(gender), Some(data)) = (self.selected_gender, self.data.as_ref()) else {
            self.mostrar_error("No se pudo iniciar el test. Vuelve a intentarlo.");
            return;
        };

        let mut session = Session::new(gender, &data.questions, DEFAULT_QUESTION_COUNT);
        if session.total() == 0 {
            self.mostrar_error("No hay preguntas disponibles. Vuelve a intentarlo más tarde.");
            return;
        }

        if let Some(saved) = self.pending_restore.take() {
            session.restore_answers(saved);
        }

        let already_complete = session.is_complete();
        self.session = Some(session);
        self.message.clear();

        if already_complete {
            // reanudado con todo contestado: directo al resultado
            self.finalizar_test();
        } else {
            self.state = AppState::Question;
        }
    }

    /// Respuesta a la pregunta actual: registra, persiste y avanza o termina.
    pub fn procesar_respuesta(&mut self, option_index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.submit_answer(option_index) {
            Ok(outcome) => {
                self.pending_storage.push(StorageAction::SaveProgress {
                    answers: session.answers().to_vec(),
                    total: session.total(),
                    gender: session.gender(),
                });
                if outcome.is_complete {
                    self.finalizar_test();
                }
            }
            Err(err) => {
                log::error!("respuesta rechazada: {err}");
                self.mostrar_error("No se pudo registrar la respuesta. Vuelve a intentarlo.");
            }
        }
    }

    /// Calcula porcentajes y bucket, persiste el resultado y muestra la
    /// pantalla final. Los datos del test en curso ya no hacen falta.
    pub(crate) fn finalizar_test(&mut self) {
        let (Some(session), Some(data)) = (self.session.as_ref(), self.data.as_ref()) else {
            self.mostrar_error("No se pudo calcular el resultado. Vuelve a intentarlo.");
            return;
        };

        match session.compute_results(&data.buckets) {
            Ok(results) => {
                log::info!(
                    "resultado: Teto {}% / Egen {}% → «{}»",
                    results.teto_percentage,
                    results.egen_percentage,
                    results.result.title
                );
                self.pending_storage
                    .push(StorageAction::SaveResult(Box::new(results.clone())));
                self.pending_storage.push(StorageAction::ClearTestData);
                self.last_results = Some(results);
                self.state = AppState::Result;
            }
            Err(err) => {
                log::error!("error al calcular el resultado: {err}");
                self.mostrar_error("Error al calcular el resultado. Vuelve a intentarlo.");
            }
        }
    }

    /// Botón compartir: hoja nativa si existe; si no, portapapeles más el
    /// diálogo con el texto para copiar a mano.
    pub fn compartir_resultado(&mut self, ctx: &egui::Context) {
        let Some(results) = self.last_results.as_ref() else {
            log::warn!("no hay resultado que compartir");
            return;
        };

        let text = share::build_share_text(results);
        if share::try_native_share(share::SHARE_TITLE, &text) {
            self.message = "📤 Compartiendo…".into();
        } else {
            ctx.copy_text(text.clone());
            self.share_dialog = Some(text);
            self.message = "📋 Resultado copiado al portapapeles.".into();
        }
    }

    /// Vuelta a la bienvenida. La selección de género se conserva; el test
    /// en curso y sus datos guardados, no.
    pub fn reiniciar_test(&mut self) {
        self.session = None;
        self.share_dialog = None;
        self.confirm_restart = false;
        self.pending_restore = None;
        self.pending_storage.push(StorageAction::ClearTestData);
        self.state = AppState::Welcome;
        self.message.clear();
        log::info!("test reiniciado");
    }

    /// Reintento desde la pantalla de error.
    pub fn reintentar(&mut self) {
        self.error_message.clear();
        self.state = AppState::Welcome;
    }

    pub(crate) fn mostrar_error(&mut self, message: &str) {
        self.error_message = message.to_owned();
        self.state = AppState::Error;
    }

    /// Confirmación antes de abandonar un test en marcha.
    pub fn confirm_restart_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("Confirmar reinicio")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("¿Seguro que quieres abandonar el test? El progreso guardado se borrará.");
                ui.horizontal(|ui| {
                    if ui.button("Sí, reiniciar").clicked() {
                        self.reiniciar_test();
                    }
                    if ui.button("No").clicked() {
                        self.confirm_restart = false;
                    }
                });
            });
    }
}
