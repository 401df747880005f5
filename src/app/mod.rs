use std::sync::mpsc::Receiver;

use crate::data::{DataError, QuizData};
use crate::model::{Answer, AppState, Gender, TestResults};
use crate::session::Session;
use crate::storage::{self, SavedProgress, SavedSession};

// Submódulos
pub mod actions;
pub mod loading;
pub mod persistence;

pub use persistence::StorageAction;

/// Oferta de reanudación que se muestra al arrancar si quedó un test a medias.
pub struct ResumeOffer {
    pub answers: Vec<Answer>,
    pub progress: SavedProgress,
}

pub struct TetoEgenApp {
    pub state: AppState,
    pub selected_gender: Option<Gender>,
    pub data: Option<QuizData>,
    pub session: Option<Session>,
    pub last_results: Option<TestResults>,
    /// Mensaje transitorio bajo la vista actual.
    pub message: String,
    pub error_message: String,
    pub gender_error: Option<String>,
    pub resume_offer: Option<ResumeOffer>,
    pub share_dialog: Option<String>,
    pub confirm_restart: bool,
    pub(crate) pending_restore: Option<Vec<Answer>>,
    pub(crate) data_rx: Option<Receiver<Result<QuizData, DataError>>>,
    pub(crate) pending_storage: Vec<StorageAction>,
}

impl TetoEgenApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            state: AppState::Welcome,
            selected_gender: None,
            data: None,
            session: None,
            last_results: None,
            message: String::new(),
            error_message: String::new(),
            gender_error: None,
            resume_offer: None,
            share_dialog: None,
            confirm_restart: false,
            pending_restore: None,
            data_rx: None,
            pending_storage: Vec::new(),
        };

        if let Some(storage) = cc.storage {
            app.check_saved_data(storage);
        }

        app
    }

    /// Restaura la selección de género y detecta tests a medias. Solo lee;
    /// cualquier limpieza queda encolada hasta que el frame nos preste el
    /// storage mutable.
    fn check_saved_data(&mut self, storage: &dyn eframe::Storage) {
        if let Some(gender) = storage::load_gender(storage) {
            self.selected_gender = Some(gender);
            log::info!("selección de género restaurada: {}", gender.as_str());
        }

        match storage::load_incomplete(storage) {
            SavedSession::Incomplete { answers, progress } => {
                log::info!(
                    "test incompleto encontrado ({}/{})",
                    progress.current,
                    progress.total
                );
                self.resume_offer = Some(ResumeOffer { answers, progress });
            }
            SavedSession::Corrupt => {
                self.message =
                    "⚠ Los datos guardados no eran válidos. Empieza el test de nuevo.".into();
                self.pending_storage.push(StorageAction::ClearTestData);
            }
            SavedSession::None => {}
        }

        self.last_results = storage::load_last_result(storage);
    }
}
