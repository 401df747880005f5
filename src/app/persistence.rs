use super::*;

/// Escrituras pendientes sobre el almacén clave-valor. Las acciones de la UI
/// las van encolando y se aplican en bloque cuando el frame presta el
/// storage; también desde el hook `save` de eframe al salir.
pub enum StorageAction {
    SaveGender(Gender),
    SaveProgress {
        answers: Vec<Answer>,
        total: usize,
        gender: Gender,
    },
    SaveResult(Box<TestResults>),
    ClearTestData,
    ClearAll,
}

impl TetoEgenApp {
    pub(crate) fn flush_storage(&mut self, storage: &mut dyn eframe::Storage) {
        if self.pending_storage.is_empty() {
            return;
        }

        for action in self.pending_storage.drain(..) {
            match action {
                StorageAction::SaveGender(gender) => storage::save_gender(storage, gender),
                StorageAction::SaveProgress {
                    answers,
                    total,
                    gender,
                } => storage::save_progress(storage, &answers, total, gender),
                StorageAction::SaveResult(results) => storage::save_result(storage, &results),
                StorageAction::ClearTestData => storage::clear_test_data(storage),
                StorageAction::ClearAll => storage::clear_all(storage),
            }
        }
        storage.flush();
    }
}
