use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Answer, Gender, TestResults};

// Claves con espacio de nombres propio para no pisar a nadie; el backend
// web de eframe las guarda tal cual en el almacén del navegador.
pub const KEY_GENDER: &str = "tetoegen_gender";
pub const KEY_GENDER_TIMESTAMP: &str = "tetoegen_gender_timestamp";
pub const KEY_ANSWERS: &str = "tetoegen_answers";
pub const KEY_PROGRESS: &str = "tetoegen_progress";
pub const KEY_LAST_RESULT: &str = "tetoegen_last_result";

const ALL_KEYS: [&str; 5] = [
    KEY_GENDER,
    KEY_GENDER_TIMESTAMP,
    KEY_ANSWERS,
    KEY_PROGRESS,
    KEY_LAST_RESULT,
];

/// Un valor por encima de esto no se persiste: dispara la limpieza de
/// entradas antiguas y se descarta, el equivalente a quedarse sin cuota.
const MAX_VALUE_LEN: usize = 64 * 1024;

const RESULT_MAX_AGE_DAYS: i64 = 7;
const GENDER_MAX_AGE_DAYS: i64 = 30;

/// Contadores de progreso de la sesión en curso.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SavedProgress {
    pub current: usize,
    pub total: usize,
    pub timestamp: DateTime<Utc>,
    pub gender: Gender,
}

/// Lo que había guardado al arrancar.
pub enum SavedSession {
    None,
    Incomplete {
        answers: Vec<Answer>,
        progress: SavedProgress,
    },
    /// Había algo pero no se pudo interpretar; hay que limpiar y avisar.
    Corrupt,
}

// eframe::Storage no tiene borrado; la cadena vacía hace de "no existe".
fn remove(storage: &mut dyn eframe::Storage, key: &str) {
    storage.set_string(key, String::new());
}

fn get_nonempty(storage: &dyn eframe::Storage, key: &str) -> Option<String> {
    storage.get_string(key).filter(|value| !value.is_empty())
}

/// Serializa y guarda; devuelve `false` si el valor no se pudo persistir.
fn set_json<T: Serialize>(storage: &mut dyn eframe::Storage, key: &str, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) if json.len() <= MAX_VALUE_LEN => {
            storage.set_string(key, json);
            true
        }
        Ok(json) => {
            log::warn!("valor de {key} demasiado grande ({} bytes), no se persiste", json.len());
            false
        }
        Err(err) => {
            log::warn!("no se pudo serializar {key}: {err}");
            false
        }
    }
}

pub fn save_gender(storage: &mut dyn eframe::Storage, gender: Gender) {
    storage.set_string(KEY_GENDER, gender.as_str().to_owned());
    set_json(storage, KEY_GENDER_TIMESTAMP, &Utc::now());
    log::info!("selección de género guardada: {}", gender.as_str());
}

pub fn load_gender(storage: &dyn eframe::Storage) -> Option<Gender> {
    let raw = get_nonempty(storage, KEY_GENDER)?;
    let gender = Gender::parse(&raw);
    if gender.is_none() {
        log::warn!("género guardado no reconocido: {raw:?}");
    }
    gender
}

/// Respuestas y contadores de la sesión en curso. Si algo no cabe o no se
/// puede serializar, se limpia lo antiguo y se sigue sin persistir.
pub fn save_progress(
    storage: &mut dyn eframe::Storage,
    answers: &[Answer],
    total: usize,
    gender: Gender,
) {
    let progress = SavedProgress {
        current: answers.len(),
        total,
        timestamp: Utc::now(),
        gender,
    };
    let saved = set_json(storage, KEY_ANSWERS, &answers)
        && set_json(storage, KEY_PROGRESS, &progress);
    if saved {
        log::info!("progreso guardado ({}/{})", progress.current, progress.total);
    } else {
        clear_old_entries(storage);
    }
}

/// Sesión incompleta guardada, si la hay. No borra nada: quien llama decide
/// qué hacer con un estado corrupto.
pub fn load_incomplete(storage: &dyn eframe::Storage) -> SavedSession {
    let (Some(raw_answers), Some(raw_progress)) = (
        get_nonempty(storage, KEY_ANSWERS),
        get_nonempty(storage, KEY_PROGRESS),
    ) else {
        return SavedSession::None;
    };

    match (
        serde_json::from_str::<Vec<Answer>>(&raw_answers),
        serde_json::from_str::<SavedProgress>(&raw_progress),
    ) {
        (Ok(answers), Ok(progress)) => SavedSession::Incomplete { answers, progress },
        (answers, progress) => {
            if let Err(err) = answers {
                log::warn!("respuestas guardadas ilegibles: {err}");
            }
            if let Err(err) = progress {
                log::warn!("progreso guardado ilegible: {err}");
            }
            SavedSession::Corrupt
        }
    }
}

pub fn save_result(storage: &mut dyn eframe::Storage, results: &TestResults) {
    if set_json(storage, KEY_LAST_RESULT, results) {
        log::info!("resultado del test guardado");
    } else {
        clear_old_entries(storage);
    }
}

pub fn load_last_result(storage: &dyn eframe::Storage) -> Option<TestResults> {
    let raw = get_nonempty(storage, KEY_LAST_RESULT)?;
    match serde_json::from_str(&raw) {
        Ok(results) => Some(results),
        Err(err) => {
            log::warn!("último resultado ilegible: {err}");
            None
        }
    }
}

/// Borra solo el test en curso; la selección de género se conserva.
pub fn clear_test_data(storage: &mut dyn eframe::Storage) {
    remove(storage, KEY_ANSWERS);
    remove(storage, KEY_PROGRESS);
    log::info!("datos del test en curso eliminados");
}

pub fn clear_all(storage: &mut dyn eframe::Storage) {
    for key in ALL_KEYS {
        remove(storage, key);
    }
    log::info!("todos los datos de la app eliminados");
}

/// Limpieza oportunista cuando algo no se pudo persistir: resultados con más
/// de 7 días y selecciones de género con más de 30 desaparecen. Un timestamp
/// ilegible borra todas nuestras claves como último recurso.
pub fn clear_old_entries(storage: &mut dyn eframe::Storage) {
    let now = Utc::now();

    if let Some(raw) = get_nonempty(storage, KEY_LAST_RESULT) {
        match serde_json::from_str::<TestResults>(&raw) {
            Ok(result) if now - result.timestamp > Duration::days(RESULT_MAX_AGE_DAYS) => {
                remove(storage, KEY_LAST_RESULT);
                log::info!("resultado antiguo eliminado");
            }
            Ok(_) => {}
            Err(_) => remove(storage, KEY_LAST_RESULT),
        }
    }

    if let Some(raw) = get_nonempty(storage, KEY_GENDER_TIMESTAMP) {
        match serde_json::from_str::<DateTime<Utc>>(&raw) {
            Ok(saved) if now - saved > Duration::days(GENDER_MAX_AGE_DAYS) => {
                remove(storage, KEY_GENDER);
                remove(storage, KEY_GENDER_TIMESTAMP);
                log::info!("selección de género antigua eliminada");
            }
            Ok(_) => {}
            Err(err) => {
                log::warn!("timestamp de género ilegible ({err}); se limpia todo");
                clear_all(storage);
            }
        }
    }
}
