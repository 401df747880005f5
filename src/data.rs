// src/data.rs

use std::sync::mpsc::{self, Receiver};

use thiserror::Error;

use crate::model::{Question, ResultBucket};

pub const QUESTIONS_DOC: &str = "questions.json";
pub const RESULTS_DOC: &str = "results.json";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("no se pudo descargar {doc}: HTTP {status}")]
    Http { doc: &'static str, status: u16 },
    #[error("no se pudo descargar {doc}: {message}")]
    Network { doc: &'static str, message: String },
    #[error("no se pudo interpretar {doc}: {source}")]
    Parse {
        doc: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{doc} no contiene entradas")]
    Empty { doc: &'static str },
}

/// Los dos documentos del test, ya interpretados e inmutables.
#[derive(Debug, Clone)]
pub struct QuizData {
    pub questions: Vec<Question>,
    pub buckets: Vec<ResultBucket>,
}

/// De dónde salen los documentos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Copias compiladas en el binario.
    Embedded,
    /// Descarga HTTP: primero preguntas, después resultados.
    Remote { base_url: String },
}

impl DataSource {
    /// En escritorio, los documentos embebidos salvo que `TETO_EGEN_DATA_URL`
    /// apunte a un servidor.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        match std::env::var("TETO_EGEN_DATA_URL") {
            Ok(url) if !url.trim().is_empty() => DataSource::Remote {
                base_url: url.trim().trim_end_matches('/').to_owned(),
            },
            _ => DataSource::Embedded,
        }
    }

    /// En web, la ruta `data` relativa a la página que sirve la app.
    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        DataSource::Remote {
            base_url: "data".to_owned(),
        }
    }
}

pub fn parse_questions(raw: &str) -> Result<Vec<Question>, DataError> {
    let questions: Vec<Question> = serde_json::from_str(raw).map_err(|source| DataError::Parse {
        doc: QUESTIONS_DOC,
        source,
    })?;
    if questions.is_empty() {
        return Err(DataError::Empty { doc: QUESTIONS_DOC });
    }
    Ok(questions)
}

pub fn parse_results(raw: &str) -> Result<Vec<ResultBucket>, DataError> {
    let buckets: Vec<ResultBucket> =
        serde_json::from_str(raw).map_err(|source| DataError::Parse {
            doc: RESULTS_DOC,
            source,
        })?;
    if buckets.is_empty() {
        return Err(DataError::Empty { doc: RESULTS_DOC });
    }
    Ok(buckets)
}

/// Copias embebidas, con el mismo formato que las servidas por HTTP.
pub fn read_embedded() -> Result<QuizData, DataError> {
    let questions = parse_questions(include_str!("data/questions.json"))?;
    let buckets = parse_results(include_str!("data/results.json"))?;
    Ok(QuizData { questions, buckets })
}

/// Lanza la carga en segundo plano y devuelve el canal por el que llegará el
/// resultado; la UI lo sondea cada frame mientras está en `Loading`. No hay
/// cancelación: una descarga en vuelo simplemente se ignora si ya nadie
/// escucha el canal.
pub fn spawn_fetch(source: DataSource) -> Receiver<Result<QuizData, DataError>> {
    let (tx, rx) = mpsc::channel();

    match source {
        DataSource::Embedded => {
            let _ = tx.send(read_embedded());
        }
        DataSource::Remote { base_url } => {
            #[cfg(not(target_arch = "wasm32"))]
            std::thread::spawn(move || {
                let _ = tx.send(fetch_remote_blocking(&base_url));
            });

            #[cfg(target_arch = "wasm32")]
            wasm_bindgen_futures::spawn_local(async move {
                let _ = tx.send(fetch_remote(&base_url).await);
            });
        }
    }

    rx
}

#[cfg(not(target_arch = "wasm32"))]
fn fetch_remote_blocking(base_url: &str) -> Result<QuizData, DataError> {
    let questions = parse_questions(&http_get_blocking(base_url, QUESTIONS_DOC)?)?;
    let buckets = parse_results(&http_get_blocking(base_url, RESULTS_DOC)?)?;
    Ok(QuizData { questions, buckets })
}

#[cfg(not(target_arch = "wasm32"))]
fn http_get_blocking(base_url: &str, doc: &'static str) -> Result<String, DataError> {
    let url = format!("{base_url}/{doc}");
    let response = reqwest::blocking::get(&url).map_err(|err| DataError::Network {
        doc,
        message: err.to_string(),
    })?;
    if !response.status().is_success() {
        return Err(DataError::Http {
            doc,
            status: response.status().as_u16(),
        });
    }
    response.text().map_err(|err| DataError::Network {
        doc,
        message: err.to_string(),
    })
}

#[cfg(target_arch = "wasm32")]
async fn fetch_remote(base_url: &str) -> Result<QuizData, DataError> {
    let questions = parse_questions(&http_get(base_url, QUESTIONS_DOC).await?)?;
    let buckets = parse_results(&http_get(base_url, RESULTS_DOC).await?)?;
    Ok(QuizData { questions, buckets })
}

#[cfg(target_arch = "wasm32")]
async fn http_get(base_url: &str, doc: &'static str) -> Result<String, DataError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let network = |message: String| DataError::Network { doc, message };

    let url = format!("{base_url}/{doc}");
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(&url, &opts)
        .map_err(|err| network(format!("no se pudo crear la petición: {err:?}")))?;
    let window = web_sys::window().ok_or_else(|| network("sin objeto window".into()))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|err| network(format!("{err:?}")))?;
    let response: Response = resp_value
        .dyn_into()
        .map_err(|_| network("la respuesta no es un Response".into()))?;

    if !response.ok() {
        return Err(DataError::Http {
            doc,
            status: response.status(),
        });
    }

    let text_value = JsFuture::from(
        response
            .text()
            .map_err(|err| network(format!("{err:?}")))?,
    )
    .await
    .map_err(|err| network(format!("{err:?}")))?;

    text_value
        .as_string()
        .ok_or_else(|| network("el cuerpo de la respuesta no es texto".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, DEFAULT_QUESTION_COUNT};

    #[test]
    fn embedded_documents_parse() {
        let data = read_embedded().expect("documentos embebidos válidos");
        assert!(data.questions.len() >= DEFAULT_QUESTION_COUNT);
        assert!(!data.buckets.is_empty());
    }

    #[test]
    fn embedded_bank_covers_both_genders() {
        let data = read_embedded().expect("documentos embebidos válidos");
        for gender in [Gender::Male, Gender::Female] {
            let available = data
                .questions
                .iter()
                .filter(|q| q.is_available_for(gender))
                .count();
            assert!(
                available >= DEFAULT_QUESTION_COUNT,
                "solo {available} preguntas para {}",
                gender.as_str()
            );
        }
    }

    #[test]
    fn embedded_question_ids_are_unique() {
        let data = read_embedded().expect("documentos embebidos válidos");
        let mut ids: Vec<&str> = data.questions.iter().map(|q| q.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), data.questions.len());
    }

    #[test]
    fn embedded_buckets_cover_zero_to_hundred_in_order() {
        let data = read_embedded().expect("documentos embebidos válidos");
        let mut expected_min = 0u8;
        for bucket in &data.buckets {
            let [min, max] = bucket.range;
            assert_eq!(min, expected_min, "hueco antes de «{}»", bucket.title);
            assert!(max >= min);
            expected_min = max + 1;
        }
        assert_eq!(expected_min, 101);
    }

    #[test]
    fn malformed_documents_are_a_parse_error() {
        assert!(matches!(
            parse_questions("{ not json"),
            Err(DataError::Parse { doc, .. }) if doc == QUESTIONS_DOC
        ));
        assert!(matches!(
            parse_results("[{\"range\": \"no\"}]"),
            Err(DataError::Parse { doc, .. }) if doc == RESULTS_DOC
        ));
    }

    #[test]
    fn empty_documents_are_rejected() {
        assert!(matches!(
            parse_questions("[]"),
            Err(DataError::Empty { doc }) if doc == QUESTIONS_DOC
        ));
        assert!(matches!(
            parse_results("[]"),
            Err(DataError::Empty { doc }) if doc == RESULTS_DOC
        ));
    }
}
