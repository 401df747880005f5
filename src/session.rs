use chrono::Utc;
use rand::Rng;
use thiserror::Error;

use crate::model::{Answer, Gender, Question, ResultBucket, TestResults, TAG_EGEN, TAG_TETO};
use crate::view_models::QuestionView;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("la sesión ya está completa, no quedan preguntas por responder")]
    AlreadyComplete,
    #[error("índice de opción fuera de rango: {index} (la pregunta tiene {len})")]
    InvalidOption { index: usize, len: usize },
    #[error("la sesión aún no está completa ({answered}/{total})")]
    NotComplete { answered: usize, total: usize },
    #[error("la lista de resultados está vacía")]
    NoResultData,
}

/// Lo que devuelve cada respuesta: si la sesión quedó completa, la fracción
/// respondida y los datos de render de la siguiente pregunta (si queda).
#[derive(Debug)]
pub struct AnswerOutcome {
    pub is_complete: bool,
    pub progress: f32,
    pub next_question: Option<QuestionView>,
}

/// Una pasada del test: género, subconjunto de preguntas elegido, posición
/// actual y respuestas acumuladas. Lógica pura, sin egui ni almacenamiento;
/// la capa de presentación la posee y la descarta al reiniciar.
pub struct Session {
    gender: Gender,
    questions: Vec<Question>,
    current_index: usize,
    answers: Vec<Answer>,
}

impl Session {
    /// Crea la sesión seleccionando hasta `count` preguntas equilibradas
    /// para el género indicado.
    pub fn new(gender: Gender, bank: &[Question], count: usize) -> Self {
        let questions = select_balanced(bank, gender, count);
        Self {
            gender,
            questions,
            current_index: 0,
            answers: Vec::new(),
        }
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    /// Datos de render de la pregunta actual, o `None` si ya no quedan.
    pub fn current_question(&self) -> Option<QuestionView> {
        let question = self.questions.get(self.current_index)?;
        let data = question.for_gender(self.gender)?;
        Some(QuestionView {
            text: data.text.clone(),
            options: data.options.iter().map(|o| o.text.clone()).collect(),
            index: self.current_index,
            total: self.questions.len(),
            progress: (self.current_index + 1) as f32 / self.questions.len() as f32,
        })
    }

    /// Registra la respuesta a la pregunta actual y avanza. Responder con la
    /// sesión completa o con un índice de opción inválido es un error de
    /// contrato del llamante, no algo que vea el usuario.
    pub fn submit_answer(&mut self, option_index: usize) -> Result<AnswerOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::AlreadyComplete);
        }

        let question = &self.questions[self.current_index];
        let data = question
            .for_gender(self.gender)
            .expect("las preguntas seleccionadas siempre tienen opciones para el género");
        let option = data
            .options
            .get(option_index)
            .ok_or(SessionError::InvalidOption {
                index: option_index,
                len: data.options.len(),
            })?;

        self.answers.push(Answer {
            question_id: question.id.clone(),
            question_index: self.current_index,
            option_index,
            tag: option.tag.clone(),
            text: option.text.clone(),
            timestamp: Utc::now(),
        });
        self.current_index += 1;
        log::info!(
            "respuesta registrada ({}/{})",
            self.current_index,
            self.questions.len()
        );

        Ok(AnswerOutcome {
            is_complete: self.is_complete(),
            progress: self.current_index as f32 / self.questions.len() as f32,
            next_question: self.current_question(),
        })
    }

    /// Recoloca la sesión sobre respuestas guardadas tras una recarga. La
    /// selección de preguntas es nueva, así que las preguntas restantes
    /// pueden no coincidir con las que el usuario habría visto; las
    /// respuestas ya dadas conservan su etiqueta y su orden, que es lo que
    /// puntúa.
    pub fn restore_answers(&mut self, saved: Vec<Answer>) {
        self.current_index = saved.len().min(self.questions.len());
        self.answers = saved;
        log::info!(
            "progreso restaurado ({}/{})",
            self.current_index,
            self.questions.len()
        );
    }

    /// Recuento de etiquetas y porcentajes enteros; devuelve el primer bucket
    /// cuyo rango contiene el porcentaje Teto, o el primero de la lista si
    /// ninguno encaja.
    pub fn compute_results(&self, buckets: &[ResultBucket]) -> Result<TestResults, SessionError> {
        if !self.is_complete() {
            return Err(SessionError::NotComplete {
                answered: self.answers.len(),
                total: self.questions.len(),
            });
        }

        let teto_count = self.answers.iter().filter(|a| a.tag == TAG_TETO).count();
        let egen_count = self.answers.iter().filter(|a| a.tag == TAG_EGEN).count();
        let total_answers = self.answers.len();
        let teto_percentage = percentage(teto_count, total_answers);
        let egen_percentage = percentage(egen_count, total_answers);

        let result = buckets
            .iter()
            .find(|b| b.contains(teto_percentage))
            .or_else(|| buckets.first())
            .cloned()
            .ok_or(SessionError::NoResultData)?;

        Ok(TestResults {
            teto_count,
            egen_count,
            teto_percentage,
            egen_percentage,
            total_answers,
            result,
            answers: self.answers.clone(),
            gender: self.gender,
            timestamp: Utc::now(),
        })
    }
}

fn percentage(count: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u8
}

/// Filtra las preguntas con opciones para el género y elige `count`
/// favoreciendo las de puntuación de equilibrio baja; los empates se
/// deciden al azar. Si hay menos de `count` disponibles se seleccionan
/// todas, con un aviso en el log.
fn select_balanced(bank: &[Question], gender: Gender, count: usize) -> Vec<Question> {
    let available: Vec<&Question> = bank
        .iter()
        .filter(|q| q.is_available_for(gender))
        .collect();

    if available.len() < count {
        log::warn!(
            "se pidieron {count} preguntas pero solo hay {} disponibles",
            available.len()
        );
    }

    let mut rng = rand::thread_rng();
    let mut scored: Vec<(usize, u32, &Question)> = available
        .into_iter()
        .map(|q| {
            let balance = q.balance_score(gender).unwrap_or(usize::MAX);
            (balance, rng.r#gen::<u32>(), q)
        })
        .collect();
    scored.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    scored
        .into_iter()
        .take(count)
        .map(|(_, _, q)| q.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOption, GenderQuestion};

    fn question(id: &str, tags: &[&str]) -> Question {
        let options: Vec<AnswerOption> = tags
            .iter()
            .enumerate()
            .map(|(i, tag)| AnswerOption {
                text: format!("opción {i}"),
                tag: (*tag).to_owned(),
            })
            .collect();
        Question {
            id: id.to_owned(),
            male: Some(GenderQuestion {
                text: format!("pregunta {id} (él)"),
                options: options.clone(),
            }),
            female: Some(GenderQuestion {
                text: format!("pregunta {id} (ella)"),
                options,
            }),
        }
    }

    fn balanced_bank(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| question(&format!("q{i:02}"), &["Teto", "Egen", "Teto", "Egen"]))
            .collect()
    }

    fn buckets() -> Vec<ResultBucket> {
        [("A", [0u8, 30u8]), ("B", [31, 70]), ("C", [71, 100])]
            .into_iter()
            .map(|(title, range)| ResultBucket {
                range,
                title: title.to_owned(),
                description: String::new(),
                advice: String::new(),
            })
            .collect()
    }

    #[test]
    fn selects_min_of_count_and_available() {
        let bank = balanced_bank(12);
        assert_eq!(Session::new(Gender::Male, &bank, 10).total(), 10);

        let small = balanced_bank(4);
        assert_eq!(Session::new(Gender::Female, &small, 10).total(), 4);
    }

    #[test]
    fn skips_questions_without_options_for_the_gender() {
        let mut bank = balanced_bank(3);
        bank[0].male = None;
        bank[1].male = Some(GenderQuestion {
            text: "sin opciones".into(),
            options: vec![],
        });

        let session = Session::new(Gender::Male, &bank, 10);
        assert_eq!(session.total(), 1);
        // para el otro género siguen estando las tres
        assert_eq!(Session::new(Gender::Female, &bank, 10).total(), 3);
    }

    #[test]
    fn balanced_questions_are_preferred() {
        let mut bank = balanced_bank(10);
        for i in 0..5 {
            bank.push(question(&format!("raro{i}"), &["Teto", "Teto", "Teto"]));
        }

        let session = Session::new(Gender::Male, &bank, 10);
        assert_eq!(session.total(), 10);
        for q in &session.questions {
            assert_eq!(q.balance_score(Gender::Male), Some(0));
        }
    }

    #[test]
    fn submit_advances_and_reports_completion() {
        let bank = balanced_bank(3);
        let mut session = Session::new(Gender::Male, &bank, 3);

        let first = session.submit_answer(0).expect("primera respuesta");
        assert!(!first.is_complete);
        assert!((first.progress - 1.0 / 3.0).abs() < f32::EPSILON);
        let next = first.next_question.expect("queda pregunta");
        assert_eq!(next.index, 1);
        assert_eq!(next.progress_label(), "2 / 3");

        session.submit_answer(1).expect("segunda respuesta");
        let last = session.submit_answer(2).expect("tercera respuesta");
        assert!(last.is_complete);
        assert!(last.next_question.is_none());
        assert!(session.is_complete());
    }

    #[test]
    fn submit_past_completion_is_an_error() {
        let bank = balanced_bank(1);
        let mut session = Session::new(Gender::Male, &bank, 1);
        session.submit_answer(0).expect("única respuesta");
        let err = session.submit_answer(0).expect_err("sesión completa");
        assert_eq!(err, SessionError::AlreadyComplete);
    }

    #[test]
    fn out_of_range_option_is_an_error() {
        let bank = balanced_bank(2);
        let mut session = Session::new(Gender::Male, &bank, 2);
        let err = session.submit_answer(99).expect_err("índice inválido");
        assert_eq!(err, SessionError::InvalidOption { index: 99, len: 4 });
        // la sesión no avanza tras el rechazo
        assert_eq!(session.answers().len(), 0);
        assert_eq!(session.current_question().map(|v| v.index), Some(0));
    }

    #[test]
    fn results_before_completion_are_an_error() {
        let bank = balanced_bank(2);
        let mut session = Session::new(Gender::Male, &bank, 2);
        session.submit_answer(0).expect("respuesta");
        let err = session.compute_results(&buckets()).expect_err("incompleta");
        assert_eq!(
            err,
            SessionError::NotComplete {
                answered: 1,
                total: 2
            }
        );
    }

    #[test]
    fn percentages_are_integer_rounding_of_counts() {
        // opciones: 0=Teto 1=Egen 2=Teto 3=Egen
        let bank = balanced_bank(3);
        let mut session = Session::new(Gender::Male, &bank, 3);
        session.submit_answer(0).expect("Teto");
        session.submit_answer(1).expect("Egen");
        session.submit_answer(3).expect("Egen");

        let results = session.compute_results(&buckets()).expect("resultado");
        assert_eq!(results.teto_count, 1);
        assert_eq!(results.egen_count, 2);
        assert_eq!(results.teto_percentage, 33);
        assert_eq!(results.egen_percentage, 67);
        assert_eq!(results.total_answers, 3);
    }

    #[test]
    fn tags_outside_teto_egen_do_not_count() {
        let bank = vec![
            question("q1", &["Teto", "Otro"]),
            question("q2", &["Egen", "Otro"]),
        ];
        let mut session = Session::new(Gender::Female, &bank, 2);
        session.submit_answer(1).expect("Otro");
        session.submit_answer(1).expect("Otro");

        let results = session.compute_results(&buckets()).expect("resultado");
        assert!(results.teto_count + results.egen_count <= results.total_answers);
        assert_eq!(results.teto_percentage, 0);
        assert_eq!(results.egen_percentage, 0);
    }

    #[test]
    fn fifty_percent_lands_in_the_middle_bucket() {
        let bank = balanced_bank(10);
        let mut session = Session::new(Gender::Male, &bank, 10);
        for i in 0..10 {
            // alterna Teto (0) y Egen (1)
            session.submit_answer(i % 2).expect("respuesta");
        }

        let results = session.compute_results(&buckets()).expect("resultado");
        assert_eq!(results.teto_percentage, 50);
        assert_eq!(results.result.title, "B");
    }

    #[test]
    fn falls_back_to_first_bucket_when_no_range_matches() {
        let bank = balanced_bank(2);
        let mut session = Session::new(Gender::Male, &bank, 2);
        session.submit_answer(0).expect("Teto");
        session.submit_answer(0).expect("Teto");

        let sparse = vec![ResultBucket {
            range: [0, 10],
            title: "único".into(),
            description: String::new(),
            advice: String::new(),
        }];
        let results = session.compute_results(&sparse).expect("resultado");
        assert_eq!(results.teto_percentage, 100);
        assert_eq!(results.result.title, "único");
    }

    #[test]
    fn empty_bucket_list_is_an_error() {
        let bank = balanced_bank(1);
        let mut session = Session::new(Gender::Male, &bank, 1);
        session.submit_answer(0).expect("respuesta");
        assert_eq!(
            session.compute_results(&[]).expect_err("sin buckets"),
            SessionError::NoResultData
        );
    }

    #[test]
    fn full_teto_run_hits_the_highest_bucket() {
        let bank = balanced_bank(10);
        let mut session = Session::new(Gender::Male, &bank, 10);
        for _ in 0..10 {
            session.submit_answer(0).expect("Teto");
        }

        let results = session.compute_results(&buckets()).expect("resultado");
        assert_eq!(results.teto_percentage, 100);
        assert_eq!(results.egen_percentage, 0);
        assert_eq!(results.result.title, "C");
        assert!(results.dominant_is_teto());
    }

    #[test]
    fn restore_positions_the_session_after_the_saved_answers() {
        let bank = balanced_bank(10);
        let mut donor = Session::new(Gender::Male, &bank, 10);
        for _ in 0..4 {
            donor.submit_answer(0).expect("respuesta");
        }
        let saved = donor.answers().to_vec();

        let mut resumed = Session::new(Gender::Male, &bank, 10);
        resumed.restore_answers(saved);
        assert!(!resumed.is_complete());
        assert_eq!(resumed.answers().len(), 4);
        assert_eq!(resumed.current_question().map(|v| v.index), Some(4));

        let tags: Vec<&str> = resumed.answers().iter().map(|a| a.tag.as_str()).collect();
        assert_eq!(tags, vec!["Teto"; 4]);
    }
}
