use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Etiquetas que puntúan en el test. Una opción puede llevar otra etiqueta;
/// simplemente no cuenta para los porcentajes.
pub const TAG_TETO: &str = "Teto";
pub const TAG_EGEN: &str = "Egen";

/// Preguntas de una sesión estándar.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AnswerOption {
    pub text: String,
    pub tag: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GenderQuestion {
    pub text: String,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub male: Option<GenderQuestion>,
    #[serde(default)]
    pub female: Option<GenderQuestion>,
}

impl Question {
    pub fn for_gender(&self, gender: Gender) -> Option<&GenderQuestion> {
        match gender {
            Gender::Male => self.male.as_ref(),
            Gender::Female => self.female.as_ref(),
        }
    }

    /// Una pregunta entra en la selección si tiene opciones para el género.
    pub fn is_available_for(&self, gender: Gender) -> bool {
        self.for_gender(gender)
            .map(|data| !data.options.is_empty())
            .unwrap_or(false)
    }

    /// Distancia entre opciones Teto y Egen; 0 = pregunta equilibrada.
    pub fn balance_score(&self, gender: Gender) -> Option<usize> {
        let data = self.for_gender(gender)?;
        let teto = data.options.iter().filter(|o| o.tag == TAG_TETO).count();
        let egen = data.options.iter().filter(|o| o.tag == TAG_EGEN).count();
        Some(teto.abs_diff(egen))
    }
}

/// Rango porcentual con su descripción de personalidad. Se asume que los
/// rangos del documento no se solapan y cubren 0–100; no se comprueba.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResultBucket {
    pub range: [u8; 2],
    pub title: String,
    pub description: String,
    pub advice: String,
}

impl ResultBucket {
    pub fn contains(&self, percentage: u8) -> bool {
        let [min, max] = self.range;
        percentage >= min && percentage <= max
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Answer {
    pub question_id: String,
    pub question_index: usize,
    pub option_index: usize,
    pub tag: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TestResults {
    pub teto_count: usize,
    pub egen_count: usize,
    pub teto_percentage: u8,
    pub egen_percentage: u8,
    pub total_answers: usize,
    pub result: ResultBucket,
    pub answers: Vec<Answer>,
    pub gender: Gender,
    pub timestamp: DateTime<Utc>,
}

impl TestResults {
    pub fn dominant_is_teto(&self) -> bool {
        self.teto_percentage > self.egen_percentage
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    Welcome,
    Loading,
    Question,
    Result,
    Error,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::Welcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parses_only_known_values() {
        assert_eq!(Gender::parse("male"), Some(Gender::Male));
        assert_eq!(Gender::parse("female"), Some(Gender::Female));
        assert_eq!(Gender::parse("Male"), None);
        assert_eq!(Gender::parse(""), None);
    }

    #[test]
    fn bucket_contains_is_inclusive_on_both_ends() {
        let bucket = ResultBucket {
            range: [31, 70],
            title: "B".into(),
            description: String::new(),
            advice: String::new(),
        };
        assert!(!bucket.contains(30));
        assert!(bucket.contains(31));
        assert!(bucket.contains(70));
        assert!(!bucket.contains(71));
    }

    #[test]
    fn balance_score_counts_only_teto_and_egen() {
        let question: Question = serde_json::from_str(
            r#"{
                "id": "q1",
                "male": {
                    "text": "¿?",
                    "options": [
                        {"text": "a", "tag": "Teto"},
                        {"text": "b", "tag": "Teto"},
                        {"text": "c", "tag": "Egen"},
                        {"text": "d", "tag": "Otro"}
                    ]
                }
            }"#,
        )
        .expect("pregunta válida");
        assert_eq!(question.balance_score(Gender::Male), Some(1));
        assert_eq!(question.balance_score(Gender::Female), None);
        assert!(question.is_available_for(Gender::Male));
        assert!(!question.is_available_for(Gender::Female));
    }
}
