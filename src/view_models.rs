// src/view_models.rs

/// Datos listos para pintar la pregunta actual: texto del género elegido,
/// opciones en orden y progreso de la sesión. La vista no toca la sesión.
#[derive(Clone, Debug)]
pub struct QuestionView {
    pub text: String,
    pub options: Vec<String>,
    pub index: usize,
    pub total: usize,
    pub progress: f32,
}

impl QuestionView {
    pub fn progress_label(&self) -> String {
        format!("{} / {}", self.index + 1, self.total)
    }
}
