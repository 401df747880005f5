use crate::model::TestResults;

pub const SHARE_TITLE: &str = "Test de personalidad Teto/Egen";

// Enlace que acompaña al texto compartido; en web se usa la URL real de la
// página si está disponible.
const APP_URL: &str = "https://teto-egen.netlify.app";

/// Texto que va a la hoja de compartir, al portapapeles o al diálogo manual.
pub fn build_share_text(results: &TestResults) -> String {
    format!(
        "{SHARE_TITLE}\nTeto: {}% | Egen: {}%\n{}\n\nHaz tú también el test: {}",
        results.teto_percentage,
        results.egen_percentage,
        results.result.title,
        page_url(),
    )
}

fn page_url() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(href) = web_sys::window().and_then(|w| w.location().href().ok()) {
            return href;
        }
    }
    APP_URL.to_owned()
}

/// Hoja de compartir nativa del navegador. Devuelve `false` si no existe y
/// hay que caer al portapapeles. Lanza la promesa y no espera el resultado;
/// si el usuario cancela, puede volver a pulsar el botón.
#[cfg(target_arch = "wasm32")]
pub fn try_native_share(title: &str, text: &str) -> bool {
    use wasm_bindgen::JsValue;

    let Some(window) = web_sys::window() else {
        return false;
    };
    let navigator = window.navigator();

    // navigator.share solo existe en algunos navegadores
    let has_share =
        js_sys::Reflect::has(&navigator, &JsValue::from_str("share")).unwrap_or(false);
    if !has_share {
        return false;
    }

    let data = web_sys::ShareData::new();
    data.set_title(title);
    data.set_text(text);
    if let Ok(href) = window.location().href() {
        data.set_url(&href);
    }
    let _ = navigator.share_with_data(&data);
    true
}

/// En escritorio no hay hoja de compartir: siempre portapapeles.
#[cfg(not(target_arch = "wasm32"))]
pub fn try_native_share(_title: &str, _text: &str) -> bool {
    false
}
