#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use teto_egen::TetoEgenApp;

    env_logger::init();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Test Teto/Egen",
        options,
        Box::new(|cc| Ok(Box::new(TetoEgenApp::new(cc)))),
    )
}

// En web la app se arranca desde la lib (cdylib); este binario no pinta nada.
#[cfg(target_arch = "wasm32")]
fn main() {}
