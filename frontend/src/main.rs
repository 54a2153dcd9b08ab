#[cfg(target_arch = "wasm32")]
fn main() {
    use connect_grill_web::{config, web};
    use log::{error, info};

    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting site scripts");
    if let Err(e) = web::start() {
        error!("Site scripts failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("connect-grill targets the browser; build it with `trunk build` for wasm32.");
}
