//! Vision Overlay: Tauri application entry point.
//!
//! This is the app shell that wires together:
//! - Startup configuration (config.rs)
//! - Screen capture domain (capture/)
//! - Vision analysis client (llm/)
//! - Overlay window and cursor following (overlay/, cursor.rs)
//! - The orchestrator that drives capture → analyze → display (orchestrator.rs)
//! - System tray (tray.rs) and Tauri command handlers (commands.rs)

pub mod capture;
mod commands;
pub mod config;
pub mod cursor;
pub mod llm;
pub mod orchestrator;
pub mod overlay;
pub mod session;
mod tray;

use config::{AppConfig, StartupError};
use cursor::TauriCursor;
use llm::OpenAiClient;
use orchestrator::Orchestrator;
use overlay::{TauriOverlay, OVERLAY_LABEL};
use std::process::ExitCode;
use std::sync::Arc;
use tauri::Manager;

/// The orchestrator as wired in the running app.
pub type AppOrchestrator = Orchestrator<OpenAiClient>;

/// Entry point, called by `main`. Returns a failure code when startup
/// fails; after the window is up the process exits through Tauri.
pub fn run() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match launch() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("[STARTUP] {}", e);
            eprintln!("vision-overlay: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn launch() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;

    let monitors = capture::probe_monitors()
        .map_err(|e| StartupError::CaptureUnavailable(e.to_string()))?;
    log::info!("[STARTUP] {} monitor(s) available for capture", monitors);

    let client = OpenAiClient::new(config.api.clone())
        .map_err(|e| StartupError::Init(format!("HTTP client: {}", e)))?;

    // One runtime for Tauri's async commands and our background loops.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("vision-overlay")
        .build()
        .map_err(|e| StartupError::Init(format!("async runtime: {}", e)))?;
    tauri::async_runtime::set(runtime.handle().clone());
    let guard = runtime.enter();

    let app = tauri::Builder::default()
        .invoke_handler(tauri::generate_handler![
            commands::analyze_now,
            commands::cycle_mode,
            commands::submit_custom_prompt,
            commands::get_session,
            commands::close_overlay
        ])
        .setup(move |app| {
            log::info!("Vision Overlay starting up (model {})", client.model());
            let handle = app.handle().clone();

            let overlay = Arc::new(TauriOverlay::new(handle.clone(), config.window));
            let cursor = Arc::new(TauriCursor::new(handle.clone(), OVERLAY_LABEL));
            let orchestrator: AppOrchestrator = Orchestrator::new(
                Arc::new(capture::XcapScreen),
                client,
                overlay,
                cursor,
                config.loops,
            );
            // Managed before the window exists so its first command succeeds.
            app.manage(orchestrator.clone());

            overlay::build_overlay_window(&handle, &config.window)?;
            tray::setup_tray(&handle)?;
            orchestrator.start();

            log::info!("Controls: Esc close | Ctrl+A analyze now | Ctrl+M cycle mode | Ctrl+P custom prompt");
            Ok(())
        })
        .build(tauri::generate_context!())
        .map_err(|e| StartupError::Init(e.to_string()))?;

    app.run(|app_handle, event| {
        if let tauri::RunEvent::ExitRequested { .. } = event {
            if let Some(orchestrator) = app_handle.try_state::<AppOrchestrator>() {
                orchestrator.stop();
            }
        }
    });

    drop(guard);
    runtime.shutdown_background();
    Ok(())
}
