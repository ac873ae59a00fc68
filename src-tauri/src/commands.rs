//! Tauri commands invoked by the overlay webview.
//!
//! Each one forwards a user action to the orchestrator unchanged.

use crate::llm::prompts::CUSTOM_PROMPT_PLACEHOLDER;
use crate::overlay::OVERLAY_LABEL;
use crate::session::{SessionSnapshot, TriggerOrigin};
use crate::AppOrchestrator;
use serde::Serialize;
use tauri::{AppHandle, Manager, State};

/// Initial state for the webview when it loads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayInit {
    pub session: SessionSnapshot,
    pub mode_label: &'static str,
    pub custom_prompt_placeholder: &'static str,
}

/// Tauri command: "Analyze Now" button / Ctrl+A.
///
/// Returns false when a cycle is already running.
#[tauri::command]
pub fn analyze_now(orchestrator: State<'_, AppOrchestrator>) -> bool {
    orchestrator.trigger_analysis(TriggerOrigin::Manual, None)
}

/// Tauri command: "Mode" button / Ctrl+M. Returns the new mode's label.
#[tauri::command]
pub fn cycle_mode(orchestrator: State<'_, AppOrchestrator>) -> String {
    orchestrator.cycle_mode().label().to_string()
}

/// Tauri command: custom prompt entry (Ctrl+P).
///
/// Switches to Custom mode and starts an analysis straight away.
#[tauri::command]
pub fn submit_custom_prompt(
    orchestrator: State<'_, AppOrchestrator>,
    prompt: String,
) -> Result<bool, String> {
    if !orchestrator.set_custom_prompt(&prompt) {
        return Err("Custom prompt is empty".to_string());
    }
    Ok(orchestrator.trigger_analysis(TriggerOrigin::Manual, None))
}

/// Tauri command: current session, for the first render.
#[tauri::command]
pub fn get_session(orchestrator: State<'_, AppOrchestrator>) -> OverlayInit {
    let session = orchestrator.snapshot();
    OverlayInit {
        mode_label: session.mode.label(),
        session,
        custom_prompt_placeholder: CUSTOM_PROMPT_PLACEHOLDER,
    }
}

/// Tauri command: close button / Esc. Stops the loops without waiting for
/// an in-flight request, then exits.
#[tauri::command]
pub fn close_overlay(app: AppHandle, orchestrator: State<'_, AppOrchestrator>) -> Result<(), String> {
    shutdown(&app, &orchestrator);
    Ok(())
}

/// Shared exit path for the close command and the tray's Quit entry.
pub fn shutdown(app: &AppHandle, orchestrator: &AppOrchestrator) {
    orchestrator.stop();
    if let Some(window) = app.get_webview_window(OVERLAY_LABEL) {
        if let Err(e) = window.close() {
            log::warn!("[OVERLAY] Close failed: {}", e);
        }
    }
    app.exit(0);
}
