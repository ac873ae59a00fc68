//! Tauri side of the overlay: window creation and event emission.

use super::{
    layout, OverlayPhase, OverlaySink, EVENT_AI_STATUS, EVENT_MODE, EVENT_PHASE, EVENT_RESULT,
    EVENT_STATUS,
};
use crate::config::WindowBounds;
use crate::cursor::follow_position;
use crate::session::{AnalysisMode, AnalysisResult};
use serde::Serialize;
use std::sync::Mutex;
use tauri::{
    AppHandle, Emitter, LogicalSize, Manager, PhysicalPosition, WebviewUrl, WebviewWindow,
    WebviewWindowBuilder,
};

pub const OVERLAY_LABEL: &str = "overlay";

/// Creates the borderless, always-on-top overlay window.
pub fn build_overlay_window(app: &AppHandle, bounds: &WindowBounds) -> tauri::Result<WebviewWindow> {
    let (width, height) = bounds.initial;
    WebviewWindowBuilder::new(app, OVERLAY_LABEL, WebviewUrl::App("index.html".into()))
        .title("AI Screenshot Analyzer")
        .inner_size(width as f64, height as f64)
        .min_inner_size(bounds.min.0 as f64, bounds.min.1 as f64)
        .max_inner_size(bounds.max.0 as f64, bounds.max.1 as f64)
        .decorations(false)
        .transparent(true)
        .always_on_top(true)
        .skip_taskbar(true)
        .resizable(false)
        .focused(true)
        .build()
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultPayload<'a> {
    result: &'a AnalysisResult,
    display_text: String,
    clock: String,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModePayload<'a> {
    mode: &'a AnalysisMode,
    label: &'static str,
}

/// `OverlaySink` backed by the real window. Safe to call from any thread;
/// Tauri marshals window calls onto the main thread.
pub struct TauriOverlay {
    app: AppHandle,
    bounds: WindowBounds,
    phase: Mutex<OverlayPhase>,
    last_position: Mutex<Option<(i32, i32)>>,
}

impl TauriOverlay {
    pub fn new(app: AppHandle, bounds: WindowBounds) -> Self {
        Self {
            app,
            bounds,
            phase: Mutex::new(OverlayPhase::Idle),
            last_position: Mutex::new(None),
        }
    }

    fn window(&self) -> Option<WebviewWindow> {
        self.app.get_webview_window(OVERLAY_LABEL)
    }

    fn emit<S: Serialize + Clone>(&self, event: &str, payload: S) {
        if let Err(e) = self.app.emit_to(OVERLAY_LABEL, event, payload) {
            log::warn!("[OVERLAY] Failed to emit {}: {}", event, e);
        }
    }

    fn resize_for(&self, text: &str) {
        let Some(window) = self.window() else { return };
        let (width, height) = layout::window_size_for_text(text, &self.bounds);
        match window.set_size(LogicalSize::new(width as f64, height as f64)) {
            Ok(()) => log::debug!("[OVERLAY] Window resized to {}x{}", width, height),
            Err(e) => log::warn!("[OVERLAY] Resize failed: {}", e),
        }
    }
}

impl OverlaySink for TauriOverlay {
    fn update_result(&self, result: &AnalysisResult) {
        let display_text = result.display_text();
        self.resize_for(&display_text);
        self.emit(
            EVENT_RESULT,
            ResultPayload {
                result,
                clock: result.finished_at.format("%H:%M:%S").to_string(),
                display_text,
            },
        );
    }

    fn update_status(&self, message: &str) {
        self.emit(EVENT_STATUS, message);
    }

    fn update_mode(&self, mode: &AnalysisMode) {
        self.emit(
            EVENT_MODE,
            ModePayload {
                mode,
                label: mode.label(),
            },
        );
    }

    fn update_ai_status(&self, label: &str) {
        self.emit(EVENT_AI_STATUS, label);
    }

    fn set_phase(&self, phase: OverlayPhase) {
        let applied = match self.phase.lock() {
            Ok(mut current) => {
                *current = current.transition(phase);
                *current
            }
            Err(_) => return,
        };
        self.emit(EVENT_PHASE, applied);
    }

    fn update_position(&self, x: i32, y: i32) {
        let Some(window) = self.window() else { return };
        let Ok(size) = window.outer_size() else { return };
        let Ok(Some(monitor)) = window.current_monitor() else { return };

        let origin = monitor.position();
        let screen = monitor.size();
        let (rel_x, rel_y) = follow_position(
            (x - origin.x, y - origin.y),
            (size.width, size.height),
            (screen.width, screen.height),
        );
        let target = (rel_x + origin.x, rel_y + origin.y);

        if let Ok(mut last) = self.last_position.lock() {
            if *last == Some(target) {
                return;
            }
            *last = Some(target);
        }

        if let Err(e) = window.set_position(PhysicalPosition::new(target.0, target.1)) {
            log::debug!("[OVERLAY] Move failed: {}", e);
        }
    }
}
