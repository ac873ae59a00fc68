//! UI overlay: the always-on-top window that shows results.
//!
//! The orchestrator pushes state through `OverlaySink`; the webview in
//! `ui/` renders it and calls back through the Tauri commands in
//! `commands.rs`.

mod layout;
mod window;

pub use layout::window_size_for_text;
pub use window::{build_overlay_window, TauriOverlay, OVERLAY_LABEL};

use crate::session::{AnalysisMode, AnalysisResult};
use serde::Serialize;

/// Events emitted to the overlay webview.
pub const EVENT_RESULT: &str = "analysis-result";
pub const EVENT_STATUS: &str = "status-update";
pub const EVENT_MODE: &str = "mode-changed";
pub const EVENT_PHASE: &str = "overlay-phase";
pub const EVENT_AI_STATUS: &str = "ai-status";

/// Overlay state machine: Idle ⇄ Analyzing, Closing is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayPhase {
    Idle,
    Analyzing,
    Closing,
}

impl OverlayPhase {
    /// Applies a requested transition. Nothing leaves Closing.
    pub fn transition(self, next: OverlayPhase) -> OverlayPhase {
        match self {
            OverlayPhase::Closing => OverlayPhase::Closing,
            _ => next,
        }
    }
}

/// Everything the orchestrator can tell the overlay. Implementations must
/// be callable from any thread.
pub trait OverlaySink: Send + Sync + 'static {
    fn update_result(&self, result: &AnalysisResult);
    fn update_status(&self, message: &str);
    fn update_mode(&self, mode: &AnalysisMode);
    fn update_ai_status(&self, label: &str);
    fn set_phase(&self, phase: OverlayPhase);
    fn update_position(&self, x: i32, y: i32);
}
