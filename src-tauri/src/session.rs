//! Session data model: analysis modes, results, and the process-wide
//! state the orchestrator owns.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// Selects the instruction sent alongside each screenshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "prompt", rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    General,
    Text,
    Ui,
    Summary,
    /// User-supplied instruction, used verbatim.
    Custom(String),
}

impl AnalysisMode {
    /// Next mode in the button/shortcut rotation. Custom is never entered
    /// this way; cycling away from it restarts at General.
    pub fn next(&self) -> AnalysisMode {
        match self {
            AnalysisMode::General => AnalysisMode::Text,
            AnalysisMode::Text => AnalysisMode::Ui,
            AnalysisMode::Ui => AnalysisMode::Summary,
            AnalysisMode::Summary | AnalysisMode::Custom(_) => AnalysisMode::General,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMode::General => "General",
            AnalysisMode::Text => "Text",
            AnalysisMode::Ui => "UI",
            AnalysisMode::Summary => "Summary",
            AnalysisMode::Custom(_) => "Custom",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "lowercase")]
pub enum ResultBody {
    Text(String),
    Error(String),
}

/// Outcome of one cycle, as shown in the overlay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub mode: AnalysisMode,
    pub body: ResultBody,
    pub finished_at: DateTime<Local>,
}

impl AnalysisResult {
    pub fn text(mode: AnalysisMode, text: impl Into<String>) -> Self {
        Self {
            mode,
            body: ResultBody::Text(text.into()),
            finished_at: Local::now(),
        }
    }

    pub fn error(mode: AnalysisMode, message: impl Into<String>) -> Self {
        Self {
            mode,
            body: ResultBody::Error(message.into()),
            finished_at: Local::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.body, ResultBody::Error(_))
    }

    /// Text as rendered in the result area; errors carry an `Error: ` prefix.
    pub fn display_text(&self) -> String {
        match &self.body {
            ResultBody::Text(text) => text.clone(),
            ResultBody::Error(message) => format!("Error: {}", message),
        }
    }
}

/// Where a trigger came from. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOrigin {
    Automatic,
    Manual,
}

impl fmt::Display for TriggerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerOrigin::Automatic => f.write_str("AUTO"),
            TriggerOrigin::Manual => f.write_str("MANUAL"),
        }
    }
}

/// Process-lifetime state. Mutated only by the orchestrator.
#[derive(Debug, Default)]
pub struct SessionState {
    pub mode: AnalysisMode,
    pub last_result: Option<AnalysisResult>,
    pub in_flight: bool,
    pub cursor: Option<(i32, i32)>,
}

impl SessionState {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode.clone(),
            last_result: self.last_result.clone(),
            in_flight: self.in_flight,
        }
    }
}

/// Read-only copy handed to the overlay for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub mode: AnalysisMode,
    pub last_result: Option<AnalysisResult>,
    pub in_flight: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_cycles_return_to_start() {
        for start in [
            AnalysisMode::General,
            AnalysisMode::Text,
            AnalysisMode::Ui,
            AnalysisMode::Summary,
        ] {
            let mut mode = start.clone();
            for _ in 0..4 {
                mode = mode.next();
            }
            assert_eq!(mode, start);
        }
    }

    #[test]
    fn cycle_order_skips_custom() {
        let order: Vec<&str> = std::iter::successors(Some(AnalysisMode::General), |m| {
            Some(m.next())
        })
        .take(5)
        .map(|m| m.label())
        .collect();
        assert_eq!(order, ["General", "Text", "UI", "Summary", "General"]);
    }

    #[test]
    fn custom_cycles_back_to_general() {
        let mode = AnalysisMode::Custom("count the windows".into());
        assert_eq!(mode.next(), AnalysisMode::General);
    }

    #[test]
    fn error_results_are_prefixed() {
        let result = AnalysisResult::error(AnalysisMode::Text, "quota exhausted");
        assert!(result.is_error());
        assert_eq!(result.display_text(), "Error: quota exhausted");

        let result = AnalysisResult::text(AnalysisMode::Text, "Hello");
        assert!(!result.is_error());
        assert_eq!(result.display_text(), "Hello");
    }

    #[test]
    fn mode_serializes_with_prompt() {
        let json = serde_json::to_value(AnalysisMode::Custom("why?".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "custom", "prompt": "why?"}));
        let json = serde_json::to_value(AnalysisMode::Ui).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "ui"}));
    }
}
