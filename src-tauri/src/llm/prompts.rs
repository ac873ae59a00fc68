//! Instruction templates sent with each screenshot.
//!
//! One fixed template per built-in mode. The text depends only on the mode,
//! never on the image.

use crate::session::AnalysisMode;

pub const GENERAL_PROMPT: &str = "Analyze this screenshot and provide insights about what you see.
Focus on:
- Main content and purpose
- Important text or information
- UI elements or interface details
- Any notable patterns or data
Keep the response concise but informative.";

pub const TEXT_PROMPT: &str = "Extract all visible text from this screenshot.
Organize it in a clear, readable format.
Preserve the structure and hierarchy of the content.
If there are multiple sections, separate them clearly.";

pub const UI_PROMPT: &str = "Describe the user interface elements in this screenshot.
Focus on:
- Buttons, menus, and interactive elements
- Layout and design patterns
- Navigation structure
- Key functionality visible
- Color scheme and visual hierarchy
Be specific about locations and element types.";

pub const SUMMARY_PROMPT: &str = "Provide a concise summary of the main content in this screenshot.
Focus on:
- Primary purpose or function
- Key information displayed
- Main topics or themes
- Important data or metrics
- Overall context and significance
Keep it brief but comprehensive.";

/// Pre-filled text for the custom prompt entry.
pub const CUSTOM_PROMPT_PLACEHOLDER: &str = "Analyze this screenshot and tell me...";

/// Instruction text for `mode`. Custom prompts are passed through verbatim.
pub fn instruction_for(mode: &AnalysisMode) -> &str {
    match mode {
        AnalysisMode::General => GENERAL_PROMPT,
        AnalysisMode::Text => TEXT_PROMPT,
        AnalysisMode::Ui => UI_PROMPT,
        AnalysisMode::Summary => SUMMARY_PROMPT,
        AnalysisMode::Custom(prompt) => prompt,
    }
}
