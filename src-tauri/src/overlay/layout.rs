//! Window sizing from result text. Pure arithmetic, no toolkit calls.

use crate::config::WindowBounds;

const LINE_HEIGHT: u32 = 15;
const CHROME_HEIGHT: u32 = 140;
const CHAR_WIDTH: u32 = 8;
const CHROME_WIDTH: u32 = 60;
/// Wider text wraps instead of growing the window past this.
const READABLE_WIDTH: u32 = 600;

/// Window size that fits `text`, clamped into `bounds`. Empty text gets the
/// minimum size.
pub fn window_size_for_text(text: &str, bounds: &WindowBounds) -> (u32, u32) {
    if text.trim().is_empty() {
        return bounds.min;
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;

    let height = (lines.len() as u32)
        .saturating_mul(LINE_HEIGHT)
        .saturating_add(CHROME_HEIGHT);
    let width = longest
        .saturating_mul(CHAR_WIDTH)
        .saturating_add(CHROME_WIDTH)
        .min(READABLE_WIDTH);

    (
        width.clamp(bounds.min.0, bounds.max.0),
        height.clamp(bounds.min.1, bounds.max.1),
    )
}
