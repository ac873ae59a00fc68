//! Cursor tracking: where the pointer is, and where the overlay goes.

use tauri::{AppHandle, Manager};

/// Horizontal gap between the cursor and the overlay's left edge.
pub const CURSOR_OFFSET_X: i32 = 20;

/// Query for the pointer position in screen coordinates.
///
/// `None` means the platform could not answer; the window then keeps its
/// last position.
pub trait CursorSource: Send + Sync + 'static {
    fn current_position(&self) -> Option<(i32, i32)>;
}

/// Reads the cursor through the overlay window.
pub struct TauriCursor {
    app: AppHandle,
    window_label: &'static str,
}

impl TauriCursor {
    pub fn new(app: AppHandle, window_label: &'static str) -> Self {
        Self { app, window_label }
    }
}

impl CursorSource for TauriCursor {
    fn current_position(&self) -> Option<(i32, i32)> {
        let window = self.app.get_webview_window(self.window_label)?;
        match window.cursor_position() {
            Ok(pos) => Some((pos.x.round() as i32, pos.y.round() as i32)),
            Err(e) => {
                log::debug!("[CURSOR] Position unavailable: {}", e);
                None
            }
        }
    }
}

/// Top-left corner for a window of `window` size following `cursor`:
/// offset to the right, vertically centred, kept fully on a `screen`-sized
/// display. A window larger than the screen is pinned to the origin.
pub fn follow_position(cursor: (i32, i32), window: (u32, u32), screen: (u32, u32)) -> (i32, i32) {
    let (cx, cy) = cursor;
    let (ww, wh) = (window.0 as i32, window.1 as i32);
    let (sw, sh) = (screen.0 as i32, screen.1 as i32);

    let x = cx + CURSOR_OFFSET_X;
    let y = cy - wh / 2;

    (x.min(sw - ww).max(0), y.min(sh - wh).max(0))
}
