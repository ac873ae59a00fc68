//! Build script for the Vision Overlay Tauri app.
//!
//! Only Tauri code generation is needed: capture goes through `xcap` and
//! analysis through plain HTTPS, so there is no platform bridge to compile.

fn main() {
    tauri_build::build();
}
