//! System tray setup and click handler.
//!
//! The tray icon mirrors the overlay's controls so the app stays usable
//! when the overlay is behind a full-screen window.

use crate::session::TriggerOrigin;
use crate::AppOrchestrator;
use tauri::{
    image::Image as TauriImage,
    menu::{MenuBuilder, MenuItemBuilder},
    tray::TrayIconBuilder,
    AppHandle, Manager,
};

/// Sets up the system tray icon.
///
/// Left-click: manual analysis.
/// Right-click: menu with Analyze Now, Next Mode and Quit.
pub fn setup_tray(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    let analyze_item = MenuItemBuilder::with_id("analyze", "Analyze Now").build(app)?;
    let mode_item = MenuItemBuilder::with_id("mode", "Next Mode").build(app)?;
    let quit_item = MenuItemBuilder::with_id("quit", "Quit").build(app)?;
    let menu = MenuBuilder::new(app)
        .item(&analyze_item)
        .item(&mode_item)
        .separator()
        .item(&quit_item)
        .build()?;

    // Decode the PNG icon to RGBA for Tauri's Image type
    let icon_bytes = include_bytes!("../icons/32x32.png");
    let icon_img = image::load_from_memory(icon_bytes)
        .map_err(|e| format!("Failed to decode tray icon: {}", e))?;
    let rgba = icon_img.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let tray_icon = TauriImage::new_owned(rgba.into_raw(), w, h);

    let _tray = TrayIconBuilder::new()
        .icon(tray_icon)
        .tooltip("AI Screenshot Analyzer")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_tray_icon_event(|tray_icon, event| {
            if let tauri::tray::TrayIconEvent::Click {
                button: tauri::tray::MouseButton::Left,
                button_state: tauri::tray::MouseButtonState::Up,
                ..
            } = event
            {
                log::info!("Tray icon clicked, starting analysis");
                let orchestrator = tray_icon.app_handle().state::<AppOrchestrator>();
                orchestrator.trigger_analysis(TriggerOrigin::Manual, None);
            }
        })
        .on_menu_event(|app, event| {
            let orchestrator = app.state::<AppOrchestrator>();
            match event.id().0.as_str() {
                "analyze" => {
                    orchestrator.trigger_analysis(TriggerOrigin::Manual, None);
                }
                "mode" => {
                    orchestrator.cycle_mode();
                }
                "quit" => {
                    log::info!("Quit requested from tray menu");
                    crate::commands::shutdown(app, &orchestrator);
                }
                _ => {}
            }
        })
        .build(app)?;

    Ok(())
}
