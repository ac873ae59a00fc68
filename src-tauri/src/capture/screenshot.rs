//! Full-screen capture using the `xcap` crate.
//!
//! This is the infrastructure layer: it talks to the OS. The orchestrator
//! only sees the `ScreenSource` trait so tests can swap in fixed frames.

use image::DynamicImage;
use xcap::Monitor;

/// Anything that can produce a full-screen frame on demand.
///
/// Implementations hold no state between calls and may block; the
/// orchestrator calls them from a blocking worker.
pub trait ScreenSource: Send + Sync + 'static {
    fn capture(&self) -> Result<DynamicImage, CaptureError>;
}

/// Captures the primary monitor through `xcap`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapScreen;

impl ScreenSource for XcapScreen {
    fn capture(&self) -> Result<DynamicImage, CaptureError> {
        let primary = primary_monitor()?;

        let image = primary
            .capture_image()
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

        if image.width() == 0 || image.height() == 0 {
            return Err(CaptureError::EmptyFrame);
        }

        Ok(DynamicImage::ImageRgba8(image))
    }
}

/// Checks at startup that at least one monitor can be enumerated.
///
/// Returns the number of monitors found.
pub fn probe_monitors() -> Result<usize, CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;
    if monitors.is_empty() {
        return Err(CaptureError::NoPrimaryMonitor);
    }
    Ok(monitors.len())
}

fn primary_monitor() -> Result<Monitor, CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;

    // If no monitor reports as primary, use the first one
    let primary = monitors
        .iter()
        .position(|m| m.is_primary().unwrap_or(false))
        .unwrap_or(0);

    monitors
        .into_iter()
        .nth(primary)
        .ok_or(CaptureError::NoPrimaryMonitor)
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No monitor found")]
    NoPrimaryMonitor,

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error("Screen capture returned an empty frame")]
    EmptyFrame,
}
