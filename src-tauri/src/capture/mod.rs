//! Screen capture domain: public API.
//!
//! This module owns grabbing the screen and turning the frame into the
//! payload the vision API accepts. External code should only use the
//! items re-exported here.

mod encode;
mod screenshot;

pub use encode::{encode_jpeg_base64, fit_within, EncodeError};
pub use screenshot::{probe_monitors, CaptureError, ScreenSource, XcapScreen};
