//! Remote video frame capture for abuse reports.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

/// JPEG quality passed to `toDataURL`.
pub const SNAPSHOT_QUALITY: f64 = 0.8;

/// A video element can only be drawn once it has decoded a frame.
#[must_use]
pub fn frame_available(video_width: u32, video_height: u32) -> bool {
    video_width > 0 && video_height > 0
}

/// Capture the stranger's current video frame as a JPEG data URL.
///
/// Returns `None` when there is no remote video element or it has no frame.
#[cfg(feature = "hydrate")]
pub fn capture_remote_frame() -> Option<String> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()?.document()?;
    let video = document
        .get_element_by_id(crate::net::peer::REMOTE_VIDEO_ID)?
        .dyn_into::<web_sys::HtmlVideoElement>()
        .ok()?;
    let (width, height) = (video.video_width(), video.video_height());
    if !frame_available(width, height) {
        return None;
    }

    let canvas = document
        .create_element("canvas")
        .ok()?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .ok()?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()
        .ok()?;
    ctx.draw_image_with_html_video_element_and_dw_and_dh(&video, 0.0, 0.0, f64::from(width), f64::from(height))
        .ok()?;
    canvas
        .to_data_url_with_type_and_encoder_options("image/jpeg", &wasm_bindgen::JsValue::from_f64(SNAPSHOT_QUALITY))
        .ok()
}

#[cfg(not(feature = "hydrate"))]
pub fn capture_remote_frame() -> Option<String> {
    None
}
