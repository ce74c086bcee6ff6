//! Abuse report assembly.
//!
//! The screenshot is captured by [`super::snapshot`]; this module validates
//! it and builds the `client-report` payload. Keeping the decision here means
//! "no frame, no event" holds regardless of how the UI wires the dialog.

#[cfg(test)]
#[path = "report_test.rs"]
mod report_test;

use events::{ClientEvent, ReportPayload};

use crate::state::toast::ToastKind;

/// Notice shown when there is no frame to attach.
pub const NO_FRAME_NOTICE: &str = "No video frame available to report";
/// Notice shown when the channel is not running.
pub const REPORT_FAILED_NOTICE: &str = "Report could not be sent. Try again.";
/// Notice shown after the report was queued.
pub const REPORT_SENT_NOTICE: &str = "Report submitted. Thank you.";

/// Preset report reasons offered by the dialog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportReason {
    #[default]
    Inappropriate,
    Harassment,
    Spam,
    Underage,
    Other,
}

impl ReportReason {
    pub const ALL: [Self; 5] = [Self::Inappropriate, Self::Harassment, Self::Spam, Self::Underage, Self::Other];

    /// Value carried in the payload's `reason` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inappropriate => "inappropriate",
            Self::Harassment => "harassment",
            Self::Spam => "spam",
            Self::Underage => "underage",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Inappropriate => "Inappropriate content",
            Self::Harassment => "Harassment",
            Self::Spam => "Spam or advertising",
            Self::Underage => "Appears underage",
            Self::Other => "Something else",
        }
    }

    #[must_use]
    pub fn from_value(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == raw)
    }
}

/// Why a report could not be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportError {
    /// No remote video frame could be captured.
    NoFrame,
}

impl ReportError {
    #[must_use]
    pub fn notice(self) -> &'static str {
        match self {
            Self::NoFrame => NO_FRAME_NOTICE,
        }
    }
}

/// Build the report payload from a captured frame.
///
/// # Errors
///
/// Returns [`ReportError::NoFrame`] when `frame` is missing or is not an
/// image data URL.
pub fn prepare_report(frame: Option<String>, reason: ReportReason, now_ms: i64) -> Result<ReportPayload, ReportError> {
    let screenshot = frame.filter(|f| is_image_data_url(f)).ok_or(ReportError::NoFrame)?;
    Ok(ReportPayload { screenshot, reason: reason.as_str().to_owned(), timestamp: now_ms })
}

/// An encoded image with a non-empty body.
fn is_image_data_url(url: &str) -> bool {
    url.strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(','))
        .is_some_and(|(_, body)| !body.is_empty())
}

/// Build and emit a report, returning the notice to show.
///
/// `emit` is only called when a frame was captured.
pub fn submit_report(
    frame: Option<String>,
    reason: ReportReason,
    now_ms: i64,
    emit: impl FnOnce(ClientEvent) -> bool,
) -> (ToastKind, &'static str) {
    match prepare_report(frame, reason, now_ms) {
        Ok(payload) => {
            if emit(ClientEvent::Report(payload)) {
                (ToastKind::Success, REPORT_SENT_NOTICE)
            } else {
                (ToastKind::Error, REPORT_FAILED_NOTICE)
            }
        }
        Err(e) => (ToastKind::Error, e.notice()),
    }
}

/// Milliseconds since the Unix epoch, from the browser clock.
#[must_use]
pub fn now_ms() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let now = js_sys::Date::now() as i64;
        now
    }
    #[cfg(not(feature = "hydrate"))]
    {
        0
    }
}
