use super::*;

const FRAME: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

#[test]
fn report_without_frame_is_rejected() {
    assert_eq!(prepare_report(None, ReportReason::Spam, 1), Err(ReportError::NoFrame));
    assert_eq!(ReportError::NoFrame.notice(), "No video frame available to report");
}

#[test]
fn blank_canvas_data_url_is_not_a_frame() {
    // `toDataURL` on a zero-sized canvas yields this.
    assert_eq!(prepare_report(Some("data:,".to_owned()), ReportReason::Spam, 1), Err(ReportError::NoFrame));
    assert_eq!(
        prepare_report(Some("data:image/jpeg;base64,".to_owned()), ReportReason::Spam, 1),
        Err(ReportError::NoFrame)
    );
}

#[test]
fn report_carries_frame_reason_and_timestamp() {
    let payload = prepare_report(Some(FRAME.to_owned()), ReportReason::Harassment, 1_700_000_000_000)
        .expect("report");
    assert_eq!(payload.screenshot, FRAME);
    assert_eq!(payload.reason, "harassment");
    assert_eq!(payload.timestamp, 1_700_000_000_000);
}

#[test]
fn reasons_round_trip_through_values() {
    for reason in ReportReason::ALL {
        assert_eq!(ReportReason::from_value(reason.as_str()), Some(reason));
    }
    assert_eq!(ReportReason::from_value("rude"), None);
}

#[test]
fn success_notice_text() {
    assert_eq!(REPORT_SENT_NOTICE, "Report submitted. Thank you.");
}

// =============================================================
// Submission
// =============================================================

#[test]
fn submit_without_frame_emits_nothing_and_raises_error_notice() {
    let mut emitted = Vec::new();
    let notice = submit_report(None, ReportReason::Other, 5, |event| {
        emitted.push(event);
        true
    });
    assert!(emitted.is_empty());
    assert_eq!(notice, (ToastKind::Error, NO_FRAME_NOTICE));
}

#[test]
fn submit_with_frame_emits_client_report() {
    let mut emitted = Vec::new();
    let notice = submit_report(Some(FRAME.to_owned()), ReportReason::Underage, 42, |event| {
        emitted.push(event);
        true
    });
    assert_eq!(notice, (ToastKind::Success, REPORT_SENT_NOTICE));
    assert_eq!(
        emitted,
        vec![ClientEvent::Report(ReportPayload {
            screenshot: FRAME.to_owned(),
            reason: "underage".to_owned(),
            timestamp: 42,
        })]
    );
}

#[test]
fn submit_reports_failure_when_channel_is_down() {
    let notice = submit_report(Some(FRAME.to_owned()), ReportReason::Spam, 1, |_| false);
    assert_eq!(notice, (ToastKind::Error, REPORT_FAILED_NOTICE));
}
