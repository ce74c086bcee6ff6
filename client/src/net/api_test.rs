use super::*;

#[test]
fn config_request_failed_message_formats_status() {
    assert_eq!(config_request_failed_message(500), "config request failed: 500");
}

#[test]
fn channel_auth_failed_message_names_forbidden_channel() {
    assert_eq!(channel_auth_failed_message(403, "private-other"), "channel private-other is not allowed");
}

#[test]
fn channel_auth_failed_message_reports_missing_secret() {
    assert_eq!(channel_auth_failed_message(503, "private-strangers"), "channel authorization is not configured");
}

#[test]
fn channel_auth_failed_message_formats_other_status() {
    assert_eq!(channel_auth_failed_message(400, "private-strangers"), "channel auth failed: 400");
}

#[test]
fn config_endpoint_is_under_channel_api() {
    assert_eq!(CONFIG_ENDPOINT, "/api/channel/config");
}
