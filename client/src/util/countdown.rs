//! Clock formatting for the session timer and ban countdown.

#[cfg(test)]
#[path = "countdown_test.rs"]
mod countdown_test;

/// Render whole seconds as `m:ss`; minutes are not wrapped into hours.
#[must_use]
pub fn format_clock(total_secs: u32) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Sentence shown under the ban notice.
#[must_use]
pub fn ban_message(remaining_secs: u32) -> String {
    if remaining_secs == 1 {
        "You can chat again in 1 second.".to_owned()
    } else {
        format!("You can chat again in {} ({remaining_secs} seconds).", format_clock(remaining_secs))
    }
}
