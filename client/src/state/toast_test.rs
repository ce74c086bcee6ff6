use super::*;

#[test]
fn push_assigns_increasing_ids() {
    let mut state = ToastState::default();
    let a = state.push(ToastKind::Success, "one");
    let b = state.push(ToastKind::Warning, "two");
    assert!(b > a);
    assert_eq!(state.items.len(), 2);
}

#[test]
fn dismiss_removes_only_matching_toast() {
    let mut state = ToastState::default();
    let a = state.push(ToastKind::Success, "one");
    let b = state.push(ToastKind::Error, "two");
    state.dismiss(a);
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, b);

    state.dismiss(999);
    assert_eq!(state.items.len(), 1);
}

#[test]
fn oldest_toast_is_evicted_at_cap() {
    let mut state = ToastState::default();
    for i in 0..=TOAST_CAP {
        state.push(ToastKind::Warning, format!("t{i}"));
    }
    assert_eq!(state.items.len(), TOAST_CAP);
    assert_eq!(state.items[0].text, "t1");
}

#[test]
fn kinds_map_to_css_modifiers() {
    assert_eq!(ToastKind::Success.css_modifier(), "toast--success");
    assert_eq!(ToastKind::Warning.css_modifier(), "toast--warning");
    assert_eq!(ToastKind::Error.css_modifier(), "toast--error");
}
