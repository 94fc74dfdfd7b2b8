use std::fmt::Display;

use storefront_sdk::models::notification::{Notification, NotificationKind};

/// Write a message to stderr.
///
/// In tests, messages are also recorded in the [history::History] of the current thread.
fn print_message(v: impl Display) {
    #[cfg(test)]
    {
        let history = crate::utils::message::history::History::global();
        history.push_message(format!("{v}"));
    }

    eprintln!("{v}");
}

/// alias for [print_message]
pub(crate) fn plain(v: impl Display) {
    print_message(v);
}
pub(crate) fn error(v: impl Display) {
    print_message(std::format_args!("❌ ERROR: {v}"));
}
pub(crate) fn created(v: impl Display) {
    print_message(std::format_args!("✨ {v}"));
}
/// double width character, add an additional space for alignment
pub(crate) fn deleted(v: impl Display) {
    print_message(std::format_args!("🗑️  {v}"));
}
pub(crate) fn updated(v: impl Display) {
    print_message(std::format_args!("✅ {v}"));
}
/// double width character, add an additional space for alignment
pub(crate) fn warning(v: impl Display) {
    print_message(std::format_args!("⚠️  {v}"));
}

/// Print a visible notification in the style of its kind.
pub(crate) fn notification(notification: &Notification) {
    if !notification.is_visible() {
        return;
    }
    match notification.kind() {
        NotificationKind::Success => updated(notification.message()),
        NotificationKind::Error => error(notification.message()),
    }
}
