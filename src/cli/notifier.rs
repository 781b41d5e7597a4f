use crate::booking::{Notification, NotificationLevel, NotificationSink};

use super::io as cli_io;

/// Prints wizard notifications as shell toasts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        tracing::debug!(title = %notification.title, "console notification");
        match notification.level {
            NotificationLevel::Success => cli_io::print_success(&notification.title),
            NotificationLevel::Failure => cli_io::print_error(&notification.title),
        }
        cli_io::print_info(&notification.message);
    }
}
