//! Terminal notification sink.

use colored::Colorize;

use refetch_core::{Notice, Notifier};

/// Notifier that prints authentication notices to stderr.
///
/// Navigation (re-login) is left to the user; the CLI only surfaces the
/// message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermNotifier;

impl Notifier for TermNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{} {}", "!".yellow(), notice.message());
    }
}
