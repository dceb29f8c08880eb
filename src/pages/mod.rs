//! Console Pages
//!
//! One component per sidebar entry.

mod anon;
mod config;
mod dashboard;
mod faq;
mod files;
mod lottery;
mod roles;
mod tools;

pub use anon::AnonPage;
pub use config::ConfigPage;
pub use dashboard::DashboardPage;
pub use faq::FaqPage;
pub use files::FilesPage;
pub use lottery::LotteryPage;
pub use roles::RolesPage;
pub use tools::ToolsPage;

use leptos::prelude::*;

/// Whether a response fetched for `expected` may still be written: the page
/// owning `signal` is mounted and the user has not moved on to another value.
fn is_current<T: PartialEq + Send + Sync + 'static>(signal: ReadSignal<T>, expected: &T) -> bool {
    signal.try_with_untracked(|value| value == expected).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_until_value_changes() {
        let owner = Owner::new();
        owner.with(|| {
            let (selected, set_selected) = signal(Some("帖子 A".to_string()));
            assert!(is_current(selected, &Some("帖子 A".to_string())));

            set_selected.set(Some("帖子 B".to_string()));
            assert!(!is_current(selected, &Some("帖子 A".to_string())));
            assert!(is_current(selected, &Some("帖子 B".to_string())));
        });
    }

    #[test]
    fn unmounted_page_is_stale() {
        let owner = Owner::new();
        let tab = owner.with(|| signal(3u8).0);
        owner.cleanup();
        assert!(!is_current(tab, &3));
    }
}
