//! UI Components
//!
//! Reusable Leptos components.

mod confirm_modal;
mod delete_confirm_button;
mod header;
mod login;
mod markdown_preview;
mod sidebar;
mod status;

pub use confirm_modal::ConfirmModal;
pub use delete_confirm_button::DeleteConfirmButton;
pub use header::Header;
pub use login::LoginView;
pub use markdown_preview::MarkdownPreview;
pub use sidebar::Sidebar;
pub use status::{ErrorView, Loading, LotteryStatusBadge, TaskStatusBadge, TempRoleStatusBadge};
