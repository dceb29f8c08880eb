//! Loading, error and status badge components shared by pages.

use leptos::prelude::*;

use crate::models::{LotteryStatus, TaskStatus, TempRoleStatus};

#[component]
pub fn Loading(#[prop(optional)] text: Option<&'static str>) -> impl IntoView {
    view! {
        <div class="loading">
            <div class="loading-goose">"🐧"</div>
            <p class="loading-text">{text.unwrap_or("加载中...")}</p>
        </div>
    }
}

/// Error box with a retry link
#[component]
pub fn ErrorView(
    #[prop(into)] message: String,
    #[prop(into)] on_retry: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="error-box">
            <p class="error-text">{message}</p>
            <button class="link-btn" on:click=move |_| on_retry.run(())>"重试"</button>
        </div>
    }
}

#[component]
pub fn LotteryStatusBadge(status: LotteryStatus) -> impl IntoView {
    let class = format!("status-badge lottery-{}", status.as_str());
    view! { <span class=class>{status.label()}</span> }
}

#[component]
pub fn TempRoleStatusBadge(status: TempRoleStatus) -> impl IntoView {
    let class = match status {
        TempRoleStatus::Active => "status-badge ok",
        TempRoleStatus::Removed => "status-badge bad",
        TempRoleStatus::Expired | TempRoleStatus::Unknown => "status-badge muted",
    };
    view! { <span class=class>{status.label()}</span> }
}

#[component]
pub fn TaskStatusBadge(status: TaskStatus) -> impl IntoView {
    let class = match status {
        TaskStatus::Done => "status-badge ok",
        TaskStatus::Failed => "status-badge bad",
        TaskStatus::Processing => "status-badge busy",
        TaskStatus::Pending | TaskStatus::Unknown => "status-badge muted",
    };
    view! { <span class=class>{status.label()}</span> }
}
