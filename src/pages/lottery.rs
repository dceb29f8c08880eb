//! Lottery Page
//!
//! Status tabs, expandable lottery cards with entrants, and manual
//! draw / cancel for active lotteries.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::is_current;
use crate::api;
use crate::components::{ErrorView, Loading, LotteryStatusBadge};
use crate::format::{format_datetime, time_ago};
use crate::models::{DrawResult, Lottery, LotteryDetail, LotteryStatus, Snowflake};

const DRAW_CONFIRM: &str = "确定要手动开奖吗？此操作不可撤销。";
const CANCEL_CONFIRM: &str = "确定要取消此抽奖吗？此操作不可撤销。";

fn draw_summary(result: &DrawResult) -> String {
    format!(
        "奖品：{} · 参与人数：{} · 中奖 {} 人",
        result.prize,
        result.total_entries,
        result.winners.len()
    )
}

fn winners_line(result: &DrawResult) -> Option<String> {
    if result.winners.is_empty() {
        return None;
    }
    let ids: Vec<String> = result.winners.iter().map(ToString::to_string).collect();
    Some(format!("中奖者：{}", ids.join(", ")))
}

#[derive(Debug, Clone)]
enum DetailState {
    Loading,
    Failed,
    Loaded(LotteryDetail),
}

#[component]
pub fn LotteryPage() -> impl IntoView {
    let (tab, set_tab) = signal(LotteryStatus::Active);
    let (lotteries, set_lotteries) = signal(Vec::<Lottery>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);

    let (expanded, set_expanded) = signal(None::<i64>);
    let (detail, set_detail) = signal(None::<DetailState>);

    let (busy, set_busy) = signal(None::<i64>);
    let (draw_result, set_draw_result) = signal(None::<DrawResult>);

    let load = move || {
        // Also runs after a draw or cancel settles, when the page may be gone
        let Some(status) = tab.try_get_untracked() else {
            return;
        };
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = api::lottery::list(status).await;
            if !is_current(tab, &status) {
                return;
            }
            match result {
                Ok(loaded) => set_lotteries.set(loaded),
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        tab.track();
        load();
    });

    let switch_tab = move |status: LotteryStatus| {
        set_expanded.set(None);
        set_detail.set(None);
        set_draw_result.set(None);
        set_tab.set(status);
    };

    let toggle_expand = move |id: i64| {
        if expanded.get_untracked() == Some(id) {
            set_expanded.set(None);
            set_detail.set(None);
            return;
        }
        set_expanded.set(Some(id));
        set_detail.set(Some(DetailState::Loading));
        spawn_local(async move {
            let next = match api::lottery::detail(id).await {
                Ok(d) => DetailState::Loaded(d),
                Err(e) => {
                    log::warn!("[Lottery] detail #{id} failed: {e}");
                    DetailState::Failed
                }
            };
            if is_current(expanded, &Some(id)) {
                set_detail.set(Some(next));
            }
        });
    };

    let draw = move |id: i64| {
        if !confirm(DRAW_CONFIRM) {
            return;
        }
        set_busy.set(Some(id));
        set_draw_result.set(None);
        spawn_local(async move {
            match api::lottery::draw(id).await {
                Ok(result) => {
                    log::info!("[Lottery] drew #{id}: {} winners", result.winners.len());
                    set_draw_result.set(Some(result));
                    load();
                }
                Err(e) => alert(&format!("开奖失败: {e}")),
            }
            set_busy.set(None);
        });
    };

    let cancel = move |id: i64| {
        if !confirm(CANCEL_CONFIRM) {
            return;
        }
        set_busy.set(Some(id));
        spawn_local(async move {
            match api::lottery::cancel(id).await {
                Ok(()) => {
                    log::info!("[Lottery] cancelled #{id}");
                    load();
                }
                Err(e) => alert(&format!("取消失败: {e}")),
            }
            set_busy.set(None);
        });
    };

    view! {
        <div class="page">
            <h1 class="page-title">"抽奖管理"</h1>

            <div class="tabs">
                {LotteryStatus::TABS
                    .into_iter()
                    .map(|status| view! {
                        <button
                            class=move || if tab.get() == status { "tab active" } else { "tab" }
                            on:click=move |_| switch_tab(status)
                        >
                            {status.label()}
                        </button>
                    })
                    .collect_view()}
            </div>

            {move || draw_result.get().map(|result| {
                let summary = draw_summary(&result);
                let winners = winners_line(&result);
                view! {
                    <div class="notice draw-banner">
                        <div>
                            <p class="strong">{format!("开奖完成 - {}", result.title)}</p>
                            <p class="small">{summary}</p>
                            {winners.map(|line| view! { <p class="small mono">{line}</p> })}
                        </div>
                        <button class="close-btn" on:click=move |_| set_draw_result.set(None)>"×"</button>
                    </div>
                }
            })}

            {move || {
                if loading.get() {
                    return view! { <Loading /> }.into_any();
                }
                if let Some(message) = error.get() {
                    return view! { <ErrorView message=message on_retry=move |_: ()| load() /> }.into_any();
                }
                if lotteries.with(Vec::is_empty) {
                    return view! {
                        <div class="card placeholder-card">
                            <div class="big-icon">"🎰"</div>
                            <p class="muted">{tab.get().empty_text()}</p>
                        </div>
                    }
                    .into_any();
                }
                view! {
                    <div class="stack">
                        <For
                            each=move || lotteries.get()
                            key=|l| (l.id, l.entry_count, l.status)
                            children=move |lottery| {
                                let id = lottery.id;
                                view! {
                                    <LotteryCard
                                        lottery=lottery
                                        is_expanded=Signal::derive(move || expanded.get() == Some(id))
                                        busy=Signal::derive(move || busy.get() == Some(id))
                                        detail=detail
                                        on_expand=move |_: ()| toggle_expand(id)
                                        on_draw=move |_: ()| draw(id)
                                        on_cancel=move |_: ()| cancel(id)
                                    />
                                }
                            }
                        />
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}

#[component]
fn LotteryCard(
    lottery: Lottery,
    #[prop(into)] is_expanded: Signal<bool>,
    #[prop(into)] busy: Signal<bool>,
    detail: ReadSignal<Option<DetailState>>,
    #[prop(into)] on_expand: Callback<()>,
    #[prop(into)] on_draw: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let status = lottery.status;
    let is_active = status == LotteryStatus::Active;

    view! {
        <div class="card lottery-card">
            <div class="lottery-head" on:click=move |_| on_expand.run(())>
                <span class=format!("status-dot lottery-{}", status.as_str())></span>
                <div class="lottery-main">
                    <div class="lottery-title-row">
                        <h3 class="lottery-title">{lottery.title.clone()}</h3>
                        <LotteryStatusBadge status=status />
                    </div>
                    <div class="lottery-meta">
                        <span>"奖品：" <b>{lottery.prize.clone()}</b></span>
                        <span>"中奖名额：" <b>{lottery.winner_count}</b></span>
                        <span>"参与人数：" <b>{lottery.entry_count}</b></span>
                        {lottery.end_time.clone().map(|end| view! {
                            <span>"截止：" <b>{time_ago(Some(&end))}</b></span>
                        })}
                        <span>"创建：" <b>{time_ago(lottery.created_at.as_deref())}</b></span>
                    </div>
                </div>
                {is_active.then(|| view! {
                    <div class="lottery-actions" on:click=|ev| ev.stop_propagation()>
                        <button class="btn warn small" disabled=move || busy.get() on:click=move |_| on_draw.run(())>
                            {move || if busy.get() { "处理中..." } else { "手动开奖" }}
                        </button>
                        <button class="btn ghost small" disabled=move || busy.get() on:click=move |_| on_cancel.run(())>
                            "取消"
                        </button>
                    </div>
                })}
                <span class=move || if is_expanded.get() { "caret open" } else { "caret" }>"▾"</span>
            </div>

            <Show when=move || is_expanded.get()>
                <div class="lottery-detail">
                    {move || match detail.get() {
                        None | Some(DetailState::Loading) => view! { <div class="muted center">"加载中..."</div> }.into_any(),
                        Some(DetailState::Failed) => view! { <div class="muted center">"加载详情失败"</div> }.into_any(),
                        Some(DetailState::Loaded(d)) => detail_view(d).into_any(),
                    }}
                </div>
            </Show>
        </div>
    }
}

fn detail_view(detail: LotteryDetail) -> impl IntoView {
    let LotteryDetail { lottery, entries } = detail;
    let id_or_dash = |id: Option<Snowflake>| id.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
    let entry_count = entries.len();

    view! {
        <div class="info-grid">
            <InfoItem label="抽奖 ID" value=format!("#{}", lottery.id) mono=false />
            <InfoItem label="频道 ID" value=id_or_dash(lottery.channel_id) mono=true />
            <InfoItem label="创建者 ID" value=id_or_dash(lottery.created_by) mono=true />
            <InfoItem label="状态" value=lottery.status.label().to_string() mono=false />
            {lottery.ended_at.clone().map(|at| view! {
                <InfoItem label="结束时间" value=format_datetime(Some(&at)) mono=false />
            })}
            {lottery.required_role_id.map(|role| view! {
                <InfoItem label="限制身份组" value=role.to_string() mono=true />
            })}
        </div>
        <div>
            <h4 class="detail-title">{format!("参与者 ({entry_count})")}</h4>
            {if entries.is_empty() {
                view! { <p class="muted small">"暂无参与者"</p> }.into_any()
            } else {
                view! {
                    <table class="data-table compact">
                        <thead>
                            <tr>
                                <th class="narrow">"#"</th>
                                <th>"用户 ID"</th>
                                <th>"参与时间"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {entries
                                .into_iter()
                                .enumerate()
                                .map(|(idx, entry)| view! {
                                    <tr>
                                        <td class="muted small">{idx + 1}</td>
                                        <td class="mono small">{entry.user_id.to_string()}</td>
                                        <td class="muted small">{time_ago(entry.entered_at.as_deref())}</td>
                                    </tr>
                                })
                                .collect_view()}
                        </tbody>
                    </table>
                }
                .into_any()
            }}
        </div>
    }
}

#[component]
fn InfoItem(label: &'static str, value: String, mono: bool) -> impl IntoView {
    view! {
        <div class="info-item">
            <div class="info-label">{label}</div>
            <div class=if mono { "info-value mono" } else { "info-value" }>{value}</div>
        </div>
    }
}

fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_or(false)
}

fn alert(message: &str) {
    if window().alert_with_message(message).is_err() {
        log::warn!("[Lottery] alert failed: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(winners: Vec<u64>) -> DrawResult {
        DrawResult {
            lottery_id: 3,
            title: "周末抽奖".into(),
            prize: "Nitro".into(),
            total_entries: 12,
            winners: winners.into_iter().map(Snowflake).collect(),
        }
    }

    #[test]
    fn draw_banner_text() {
        let r = result(vec![111, 222]);
        assert_eq!(draw_summary(&r), "奖品：Nitro · 参与人数：12 · 中奖 2 人");
        assert_eq!(winners_line(&r).as_deref(), Some("中奖者：111, 222"));
    }

    #[test]
    fn no_winners_hides_line() {
        let r = result(Vec::new());
        assert_eq!(draw_summary(&r), "奖品：Nitro · 参与人数：12 · 中奖 0 人");
        assert_eq!(winners_line(&r), None);
    }
}
