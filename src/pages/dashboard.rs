//! Dashboard Page
//!
//! Count cards, quick links and the three recent-activity feeds.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::{ErrorView, Loading, LotteryStatusBadge, TempRoleStatusBadge};
use crate::format::{format_datetime, time_ago};
use crate::models::Stats;
use crate::router::{self, Route};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let (stats, set_stats) = signal(None::<Stats>);
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);

    let load = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::stats::fetch_stats().await {
                Ok(loaded) => set_stats.set(Some(loaded)),
                Err(e) => {
                    log::error!("[Dashboard] stats failed: {e}");
                    set_error.set(Some(e.to_string()));
                }
            }
            set_loading.set(false);
        });
    };
    load();

    move || {
        if loading.get() {
            return view! { <Loading /> }.into_any();
        }
        if let Some(message) = error.get() {
            return view! { <ErrorView message=message on_retry=move |_: ()| load() /> }.into_any();
        }
        match stats.get() {
            Some(stats) => dashboard_body(stats).into_any(),
            None => ().into_any(),
        }
    }
}

fn dashboard_body(stats: Stats) -> impl IntoView {
    let Stats { counts, recent_tracking, recent_lotteries, recent_temp_roles } = stats;

    view! {
        <div class="page">
            <h1 class="page-title">"仪表盘"</h1>

            <div class="count-grid">
                <CountCard icon="📁" label="文件总数" value=counts.total_files
                    sub=format!("{} 个帖子", counts.total_posts) color="blue" />
                <CountCard icon="🎰" label="活跃抽奖" value=counts.active_lotteries
                    sub="进行中".to_string() color="amber" />
                <CountCard icon="🏷️" label="临时身份组" value=counts.active_temp_roles
                    sub="活跃中".to_string() color="purple" />
                <CountCard icon="🎭" label="匿名频道" value=counts.anon_channels
                    sub=format!("{} 条追踪记录", counts.total_tracking) color="emerald" />
            </div>

            <section class="quick-actions">
                <h2 class="section-title">"快捷操作"</h2>
                <div class="quick-row">
                    <QuickAction icon="📁" label="管理文件" to=Route::Files />
                    <QuickAction icon="🎰" label="查看抽奖" to=Route::Lottery />
                    <QuickAction icon="🏷️" label="临时身份组" to=Route::Roles />
                    <QuickAction icon="🔧" label="发送公告" to=Route::Tools />
                    <QuickAction icon="🎭" label="匿名区查询" to=Route::Anon />
                </div>
            </section>

            <div class="activity-grid">
                <ActivityCard title="最近文件追踪" icon="📋" empty_text="暂无追踪记录" empty=recent_tracking.is_empty()>
                    {recent_tracking
                        .into_iter()
                        .map(|r| view! {
                            <div class="activity-row">
                                <div class="activity-main">
                                    <p class="activity-line">
                                        <strong>{r.user_name}</strong>
                                        " 获取了 "
                                        <span class="accent">{r.post_name.unwrap_or_default()}</span>
                                        " / " {r.file_name}
                                    </p>
                                    <p class="activity-sub">
                                        <span class="mono">{r.tracking_code}</span>
                                        " · " {r.version}
                                    </p>
                                </div>
                                <span class="time-label">{time_ago(r.retrieved_at.as_deref())}</span>
                            </div>
                        })
                        .collect_view()}
                </ActivityCard>

                <ActivityCard title="最近抽奖" icon="🎰" empty_text="暂无抽奖" empty=recent_lotteries.is_empty()>
                    {recent_lotteries
                        .into_iter()
                        .map(|l| view! {
                            <div class="activity-row">
                                <div class="activity-main">
                                    <p class="activity-line"><strong>{l.title}</strong></p>
                                    <p class="activity-sub">
                                        {l.prize} " · " {l.entry_count} " 人参与 · "
                                        <LotteryStatusBadge status=l.status />
                                    </p>
                                </div>
                                <span class="time-label">{time_ago(l.created_at.as_deref())}</span>
                            </div>
                        })
                        .collect_view()}
                </ActivityCard>

                <ActivityCard title="最近临时身份组" icon="🏷️" empty_text="暂无临时身份组" empty=recent_temp_roles.is_empty()>
                    {recent_temp_roles
                        .into_iter()
                        .map(|r| view! {
                            <div class="activity-row">
                                <div class="activity-main">
                                    <p class="activity-line">
                                        "用户 " <span class="mono">{r.user_id.to_string()}</span>
                                        " · 身份组 " <span class="mono">{r.role_id.to_string()}</span>
                                    </p>
                                    <p class="activity-sub">
                                        "到期：" {format_datetime(r.expire_at.as_deref())} " · "
                                        <TempRoleStatusBadge status=r.status />
                                    </p>
                                </div>
                                <span class="time-label">{time_ago(r.granted_at.as_deref())}</span>
                            </div>
                        })
                        .collect_view()}
                </ActivityCard>
            </div>
        </div>
    }
}

#[component]
fn CountCard(
    icon: &'static str,
    label: &'static str,
    value: u64,
    sub: String,
    color: &'static str,
) -> impl IntoView {
    view! {
        <div class="card count-card">
            <div class="count-head">
                <div class=format!("count-icon {color}")>{icon}</div>
                <span class="count-label">{label}</span>
            </div>
            <div class="count-value">{value}</div>
            <p class="count-sub">{sub}</p>
        </div>
    }
}

#[component]
fn QuickAction(icon: &'static str, label: &'static str, to: Route) -> impl IntoView {
    view! {
        <button class="quick-action" on:click=move |_| router::navigate(to)>
            <span>{icon}</span>
            <span>{label}</span>
        </button>
    }
}

#[component]
fn ActivityCard(
    title: &'static str,
    icon: &'static str,
    empty_text: &'static str,
    empty: bool,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="card">
            <div class="card-head">
                <span>{icon}</span>
                <h3 class="card-title">{title}</h3>
            </div>
            <div class="card-rows">
                {if empty {
                    view! { <div class="empty-text">{empty_text}</div> }.into_any()
                } else {
                    children().into_any()
                }}
            </div>
        </div>
    }
}
