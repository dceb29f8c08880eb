//! Anonymous Channel Page
//!
//! Channel chips, a searchable message log and per-message identity reveal.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::is_current;
use crate::api;
use crate::api::anon::MESSAGE_LIMITS;
use crate::components::{ErrorView, Loading};
use crate::format::{content_preview, format_datetime, time_ago};
use crate::models::{AnonChannel, AnonIdentity, AnonMessage, Snowflake};

/// Case-insensitive match on nickname or content; blank query keeps all
fn filter_messages(messages: &[AnonMessage], query: &str) -> Vec<AnonMessage> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return messages.to_vec();
    }
    messages
        .iter()
        .filter(|m| {
            m.nickname.to_lowercase().contains(&query)
                || m.content.as_deref().unwrap_or_default().to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone)]
enum Reveal {
    Loading,
    Failed(String),
    Loaded(AnonIdentity),
}

#[component]
pub fn AnonPage() -> impl IntoView {
    let (channels, set_channels) = signal(Vec::<AnonChannel>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);

    let (messages, set_messages) = signal(Vec::<AnonMessage>::new());
    let (msgs_loading, set_msgs_loading) = signal(false);
    let (channel, set_channel) = signal(None::<Snowflake>);
    let (limit, set_limit) = signal(MESSAGE_LIMITS[0]);
    let (search, set_search) = signal(String::new());

    let (expanded, set_expanded) = signal(None::<Snowflake>);
    let (reveal, set_reveal) = signal(None::<Reveal>);

    let load_channels = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::anon::channels().await {
                Ok(loaded) => set_channels.set(loaded),
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_loading.set(false);
        });
    };
    load_channels();

    // Reload messages whenever the channel filter or page size changes
    Effect::new(move |_| {
        let ch = channel.get();
        let lim = limit.get();
        set_msgs_loading.set(true);
        spawn_local(async move {
            let loaded = api::anon::messages(ch, lim).await.unwrap_or_else(|e| {
                log::warn!("[Anon] messages failed: {e}");
                Vec::new()
            });
            // Drop responses for a filter the user already left
            if is_current(channel, &ch) && is_current(limit, &lim) {
                set_messages.set(loaded);
                set_msgs_loading.set(false);
            }
        });
    });

    let toggle_reveal = move |bot_message_id: Snowflake| {
        if expanded.get_untracked() == Some(bot_message_id) {
            set_expanded.set(None);
            set_reveal.set(None);
            return;
        }
        set_expanded.set(Some(bot_message_id));
        set_reveal.set(Some(Reveal::Loading));
        spawn_local(async move {
            let result = match api::anon::identity(bot_message_id).await {
                Ok(identity) => Reveal::Loaded(identity),
                Err(e) => Reveal::Failed(e.to_string()),
            };
            if is_current(expanded, &Some(bot_message_id)) {
                set_reveal.set(Some(result));
            }
        });
    };

    let filtered = Memo::new(move |_| messages.with(|m| search.with(|q| filter_messages(m, q))));

    let chip_class = move |value: Option<Snowflake>| {
        if channel.get() == value { "chip active" } else { "chip" }
    };

    move || {
        if loading.get() {
            return view! { <Loading /> }.into_any();
        }
        if let Some(message) = error.get() {
            return view! { <ErrorView message=message on_retry=move |_: ()| load_channels() /> }.into_any();
        }
        view! {
            <div class="page">
                <h1 class="page-title">"匿名区管理"</h1>

                <div class="card toolbar">
                    <div class="toolbar-group">
                        <span class="muted">"频道："</span>
                        <button class=move || chip_class(None) on:click=move |_| set_channel.set(None)>
                            "全部"
                        </button>
                        {channels
                            .get()
                            .into_iter()
                            .map(|ch| {
                                let id = ch.channel_id;
                                view! {
                                    <button class=move || format!("{} mono", chip_class(Some(id)))
                                        on:click=move |_| set_channel.set(Some(id))>
                                        {format!("#{id}")}
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                    <input
                        class="search-input"
                        type="text"
                        placeholder="搜索昵称或内容..."
                        prop:value=move || search.get()
                        on:input=move |ev| set_search.set(event_target_value(&ev))
                    />
                    <div class="toolbar-group">
                        <span class="muted">"显示："</span>
                        <select
                            class="select"
                            on:change=move |ev| {
                                if let Ok(n) = event_target_value(&ev).parse::<u32>() {
                                    set_limit.set(n);
                                }
                            }
                        >
                            {MESSAGE_LIMITS
                                .into_iter()
                                .map(|n| view! {
                                    <option value=n.to_string() selected=move || limit.get() == n>
                                        {format!("{n} 条")}
                                    </option>
                                })
                                .collect_view()}
                        </select>
                    </div>
                </div>

                <div class="card">
                    <div class="card-head spread">
                        <h2 class="card-title">
                            "消息记录"
                            <Show when=move || msgs_loading.get()>
                                <span class="muted inline-note">"加载中..."</span>
                            </Show>
                        </h2>
                        <span class="muted small">{move || format!("{} 条", filtered.with(Vec::len))}</span>
                    </div>
                    <Show
                        when=move || filtered.with(|f| !f.is_empty())
                        fallback=move || {
                            let text = if msgs_loading.get() {
                                "加载中..."
                            } else if search.with(|s| !s.is_empty()) {
                                "没有匹配的消息"
                            } else {
                                "暂无匿名消息记录"
                            };
                            view! { <div class="empty-text">{text}</div> }
                        }
                    >
                        <For
                            each=move || filtered.get()
                            key=|msg| msg.id
                            children=move |msg| {
                                let id = msg.bot_message_id;
                                view! {
                                    <AnonMessageRow
                                        msg=msg
                                        is_expanded=Signal::derive(move || expanded.get() == Some(id))
                                        reveal=reveal
                                        on_toggle=move |_: ()| toggle_reveal(id)
                                    />
                                }
                            }
                        />
                    </Show>
                </div>
            </div>
        }
        .into_any()
    }
}

#[component]
fn AnonMessageRow(
    msg: AnonMessage,
    #[prop(into)] is_expanded: Signal<bool>,
    reveal: ReadSignal<Option<Reveal>>,
    #[prop(into)] on_toggle: Callback<()>,
) -> impl IntoView {
    let content = msg.content.clone().unwrap_or_default();
    let preview = content_preview(&content);
    let full = content.clone();

    view! {
        <div class="msg">
            <div
                class=move || if is_expanded.get() { "msg-row expanded" } else { "msg-row" }
                on:click=move |_| on_toggle.run(())
            >
                <div class="msg-nick">{msg.nickname.clone()}</div>
                <div class="msg-content">
                    {if preview.is_empty() {
                        view! { <span class="muted italic">"（空消息）"</span> }.into_any()
                    } else {
                        view! { <span>{preview}</span> }.into_any()
                    }}
                </div>
                <div class="msg-meta">
                    <div class="mono small">{format!("#{}", msg.channel_id)}</div>
                    <div class="small">{time_ago(msg.sent_at.as_deref())}</div>
                </div>
                <span class=move || if is_expanded.get() { "caret open" } else { "caret" }>"▾"</span>
            </div>

            <Show when=move || is_expanded.get()>
                <div class="msg-detail">
                    <div>
                        <h4 class="detail-title">"完整内容"</h4>
                        <div class="detail-box pre-wrap">
                            {if full.is_empty() {
                                view! { <span class="muted italic">"（空消息）"</span> }.into_any()
                            } else {
                                view! { <span>{full.clone()}</span> }.into_any()
                            }}
                        </div>
                    </div>
                    <div>
                        <h4 class="detail-title">"真实身份"</h4>
                        {move || match reveal.get() {
                            None => ().into_any(),
                            Some(Reveal::Loading) => view! { <div class="detail-box muted">"查询中..."</div> }.into_any(),
                            Some(Reveal::Failed(message)) => view! { <div class="notice error">{message}</div> }.into_any(),
                            Some(Reveal::Loaded(identity)) => view! {
                                <div class="detail-box">
                                    <DetailRow label="用户 ID" value=identity.user_id.to_string() mono=true />
                                    <DetailRow label="匿名昵称" value=identity.nickname.clone() mono=false />
                                    <DetailRow label="频道 ID" value=identity.channel_id.to_string() mono=true />
                                    <DetailRow label="消息 ID" value=identity.bot_message_id.to_string() mono=true />
                                    <DetailRow label="发送时间" value=format_datetime(identity.sent_at.as_deref()) mono=false />
                                </div>
                            }
                            .into_any(),
                        }}
                    </div>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn DetailRow(label: &'static str, value: String, mono: bool) -> impl IntoView {
    let value = if value.is_empty() { "-".to_string() } else { value };
    view! {
        <div class="detail-row">
            <span class="detail-label">{label}</span>
            <span class=if mono { "detail-value mono" } else { "detail-value" }>{value}</span>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: i64, nickname: &str, content: Option<&str>) -> AnonMessage {
        AnonMessage {
            id,
            bot_message_id: Snowflake(1000 + id as u64),
            channel_id: Snowflake(42),
            nickname: nickname.to_string(),
            content: content.map(str::to_string),
            sent_at: None,
        }
    }

    #[test]
    fn blank_query_keeps_everything() {
        let all = vec![msg(1, "小鹅", Some("hi")), msg(2, "大鹅", None)];
        assert_eq!(filter_messages(&all, "   ").len(), 2);
    }

    #[test]
    fn matches_nickname_or_content_case_insensitively() {
        let all = vec![
            msg(1, "Goose", Some("早上好")),
            msg(2, "鸭子", Some("Hello GOOSE fans")),
            msg(3, "鸭子", None),
        ];
        let ids: Vec<i64> = filter_messages(&all, "goose").iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
        let ids: Vec<i64> = filter_messages(&all, " 早上 ").iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);
        assert!(filter_messages(&all, "不存在").is_empty());
    }
}
