//! Tools Page
//!
//! Announcement composer backed by the task queue, and the recent task log.

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use crate::api;
use crate::api::tasks::{PollGuard, TaskOutcome, SEND_ANNOUNCEMENT};
use crate::components::{MarkdownPreview, TaskStatusBadge};
use crate::format::{hex_color, parse_hex_color, time_ago};
use crate::models::{Announcement, Embed, NewTask, Snowflake, Task};

const DEFAULT_EMBED_COLOR: u32 = 0x88ccff;
const TIMEOUT_TEXT: &str = "任务超时，请在操作日志中查看结果";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    Embed,
}

/// Form state of the composer
#[derive(Debug, Clone, PartialEq)]
struct AnnouncementDraft {
    channel_id: String,
    mode: Mode,
    content: String,
    embed_title: String,
    embed_desc: String,
    embed_color: String,
}

impl AnnouncementDraft {
    /// Validate and build the task payload
    fn build(&self) -> Result<Announcement, &'static str> {
        let raw_channel = self.channel_id.trim();
        if raw_channel.is_empty() {
            return Err("请输入频道 ID");
        }
        let channel_id: Snowflake = raw_channel.parse().map_err(|_| "频道 ID 只能包含数字")?;

        match self.mode {
            Mode::Text => {
                if self.content.trim().is_empty() {
                    return Err("请输入公告内容");
                }
                Ok(Announcement { channel_id, content: Some(self.content.clone()), embed: None })
            }
            Mode::Embed => {
                if self.embed_title.trim().is_empty() && self.embed_desc.trim().is_empty() {
                    return Err("请填写 Embed 标题或描述");
                }
                let color = parse_hex_color(&self.embed_color)
                    .filter(|c| *c != 0)
                    .unwrap_or(DEFAULT_EMBED_COLOR);
                let content = (!self.content.trim().is_empty()).then(|| self.content.clone());
                Ok(Announcement {
                    channel_id,
                    content,
                    embed: Some(Embed {
                        title: self.embed_title.clone(),
                        description: self.embed_desc.clone(),
                        color,
                    }),
                })
            }
        }
    }
}

/// Message id from a finished `send_announcement` task
fn sent_message_id(result: &Value) -> String {
    match result.get("message_id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => "-".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SendResult {
    Sent(String),
    Error(String),
}

#[component]
pub fn ToolsPage() -> impl IntoView {
    view! {
        <div class="page">
            <h1 class="page-title">"工具"</h1>
            <div class="two-col">
                <AnnouncementTool />
                <TaskLog />
            </div>
        </div>
    }
}

#[component]
fn AnnouncementTool() -> impl IntoView {
    let (channel_id, set_channel_id) = signal(String::new());
    let (mode, set_mode) = signal(Mode::Text);
    let (content, set_content) = signal(String::new());
    let (embed_title, set_embed_title) = signal(String::new());
    let (embed_desc, set_embed_desc) = signal(String::new());
    let (embed_color, set_embed_color) = signal(hex_color(DEFAULT_EMBED_COLOR));
    let (sending, set_sending) = signal(false);
    let (result, set_result) = signal(None::<SendResult>);

    // Stop polling once the page is left
    let guard = PollGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.cancel()
    });

    let send = move |_| {
        let draft = AnnouncementDraft {
            channel_id: channel_id.get_untracked(),
            mode: mode.get_untracked(),
            content: content.get_untracked(),
            embed_title: embed_title.get_untracked(),
            embed_desc: embed_desc.get_untracked(),
            embed_color: embed_color.get_untracked(),
        };
        let payload = match draft.build() {
            Ok(payload) => payload,
            Err(message) => {
                set_result.set(Some(SendResult::Error(message.to_string())));
                return;
            }
        };

        set_sending.set(true);
        set_result.set(None);
        let guard = guard.clone();
        spawn_local(async move {
            let task = NewTask { task_type: SEND_ANNOUNCEMENT, payload };
            let outcome = match api::tasks::create(&task).await {
                Ok(task_id) => api::tasks::poll_task(task_id, &guard).await,
                Err(e) => TaskOutcome::Failed(e.to_string()),
            };
            let next = match outcome {
                TaskOutcome::Cancelled => return,
                TaskOutcome::Done(value) => {
                    set_content.set(String::new());
                    set_embed_title.set(String::new());
                    set_embed_desc.set(String::new());
                    SendResult::Sent(sent_message_id(&value))
                }
                TaskOutcome::Failed(message) => SendResult::Error(message),
                TaskOutcome::TimedOut => SendResult::Error(TIMEOUT_TEXT.to_string()),
            };
            set_result.set(Some(next));
            set_sending.set(false);
        });
    };

    let mode_class = move |m: Mode| if mode.get() == m { "chip active" } else { "chip" };

    view! {
        <div class="card">
            <div class="card-head">
                <h2 class="card-title">"发送公告"</h2>
            </div>
            <div class="card-body form">
                <label class="field">
                    <span class="field-label">"频道 ID"</span>
                    <input
                        class="input mono"
                        type="text"
                        placeholder="输入 Discord 频道 ID"
                        prop:value=move || channel_id.get()
                        on:input=move |ev| set_channel_id.set(event_target_value(&ev))
                    />
                </label>

                <div class="field">
                    <span class="field-label">"消息类型"</span>
                    <div class="row">
                        <button class=move || mode_class(Mode::Text) on:click=move |_| set_mode.set(Mode::Text)>"纯文本"</button>
                        <button class=move || mode_class(Mode::Embed) on:click=move |_| set_mode.set(Mode::Embed)>"Embed"</button>
                    </div>
                </div>

                <Show when=move || mode.get() == Mode::Embed>
                    <div class="embed-fields">
                        <label class="field">
                            <span class="field-label">"Embed 标题"</span>
                            <input
                                class="input"
                                type="text"
                                placeholder="标题"
                                prop:value=move || embed_title.get()
                                on:input=move |ev| set_embed_title.set(event_target_value(&ev))
                            />
                        </label>
                        <label class="field">
                            <span class="field-label">"Embed 描述"</span>
                            <textarea
                                class="input"
                                rows="3"
                                placeholder="描述内容（支持 Markdown）"
                                prop:value=move || embed_desc.get()
                                on:input=move |ev| set_embed_desc.set(event_target_value(&ev))
                            ></textarea>
                        </label>
                        <div class="field">
                            <span class="field-label">"颜色"</span>
                            <div class="row">
                                <input
                                    class="color-input"
                                    type="color"
                                    prop:value=move || embed_color.get()
                                    on:input=move |ev| set_embed_color.set(event_target_value(&ev))
                                />
                                <span class="mono small muted">{move || embed_color.get()}</span>
                            </div>
                        </div>
                    </div>
                </Show>

                <label class="field">
                    <span class="field-label">
                        {move || if mode.get() == Mode::Text { "公告内容" } else { "附加文本（可选）" }}
                    </span>
                    <textarea
                        class="input"
                        rows="4"
                        placeholder="输入消息内容..."
                        prop:value=move || content.get()
                        on:input=move |ev| set_content.set(event_target_value(&ev))
                    ></textarea>
                </label>

                <div class="field">
                    <span class="field-label">"预览"</span>
                    <MarkdownPreview
                        text=Signal::derive(move || {
                            if mode.get() == Mode::Embed {
                                let mut text = content.get();
                                for part in [embed_title.get(), embed_desc.get()] {
                                    if !part.trim().is_empty() {
                                        if !text.is_empty() {
                                            text.push_str("\n\n");
                                        }
                                        text.push_str(&part);
                                    }
                                }
                                text
                            } else {
                                content.get()
                            }
                        })
                    />
                </div>

                <button class="btn primary block" disabled=move || sending.get() on:click=send>
                    {move || if sending.get() { "发送中..." } else { "发送公告" }}
                </button>

                {move || result.get().map(|r| match r {
                    SendResult::Sent(id) => view! {
                        <div class="notice success">{format!("发送成功 (消息 ID: {id})")}</div>
                    }
                    .into_any(),
                    SendResult::Error(message) => view! { <div class="notice error">{message}</div> }.into_any(),
                })}
            </div>
        </div>
    }
}

#[component]
fn TaskLog() -> impl IntoView {
    let (tasks, set_tasks) = signal(Vec::<Task>::new());
    let (loading, set_loading) = signal(true);

    let load = move || {
        set_loading.set(true);
        spawn_local(async move {
            let loaded = api::tasks::recent().await.unwrap_or_else(|e| {
                log::warn!("[Tools] task log failed: {e}");
                Vec::new()
            });
            set_tasks.set(loaded);
            set_loading.set(false);
        });
    };
    load();

    view! {
        <div class="card">
            <div class="card-head spread">
                <h2 class="card-title">"操作日志"</h2>
                <button class="link-btn" on:click=move |_| load()>"刷新"</button>
            </div>
            {move || {
                if loading.get() {
                    return view! { <div class="empty-text">"加载中..."</div> }.into_any();
                }
                if tasks.with(Vec::is_empty) {
                    return view! { <div class="empty-text">"暂无操作记录"</div> }.into_any();
                }
                view! {
                    <div class="task-list">
                        {tasks
                            .get()
                            .into_iter()
                            .map(|task| {
                                let summary = task.result_summary();
                                view! {
                                    <div class="task-row">
                                        <div class="spread">
                                            <div class="row">
                                                <span class="strong">{task.type_label()}</span>
                                                <TaskStatusBadge status=task.status />
                                            </div>
                                            <span class="small muted">{time_ago(task.created_at.as_deref())}</span>
                                        </div>
                                        {summary.map(|s| view! { <p class="small muted truncate">{s}</p> })}
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(mode: Mode) -> AnnouncementDraft {
        AnnouncementDraft {
            channel_id: " 1446888252194816132 ".into(),
            mode,
            content: String::new(),
            embed_title: String::new(),
            embed_desc: String::new(),
            embed_color: "#88ccff".into(),
        }
    }

    #[test]
    fn channel_id_is_required_and_numeric() {
        let mut d = draft(Mode::Text);
        d.content = "hi".into();
        d.channel_id = "  ".into();
        assert_eq!(d.build(), Err("请输入频道 ID"));
        d.channel_id = "general".into();
        assert_eq!(d.build(), Err("频道 ID 只能包含数字"));
    }

    #[test]
    fn text_mode_needs_content() {
        let mut d = draft(Mode::Text);
        d.content = "   ".into();
        assert_eq!(d.build(), Err("请输入公告内容"));

        d.content = "**今晚八点** 开会".into();
        let payload = d.build().unwrap();
        assert_eq!(payload.channel_id, Snowflake(1446888252194816132));
        assert_eq!(payload.content.as_deref(), Some("**今晚八点** 开会"));
        assert_eq!(payload.embed, None);
    }

    #[test]
    fn embed_mode_needs_title_or_description() {
        let mut d = draft(Mode::Embed);
        d.content = "附加".into();
        assert_eq!(d.build(), Err("请填写 Embed 标题或描述"));

        d.embed_desc = "描述".into();
        d.embed_color = "#ff0000".into();
        let payload = d.build().unwrap();
        assert_eq!(payload.content.as_deref(), Some("附加"));
        let embed = payload.embed.unwrap();
        assert_eq!(embed.title, "");
        assert_eq!(embed.color, 0xff0000);
    }

    #[test]
    fn embed_color_falls_back() {
        let mut d = draft(Mode::Embed);
        d.embed_title = "标题".into();
        for bad in ["", "red", "#000000"] {
            d.embed_color = bad.into();
            let payload = d.build().unwrap();
            assert_eq!(payload.embed.unwrap().color, DEFAULT_EMBED_COLOR);
            assert_eq!(payload.content, None);
        }
    }

    #[test]
    fn message_id_from_result() {
        assert_eq!(sent_message_id(&serde_json::json!({"message_id": "99"})), "99");
        assert_eq!(sent_message_id(&serde_json::json!({"message_id": 7})), "7");
        assert_eq!(sent_message_id(&serde_json::json!({"ok": true})), "-");
    }
}
