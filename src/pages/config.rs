//! Bot Settings Page
//!
//! Welcome / rules message templates and the two string-list settings.
//! Editors keep local state; a save writes one key and refreshes only that
//! key from the server.

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::Serialize;

use crate::api;
use crate::api::bot_config::{ADMIN_ROLE_NAMES, ANON_NICKNAMES, RULES_MESSAGE, WELCOME_MESSAGE};
use crate::components::{DeleteConfirmButton, ErrorView, Loading, MarkdownPreview};
use crate::format::time_ago;
use crate::models::{ConfigEntry, ConfigResponse, MessageTemplate};

// ========================
// String list editing
// ========================

/// Append a trimmed, non-empty, not yet present item
fn add_item(items: &mut Vec<String>, raw: &str) -> bool {
    let item = raw.trim();
    if item.is_empty() || items.iter().any(|i| i == item) {
        return false;
    }
    items.push(item.to_string());
    true
}

/// Remove by index unless that would go below `min_items`
fn remove_item(items: &mut Vec<String>, index: usize, min_items: usize) -> Result<(), String> {
    if min_items > 0 && items.len() <= min_items {
        return Err(format!("至少需要 {min_items} 项哦～"));
    }
    if index < items.len() {
        items.remove(index);
    }
    Ok(())
}

/// One item per line; blank lines skipped, duplicates dropped, order kept
fn bulk_import(items: &mut Vec<String>, text: &str) {
    let mut merged: Vec<String> = Vec::with_capacity(items.len());
    let incoming = items.drain(..).chain(text.lines().map(|l| l.trim().to_string()));
    for item in incoming {
        if !item.is_empty() && !merged.contains(&item) {
            merged.push(item);
        }
    }
    *items = merged;
}

// ========================
// Saving
// ========================

/// PUT one key, then refresh that key in `configs`
async fn save_config<V: Serialize>(
    configs: RwSignal<Option<ConfigResponse>>,
    key: &'static str,
    value: &V,
) -> Result<(), String> {
    api::bot_config::update(key, value).await.map_err(|e| e.to_string())?;
    log::info!("[Config] saved {key}");

    match api::bot_config::get_item(key).await {
        Ok(item) => configs.update(|c| {
            if let Some(c) = c {
                c.configs.insert(item.key, ConfigEntry { value: item.value, updated_at: item.updated_at });
            }
        }),
        Err(e) => log::warn!("[Config] refresh {key} failed: {e}"),
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigTab {
    Welcome,
    Rules,
    Admin,
    Nicknames,
}

impl ConfigTab {
    const ALL: [ConfigTab; 4] = [ConfigTab::Welcome, ConfigTab::Rules, ConfigTab::Admin, ConfigTab::Nicknames];

    fn label(&self) -> &'static str {
        match self {
            ConfigTab::Welcome => "欢迎消息",
            ConfigTab::Rules => "规则消息",
            ConfigTab::Admin => "管理员身份组",
            ConfigTab::Nicknames => "匿名昵称池",
        }
    }
}

const WELCOME_VARIABLES: &[(&str, &str)] = &[
    ("{member_name}", "成员用户名"),
    ("{member_mention}", "成员@提及"),
    ("{rules_link}", "规则链接"),
    ("{newbie_qa_link}", "新人提问频道链接"),
    ("{guild_name}", "服务器名称"),
];

const RULES_VARIABLES: &[(&str, &str)] = &[
    ("{rules_link}", "规则链接"),
    ("{newbie_qa_link}", "新人提问频道链接"),
];

#[component]
pub fn ConfigPage() -> impl IntoView {
    let configs = RwSignal::new(None::<ConfigResponse>);
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);
    let (tab, set_tab) = signal(ConfigTab::Welcome);

    let load = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::bot_config::list().await {
                Ok(loaded) => {
                    log::info!("[Config] loaded {} keys", loaded.configs.len());
                    configs.set(Some(loaded));
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_loading.set(false);
        });
    };
    load();

    let editor = move || {
        let current = tab.get();
        let snapshot = configs.with_untracked(|c| c.clone().unwrap_or_default());
        match current {
            ConfigTab::Welcome => view! {
                <MessageEditor
                    title="欢迎消息"
                    description="新成员加入服务器时，小鹅子会私信发送这条消息"
                    config_key=WELCOME_MESSAGE
                    initial=snapshot.message_template(WELCOME_MESSAGE)
                    variables=WELCOME_VARIABLES
                    configs=configs
                />
            }
            .into_any(),
            ConfigTab::Rules => view! {
                <MessageEditor
                    title="规则消息"
                    description="用户发送 !规则 时，小鹅子回复的内容"
                    config_key=RULES_MESSAGE
                    initial=snapshot.message_template(RULES_MESSAGE)
                    variables=RULES_VARIABLES
                    configs=configs
                />
            }
            .into_any(),
            ConfigTab::Admin => view! {
                <StringListEditor
                    title="管理员身份组"
                    description="拥有这些身份组的成员可以使用管理员指令和登录管理面板"
                    config_key=ADMIN_ROLE_NAMES
                    initial=snapshot.string_list(ADMIN_ROLE_NAMES)
                    placeholder="输入身份组名称..."
                    min_items=1
                    warning=Some("修改后请确保你自己的身份组在列表中，否则会失去管理面板访问权限！")
                    bulk_import_enabled=false
                    configs=configs
                />
            }
            .into_any(),
            ConfigTab::Nicknames => view! {
                <StringListEditor
                    title="匿名昵称池"
                    description="匿名区发言时随机分配的甜品代号，格式建议：emoji + 空格 + 名称"
                    config_key=ANON_NICKNAMES
                    initial=snapshot.string_list(ANON_NICKNAMES)
                    placeholder="如：冰淇淋泡芙"
                    min_items=0
                    warning=None
                    bulk_import_enabled=true
                    configs=configs
                />
            }
            .into_any(),
        }
    };

    move || {
        if loading.get() {
            return view! { <Loading text="小鹅子正在翻找..." /> }.into_any();
        }
        if let Some(message) = error.get() {
            return view! { <ErrorView message=message on_retry=move |_: ()| load() /> }.into_any();
        }
        view! {
            <div class="page">
                <h1 class="page-title">"鹅的设置"</h1>
                <p class="page-subtitle">"在这里修改小鹅子的各种配置哦～改完立刻生效！"</p>

                <div class="tabs">
                    {ConfigTab::ALL
                        .into_iter()
                        .map(|t| view! {
                            <button
                                class=move || if tab.get() == t { "tab active" } else { "tab" }
                                on:click=move |_| set_tab.set(t)
                            >
                                {t.label()}
                            </button>
                        })
                        .collect_view()}
                </div>

                {editor}
            </div>
        }
        .into_any()
    }
}

/// Inline save state next to the save button
#[component]
fn SaveStatus(result: ReadSignal<Option<Result<(), String>>>) -> impl IntoView {
    move || {
        result.get().map(|r| match r {
            Ok(()) => view! { <span class="save-ok">"保存成功！"</span> }.into_any(),
            Err(message) => view! { <span class="save-err">{message}</span> }.into_any(),
        })
    }
}

#[component]
fn LastUpdated(configs: RwSignal<Option<ConfigResponse>>, config_key: &'static str) -> impl IntoView {
    move || {
        configs
            .with(|c| c.as_ref().and_then(|c| c.configs.get(config_key)).and_then(|e| e.updated_at.clone()))
            .map(|at| view! { <span class="small muted">{format!("上次修改：{}", time_ago(Some(&at)))}</span> })
    }
}

#[component]
fn MessageEditor(
    title: &'static str,
    description: &'static str,
    config_key: &'static str,
    initial: MessageTemplate,
    variables: &'static [(&'static str, &'static str)],
    configs: RwSignal<Option<ConfigResponse>>,
) -> impl IntoView {
    let (text, set_text) = signal(initial.text);
    let (show_image, set_show_image) = signal(initial.show_guide_image);
    let (saving, set_saving) = signal(false);
    let (result, set_result) = signal(None::<Result<(), String>>);

    let save = move |_| {
        set_saving.set(true);
        set_result.set(None);
        let value = MessageTemplate { text: text.get_untracked(), show_guide_image: show_image.get_untracked() };
        spawn_local(async move {
            set_result.set(Some(save_config(configs, config_key, &value).await));
            set_saving.set(false);
        });
    };

    view! {
        <div class="card">
            <div class="card-head spread">
                <div>
                    <h2 class="card-title">{title}</h2>
                    <p class="small muted">{description}</p>
                </div>
                <LastUpdated configs=configs config_key=config_key />
            </div>
            <div class="card-body form">
                {(!variables.is_empty()).then(|| view! {
                    <div class="var-legend">
                        <p class="strong small">"可用变量（会自动替换）："</p>
                        <div class="chip-row">
                            {variables
                                .iter()
                                .map(|(name, desc)| view! {
                                    <span class="small muted"><code class="tpl-var">{*name}</code>" "{*desc}</span>
                                })
                                .collect_view()}
                        </div>
                    </div>
                })}

                <div class="editor-split">
                    <label class="field">
                        <span class="field-label">"消息内容"</span>
                        <textarea
                            class="input mono"
                            rows="10"
                            prop:value=move || text.get()
                            on:input=move |ev| set_text.set(event_target_value(&ev))
                        ></textarea>
                    </label>
                    <div class="field">
                        <span class="field-label">"预览"</span>
                        <MarkdownPreview text=text />
                    </div>
                </div>

                <label class="row muted">
                    <input
                        type="checkbox"
                        prop:checked=move || show_image.get()
                        on:change=move |ev| set_show_image.set(event_target_checked(&ev))
                    />
                    "附带标注教程图片"
                </label>

                <div class="row">
                    <button class="btn primary" disabled=move || saving.get() on:click=save>
                        {move || if saving.get() { "保存中..." } else { "好的呀！保存～" }}
                    </button>
                    <SaveStatus result=result />
                </div>
            </div>
        </div>
    }
}

#[component]
#[allow(clippy::too_many_arguments)]
fn StringListEditor(
    title: &'static str,
    description: &'static str,
    config_key: &'static str,
    initial: Vec<String>,
    placeholder: &'static str,
    min_items: usize,
    warning: Option<&'static str>,
    bulk_import_enabled: bool,
    configs: RwSignal<Option<ConfigResponse>>,
) -> impl IntoView {
    let items = RwSignal::new(initial);
    let (new_item, set_new_item) = signal(String::new());
    let (bulk_open, set_bulk_open) = signal(false);
    let (bulk_text, set_bulk_text) = signal(String::new());
    let (saving, set_saving) = signal(false);
    let (result, set_result) = signal(None::<Result<(), String>>);

    let add = move || {
        let raw = new_item.get_untracked();
        let mut added = false;
        items.update(|list| added = add_item(list, &raw));
        if added {
            set_new_item.set(String::new());
        }
    };

    let remove = move |index: usize| {
        let mut outcome = Ok(());
        items.update(|list| outcome = remove_item(list, index, min_items));
        if let Err(message) = outcome {
            if window().alert_with_message(&message).is_err() {
                log::warn!("[Config] {message}");
            }
        }
    };

    let import = move |_| {
        let text = bulk_text.get_untracked();
        items.update(|list| bulk_import(list, &text));
        set_bulk_open.set(false);
        set_bulk_text.set(String::new());
    };

    let save = move |_| {
        set_saving.set(true);
        set_result.set(None);
        let value = items.get_untracked();
        spawn_local(async move {
            set_result.set(Some(save_config(configs, config_key, &value).await));
            set_saving.set(false);
        });
    };

    view! {
        <div class="card">
            <div class="card-head spread">
                <div>
                    <h2 class="card-title">{title}</h2>
                    <p class="small muted">{description}</p>
                </div>
                <LastUpdated configs=configs config_key=config_key />
            </div>
            <div class="card-body form">
                {warning.map(|w| view! { <div class="notice warn">{w}</div> })}

                <div class="chip-row">
                    {move || {
                        let list = items.get();
                        if list.is_empty() {
                            return view! { <span class="muted">"空的呢～"</span> }.into_any();
                        }
                        list.into_iter()
                            .enumerate()
                            .map(|(idx, item)| view! {
                                <span class="list-chip">
                                    {item}
                                    <DeleteConfirmButton
                                        button_class="chip-remove"
                                        disabled=Signal::derive(move || saving.get())
                                        on_confirm=move |_: ()| remove(idx)
                                    />
                                </span>
                            })
                            .collect_view()
                            .into_any()
                    }}
                </div>
                <p class="small muted">{move || format!("共 {} 项", items.with(Vec::len))}</p>

                <div class="row">
                    <input
                        class="input grow"
                        type="text"
                        placeholder=placeholder
                        prop:value=move || new_item.get()
                        on:input=move |ev| set_new_item.set(event_target_value(&ev))
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                add();
                            }
                        }
                    />
                    <button class="btn primary" on:click=move |_| add()>"添加"</button>
                    {bulk_import_enabled.then(|| view! {
                        <button class="btn ghost" on:click=move |_| set_bulk_open.update(|open| *open = !*open)>
                            {move || if bulk_open.get() { "收起" } else { "批量导入" }}
                        </button>
                    })}
                </div>

                <Show when=move || bulk_open.get()>
                    <div class="bulk-box">
                        <span class="field-label">"每行一个昵称："</span>
                        <textarea
                            class="input"
                            rows="6"
                            placeholder="冰淇淋泡芙\n雪域杯子蛋糕\n冰山芝士蛋糕"
                            prop:value=move || bulk_text.get()
                            on:input=move |ev| set_bulk_text.set(event_target_value(&ev))
                        ></textarea>
                        <button class="btn primary small" on:click=import>"导入"</button>
                    </div>
                </Show>

                <div class="row">
                    <button class="btn primary" disabled=move || saving.get() on:click=save>
                        {move || if saving.get() { "保存中..." } else { "好的呀！保存～" }}
                    </button>
                    <SaveStatus result=result />
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn add_trims_and_skips_duplicates() {
        let mut items = list(&["🍦 冰淇淋泡芙"]);
        assert!(add_item(&mut items, "  🧁 雪域杯子蛋糕 "));
        assert!(!add_item(&mut items, "🍦 冰淇淋泡芙"));
        assert!(!add_item(&mut items, "   "));
        assert_eq!(items, list(&["🍦 冰淇淋泡芙", "🧁 雪域杯子蛋糕"]));
    }

    #[test]
    fn remove_respects_minimum() {
        let mut items = list(&["开心果bot"]);
        assert_eq!(remove_item(&mut items, 0, 1), Err("至少需要 1 项哦～".to_string()));
        assert_eq!(items.len(), 1);

        let mut items = list(&["a", "b", "c"]);
        assert_eq!(remove_item(&mut items, 1, 1), Ok(()));
        assert_eq!(items, list(&["a", "c"]));

        let mut items = list(&["only"]);
        assert_eq!(remove_item(&mut items, 0, 0), Ok(()));
        assert!(items.is_empty());
    }

    #[test]
    fn bulk_import_dedupes_in_order() {
        let mut items = list(&["甜甜圈", "布丁"]);
        bulk_import(&mut items, "布丁\n\n  马卡龙 \n甜甜圈\n马卡龙\n提拉米苏");
        assert_eq!(items, list(&["甜甜圈", "布丁", "马卡龙", "提拉米苏"]));
    }
}
