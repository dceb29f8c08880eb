//! Files Page
//!
//! Left: post list and the watermark checker. Right: files of the selected
//! post with delete, plus its tracking records on demand.

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::is_current;
use crate::api;
use crate::components::{ConfirmModal, ErrorView, Loading};
use crate::config;
use crate::format::{file_icon, time_ago};
use crate::models::{FileEntry, PostGroup, TrackingRecord, WatermarkVerdict};

/// Keep the selection only if the post still exists after a reload
fn keep_selection(selected: Option<String>, posts: &[PostGroup]) -> Option<String> {
    selected.filter(|name| posts.iter().any(|p| &p.name == name))
}

#[derive(Debug, Clone, PartialEq)]
enum VerdictKind {
    Found,
    /// Code decoded but the server has no matching record
    UnknownCode { code: String, message: String },
    NotDetected(String),
}

fn classify(verdict: &WatermarkVerdict) -> VerdictKind {
    if verdict.found {
        return VerdictKind::Found;
    }
    match verdict.tracking_code.clone().filter(|c| !c.is_empty()) {
        Some(code) => VerdictKind::UnknownCode {
            code,
            message: verdict.message.clone().unwrap_or_default(),
        },
        None => VerdictKind::NotDetected(
            verdict
                .message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "未检测到水印".to_string()),
        ),
    }
}

#[component]
pub fn FilesPage() -> impl IntoView {
    let (posts, set_posts) = signal(Vec::<PostGroup>::new());
    let (selected, set_selected) = signal(None::<String>);
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);

    let (tracking, set_tracking) = signal(Vec::<TrackingRecord>::new());
    let (tracking_open, set_tracking_open) = signal(false);

    // Files of the selected post as last fetched on their own
    let (post_detail, set_post_detail) = signal(None::<(String, Vec<FileEntry>)>);

    let (delete_target, set_delete_target) = signal(None::<FileEntry>);
    let (deleting, set_deleting) = signal(false);

    let load_files = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::files::list_posts().await {
                Ok(loaded) => {
                    log::info!("[Files] loaded {} posts", loaded.len());
                    set_selected.update(|sel| *sel = keep_selection(sel.take(), &loaded));
                    set_posts.set(loaded);
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_loading.set(false);
        });
    };
    load_files();

    let refresh_post = move |post: String| {
        spawn_local(async move {
            match api::files::post_files(&post).await {
                Ok(files) => {
                    if is_current(selected, &Some(post.clone())) {
                        set_post_detail.set(Some((post, files)));
                    }
                }
                Err(e) => log::warn!("[Files] files of {post} failed: {e}"),
            }
        });
    };

    Effect::new(move |_| {
        if let Some(post) = selected.get() {
            refresh_post(post);
        }
    });

    let select_post = move |name: String| {
        set_selected.set(Some(name));
        set_tracking_open.set(false);
        set_tracking.set(Vec::new());
    };

    let toggle_tracking = move |_: ()| {
        let open = tracking_open.get_untracked();
        match (open, selected.get_untracked()) {
            (false, Some(post)) => spawn_local(async move {
                let records = api::files::tracking(&post, config::get().tracking_limit)
                    .await
                    .unwrap_or_else(|e| {
                        log::warn!("[Files] tracking for {post} failed: {e}");
                        Vec::new()
                    });
                if is_current(selected, &Some(post)) {
                    set_tracking.set(records);
                    set_tracking_open.set(true);
                }
            }),
            _ => set_tracking_open.set(!open),
        }
    };

    let confirm_delete = move |_: ()| {
        let Some(target) = delete_target.get_untracked() else {
            return;
        };
        set_deleting.set(true);
        spawn_local(async move {
            match api::files::delete_file(target.id).await {
                Ok(()) => {
                    log::info!("[Files] deleted file {} ({})", target.id, target.file_name);
                    set_delete_target.set(None);
                    load_files();
                    if let Some(post) = selected.try_get_untracked().flatten() {
                        refresh_post(post);
                    }
                }
                Err(e) => alert(&format!("删除失败: {e}")),
            }
            set_deleting.set(false);
        });
    };

    let current_files = move || {
        let name = selected.get()?;
        let fetched = post_detail.with(|d| {
            d.as_ref().filter(|(post, _)| *post == name).map(|(_, files)| files.clone())
        });
        fetched.or_else(|| posts.with(|groups| groups.iter().find(|g| g.name == name).map(|g| g.files.clone())))
    };

    view! {
        {move || {
            if loading.get() {
                return view! { <Loading /> }.into_any();
            }
            if let Some(message) = error.get() {
                return view! { <ErrorView message=message on_retry=move |_: ()| load_files() /> }.into_any();
            }
            view! {
                <div class="page">
                    <h1 class="page-title">"文件管理"</h1>
                    <div class="split">
                        <div class="split-left">
                            <div class="card">
                                <div class="card-head spread">
                                    <h2 class="card-title">"帖子列表"</h2>
                                    <span class="muted">{move || format!("{} 个", posts.with(Vec::len))}</span>
                                </div>
                                <div class="post-list">
                                    <Show
                                        when=move || posts.with(|p| !p.is_empty())
                                        fallback=|| view! { <div class="empty-text">"暂无帖子"</div> }
                                    >
                                        <For
                                            each=move || posts.get()
                                            key=|group| (group.name.clone(), group.files.len())
                                            children=move |group| {
                                                let name = group.name.clone();
                                                let is_selected = {
                                                    let name = name.clone();
                                                    move || selected.get().as_deref() == Some(name.as_str())
                                                };
                                                view! {
                                                    <button
                                                        class=move || if is_selected() { "post-item selected" } else { "post-item" }
                                                        on:click=move |_| select_post(name.clone())
                                                    >
                                                        <div class="truncate">{group.name.clone()}</div>
                                                        <div class="muted small">{format!("{} 个文件", group.files.len())}</div>
                                                    </button>
                                                }
                                            }
                                        />
                                    </Show>
                                </div>
                            </div>
                            <WatermarkVerifier />
                        </div>

                        <div class="split-right">
                            {move || match (selected.get(), current_files()) {
                                (Some(post), files) => {
                                    let files = files.unwrap_or_default();
                                    view! {
                                        <PostDetail
                                            post=post
                                            files=files
                                            tracking_open=tracking_open
                                            on_toggle_tracking=toggle_tracking
                                            on_delete=move |file: FileEntry| set_delete_target.set(Some(file))
                                        />
                                        <Show when=move || tracking_open.get()>
                                            <TrackingPanel
                                                records=tracking
                                                post_name=selected.get_untracked().unwrap_or_default()
                                            />
                                        </Show>
                                    }
                                    .into_any()
                                }
                                (None, _) => view! {
                                    <div class="card placeholder-card">
                                        <div class="big-icon">"📂"</div>
                                        <p class="muted">"选择左侧的帖子查看文件"</p>
                                    </div>
                                }
                                .into_any(),
                            }}
                        </div>
                    </div>

                    <Show when=move || delete_target.with(Option::is_some)>
                        <ConfirmModal
                            title="确认删除"
                            message=Signal::derive(move || {
                                delete_target
                                    .get()
                                    .map(|f| format!("确定要删除文件「{}」({}) 吗？此操作不可撤销。", f.file_name, f.version))
                                    .unwrap_or_default()
                            })
                            confirm_text=Signal::derive(move || {
                                if deleting.get() { "删除中...".to_string() } else { "确认删除".to_string() }
                            })
                            confirm_disabled=deleting
                            on_confirm=confirm_delete
                            on_cancel=move |_: ()| set_delete_target.set(None)
                        />
                    </Show>
                </div>
            }
            .into_any()
        }}
    }
}

#[component]
fn PostDetail(
    post: String,
    files: Vec<FileEntry>,
    tracking_open: ReadSignal<bool>,
    #[prop(into)] on_toggle_tracking: Callback<()>,
    #[prop(into)] on_delete: Callback<FileEntry>,
) -> impl IntoView {
    let count = files.len();
    let empty = files.is_empty();
    view! {
        <div class="card post-head">
            <div>
                <h2 class="post-title">{post}</h2>
                <p class="muted small">{format!("{count} 个文件")}</p>
            </div>
            <button
                class=move || if tracking_open.get() { "toggle-btn on" } else { "toggle-btn" }
                on:click=move |_| on_toggle_tracking.run(())
            >
                {move || if tracking_open.get() { "隐藏追踪记录" } else { "查看追踪记录" }}
            </button>
        </div>
        <div class="card table-card">
            <table class="data-table">
                <thead>
                    <tr>
                        <th>"文件名"</th>
                        <th>"版本"</th>
                        <th>"类型"</th>
                        <th>"上传时间"</th>
                        <th class="right">"操作"</th>
                    </tr>
                </thead>
                <tbody>
                    {files
                        .into_iter()
                        .map(|f| {
                            let target = f.clone();
                            view! {
                                <tr>
                                    <td>
                                        <span class="file-icon">{file_icon(&f.file_type.to_lowercase())}</span>
                                        <span class="truncate">{f.file_name}</span>
                                    </td>
                                    <td><span class="tag">{f.version}</span></td>
                                    <td class="muted">{f.file_type}</td>
                                    <td class="muted small">{time_ago(f.uploaded_at.as_deref())}</td>
                                    <td class="right">
                                        <button class="text-danger" on:click=move |_| on_delete.run(target.clone())>
                                            "删除"
                                        </button>
                                    </td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
            {empty.then(|| view! { <div class="empty-text">"此帖子下暂无文件"</div> })}
        </div>
    }
}

#[component]
fn TrackingPanel(records: ReadSignal<Vec<TrackingRecord>>, post_name: String) -> impl IntoView {
    move || {
        let rows = records.get();
        if rows.is_empty() {
            return view! {
                <div class="card empty-text">{format!("帖子「{post_name}」暂无追踪记录")}</div>
            }
            .into_any();
        }
        view! {
            <div class="card table-card">
                <div class="card-head">
                    <h3 class="card-title">{format!("追踪记录 ({})", rows.len())}</h3>
                </div>
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"追踪码"</th>
                            <th>"用户"</th>
                            <th>"文件"</th>
                            <th>"版本"</th>
                            <th>"获取时间"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {rows
                            .into_iter()
                            .map(|r| view! {
                                <tr>
                                    <td><code class="code">{r.tracking_code}</code></td>
                                    <td>{r.user_name}</td>
                                    <td class="muted truncate">{r.file_name}</td>
                                    <td><span class="tag">{r.version}</span></td>
                                    <td class="muted small">{time_ago(r.retrieved_at.as_deref())}</td>
                                </tr>
                            })
                            .collect_view()}
                    </tbody>
                </table>
            </div>
        }
        .into_any()
    }
}

#[derive(Debug, Clone)]
enum VerifyState {
    Idle,
    Verifying,
    Failed(String),
    Done(WatermarkVerdict),
}

/// Drop or pick a file to find whose download it came from
#[component]
fn WatermarkVerifier() -> impl IntoView {
    let (state, set_state) = signal(VerifyState::Idle);
    let (drag_over, set_drag_over) = signal(false);
    let input_ref = NodeRef::<html::Input>::new();

    let verify = move |file: web_sys::File| {
        log::info!("[Files] verifying watermark of {}", file.name());
        set_state.set(VerifyState::Verifying);
        spawn_local(async move {
            let next = match api::files::verify_watermark(&file).await {
                Ok(verdict) => VerifyState::Done(verdict),
                Err(e) => VerifyState::Failed(e.to_string()),
            };
            set_state.set(next);
        });
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        set_drag_over.set(false);
        if let Some(file) = ev.data_transfer().and_then(|dt| dt.files()).and_then(|list| list.get(0)) {
            verify(file);
        }
    };

    let on_pick = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        if let Some(file) = input.files().and_then(|list| list.get(0)) {
            verify(file);
        }
        // Allow picking the same file again
        input.set_value("");
    };

    view! {
        <div class="card verifier">
            <div class="card-head">
                <h2 class="card-title">"水印验证"</h2>
            </div>
            <div class="verifier-body">
                <div
                    class=move || if drag_over.get() { "drop-area over" } else { "drop-area" }
                    on:dragover=move |ev: web_sys::DragEvent| {
                        ev.prevent_default();
                        set_drag_over.set(true);
                    }
                    on:dragleave=move |_| set_drag_over.set(false)
                    on:drop=on_drop
                    on:click=move |_| {
                        if let Some(input) = input_ref.get() {
                            input.click();
                        }
                    }
                >
                    {move || match state.get() {
                        VerifyState::Verifying => view! {
                            <div class="spin">"🔍"</div>
                            <p class="muted">"验证中..."</p>
                        }
                        .into_any(),
                        _ => view! {
                            <div class="big-icon">"📎"</div>
                            <p class="muted small">"拖拽或点击上传"</p>
                            <p class="muted small">"PNG / JPG / JSON"</p>
                        }
                        .into_any(),
                    }}
                    <input
                        node_ref=input_ref
                        type="file"
                        accept=".png,.jpg,.jpeg,.json"
                        class="hidden"
                        on:change=on_pick
                    />
                </div>
                {move || match state.get() {
                    VerifyState::Idle | VerifyState::Verifying => ().into_any(),
                    VerifyState::Failed(message) => view! { <div class="notice error">{message}</div> }.into_any(),
                    VerifyState::Done(verdict) => verdict_view(verdict).into_any(),
                }}
            </div>
        </div>
    }
}

fn verdict_view(verdict: WatermarkVerdict) -> impl IntoView {
    match classify(&verdict) {
        VerdictKind::Found => {
            let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
            let user_id = verdict.user_id.map(|id| id.to_string()).unwrap_or_default();
            view! {
                <div class="notice success">
                    <p class="strong">"找到水印"</p>
                    <p>"追踪码：" <code class="code">{or_dash(verdict.tracking_code)}</code></p>
                    <p>{format!("用户：{} ({})", or_dash(verdict.user_name), user_id)}</p>
                    <p>{format!("帖子：{}", or_dash(verdict.post_name))}</p>
                    <p>{format!("文件：{} ({})", or_dash(verdict.file_name), or_dash(verdict.version))}</p>
                    <p class="small">{format!("获取时间：{}", or_dash(verdict.retrieved_at))}</p>
                </div>
            }
            .into_any()
        }
        VerdictKind::UnknownCode { code, message } => view! {
            <div class="notice warn">
                <p>"追踪码：" <code class="code">{code}</code></p>
                <p>{message}</p>
            </div>
        }
        .into_any(),
        VerdictKind::NotDetected(message) => view! {
            <div class="notice warn"><p>{message}</p></div>
        }
        .into_any(),
    }
}

fn alert(message: &str) {
    if window().alert_with_message(message).is_err() {
        log::warn!("[Files] alert failed: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str) -> PostGroup {
        PostGroup { name: name.to_string(), files: Vec::new() }
    }

    #[test]
    fn selection_survives_only_if_post_remains() {
        let posts = vec![group("角色卡"), group("预设")];
        assert_eq!(keep_selection(Some("预设".into()), &posts), Some("预设".to_string()));
        assert_eq!(keep_selection(Some("已删除".into()), &posts), None);
        assert_eq!(keep_selection(None, &posts), None);
    }

    #[test]
    fn verdict_classification() {
        let found = WatermarkVerdict { found: true, tracking_code: Some("AB12".into()), ..Default::default() };
        assert_eq!(classify(&found), VerdictKind::Found);

        let orphan = WatermarkVerdict {
            tracking_code: Some("ZZ99".into()),
            message: Some("追踪码存在但数据库中无记录".into()),
            ..Default::default()
        };
        assert_eq!(
            classify(&orphan),
            VerdictKind::UnknownCode { code: "ZZ99".into(), message: "追踪码存在但数据库中无记录".into() }
        );

        assert_eq!(classify(&WatermarkVerdict::default()), VerdictKind::NotDetected("未检测到水印".into()));
        let custom = WatermarkVerdict { message: Some("不支持的文件".into()), ..Default::default() };
        assert_eq!(classify(&custom), VerdictKind::NotDetected("不支持的文件".into()));
    }
}
