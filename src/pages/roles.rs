//! Roles Page
//!
//! Temporary roles with single and batch removal, and the subscribe panels
//! the bot has posted.

use std::collections::BTreeSet;

use futures::future::join;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::{ErrorView, Loading};
use crate::format::{self, format_datetime, remaining, time_ago};
use crate::models::{SubscribePanel, TempRole};

/// Toggle one id in the selection
fn toggle(selection: &mut BTreeSet<i64>, id: i64) {
    if !selection.remove(&id) {
        selection.insert(id);
    }
}

/// Select everything, or clear when everything is already selected
fn toggle_all(selection: &mut BTreeSet<i64>, roles: &[TempRole]) {
    if all_selected(selection, roles) {
        selection.clear();
    } else {
        *selection = roles.iter().map(|r| r.id).collect();
    }
}

fn all_selected(selection: &BTreeSet<i64>, roles: &[TempRole]) -> bool {
    !roles.is_empty() && roles.iter().all(|r| selection.contains(&r.id))
}

#[component]
pub fn RolesPage() -> impl IntoView {
    let (temp_roles, set_temp_roles) = signal(Vec::<TempRole>::new());
    let (panels, set_panels) = signal(Vec::<SubscribePanel>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);

    let selected = RwSignal::new(BTreeSet::<i64>::new());
    let (removing, set_removing) = signal(false);

    let load_all = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let (roles, subs) = join(api::roles::temp_roles(), api::roles::subscribe_panels()).await;
            match (roles, subs) {
                (Ok(roles), Ok(subs)) => {
                    log::info!("[Roles] {} temp roles, {} panels", roles.len(), subs.len());
                    set_temp_roles.set(roles);
                    set_panels.set(subs);
                    selected.set(BTreeSet::new());
                }
                (Err(e), _) | (_, Err(e)) => set_error.set(Some(e.to_string())),
            }
            set_loading.set(false);
        });
    };
    load_all();

    let remove_single = move |id: i64| {
        if !confirm("确定要移除此临时身份组吗？") {
            return;
        }
        set_removing.set(true);
        spawn_local(async move {
            match api::roles::remove_temp_role(id).await {
                Ok(()) => {
                    log::info!("[Roles] removed temp role {id}");
                    load_all();
                }
                Err(e) => alert(&format!("移除失败: {e}")),
            }
            set_removing.set(false);
        });
    };

    let remove_batch = move |_| {
        let ids: Vec<i64> = selected.get_untracked().into_iter().collect();
        if ids.is_empty() || !confirm(&format!("确定要批量移除 {} 个临时身份组吗？", ids.len())) {
            return;
        }
        set_removing.set(true);
        spawn_local(async move {
            let mut failed = 0usize;
            for id in ids {
                if let Err(e) = api::roles::remove_temp_role(id).await {
                    log::warn!("[Roles] remove {id} failed: {e}");
                    failed += 1;
                }
            }
            if failed > 0 {
                alert(&format!("{failed} 个移除失败"));
            }
            load_all();
            set_removing.set(false);
        });
    };

    move || {
        if loading.get() {
            return view! { <Loading /> }.into_any();
        }
        if let Some(message) = error.get() {
            return view! { <ErrorView message=message on_retry=move |_: ()| load_all() /> }.into_any();
        }
        view! {
            <div class="page">
                <h1 class="page-title">"身份组管理"</h1>

                <div class="card table-card">
                    <div class="card-head spread">
                        <div class="row">
                            <h2 class="card-title">"临时身份组"</h2>
                            <span class="muted small">{move || format!("({} 个活跃)", temp_roles.with(Vec::len))}</span>
                        </div>
                        <Show when=move || selected.with(|s| !s.is_empty())>
                            <button class="btn danger small" disabled=move || removing.get() on:click=remove_batch>
                                {move || if removing.get() {
                                    "移除中...".to_string()
                                } else {
                                    format!("批量移除 ({})", selected.with(BTreeSet::len))
                                }}
                            </button>
                        </Show>
                    </div>
                    <Show
                        when=move || temp_roles.with(|r| !r.is_empty())
                        fallback=|| view! { <div class="empty-text">"暂无活跃的临时身份组"</div> }
                    >
                        <table class="data-table">
                            <thead>
                                <tr>
                                    <th class="narrow">
                                        <input
                                            type="checkbox"
                                            prop:checked=move || temp_roles.with(|roles| selected.with(|s| all_selected(s, roles)))
                                            on:change=move |_| {
                                                temp_roles.with_untracked(|roles| selected.update(|s| toggle_all(s, roles)))
                                            }
                                        />
                                    </th>
                                    <th>"用户 ID"</th>
                                    <th>"身份组 ID"</th>
                                    <th>"授予者 ID"</th>
                                    <th>"授予时间"</th>
                                    <th>"到期时间"</th>
                                    <th>"剩余"</th>
                                    <th class="right">"操作"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || temp_roles.get()
                                    key=|role| role.id
                                    children=move |role| {
                                        let id = role.id;
                                        let left = remaining(role.expire_at.as_deref(), format::now());
                                        view! {
                                            <tr>
                                                <td>
                                                    <input
                                                        type="checkbox"
                                                        prop:checked=move || selected.with(|s| s.contains(&id))
                                                        on:change=move |_| selected.update(|s| toggle(s, id))
                                                    />
                                                </td>
                                                <td class="mono small">{role.user_id.to_string()}</td>
                                                <td class="mono small">{role.role_id.to_string()}</td>
                                                <td class="mono small muted">
                                                    {role.granted_by.map(|g| g.to_string()).unwrap_or_else(|| "-".into())}
                                                </td>
                                                <td class="small muted">{time_ago(role.granted_at.as_deref())}</td>
                                                <td class="small muted">{format_datetime(role.expire_at.as_deref())}</td>
                                                <td>
                                                    <span class=if left.urgent { "remaining urgent" } else { "remaining" }>
                                                        {left.text}
                                                    </span>
                                                </td>
                                                <td class="right">
                                                    <button
                                                        class="text-danger"
                                                        disabled=move || removing.get()
                                                        on:click=move |_| remove_single(id)
                                                    >
                                                        "移除"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </Show>
                </div>

                <div class="card table-card">
                    <div class="card-head">
                        <h2 class="card-title">"订阅面板"</h2>
                        <span class="muted small">{move || format!("({} 个)", panels.with(Vec::len))}</span>
                    </div>
                    <Show
                        when=move || panels.with(|p| !p.is_empty())
                        fallback=|| view! { <div class="empty-text">"暂无订阅面板"</div> }
                    >
                        <table class="data-table">
                            <thead>
                                <tr>
                                    <th>"消息 ID"</th>
                                    <th>"频道 ID"</th>
                                    <th>"身份组"</th>
                                    <th>"创建时间"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {move || panels
                                    .get()
                                    .into_iter()
                                    .map(|panel| {
                                        let role_ids = panel.role_ids();
                                        view! {
                                            <tr>
                                                <td class="mono small">{panel.message_id.to_string()}</td>
                                                <td class="mono small">{panel.channel_id.to_string()}</td>
                                                <td>
                                                    <div class="chip-row">
                                                        {if role_ids.is_empty() {
                                                            view! { <span class="muted small">"-"</span> }.into_any()
                                                        } else {
                                                            role_ids
                                                                .into_iter()
                                                                .map(|rid| view! { <span class="role-chip mono">{rid}</span> })
                                                                .collect_view()
                                                                .into_any()
                                                        }}
                                                    </div>
                                                </td>
                                                <td class="small muted">{time_ago(panel.created_at.as_deref())}</td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                    </Show>
                </div>
            </div>
        }
        .into_any()
    }
}

fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_or(false)
}

fn alert(message: &str) {
    if window().alert_with_message(message).is_err() {
        log::warn!("[Roles] alert failed: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Snowflake, TempRoleStatus};

    fn role(id: i64) -> TempRole {
        TempRole {
            id,
            guild_id: None,
            user_id: Snowflake(1),
            role_id: Snowflake(2),
            granted_by: None,
            granted_at: None,
            expire_at: None,
            status: TempRoleStatus::Active,
        }
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut sel = BTreeSet::new();
        toggle(&mut sel, 5);
        toggle(&mut sel, 7);
        assert_eq!(sel.iter().copied().collect::<Vec<_>>(), vec![5, 7]);
        toggle(&mut sel, 5);
        assert_eq!(sel.iter().copied().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let roles = vec![role(1), role(2), role(3)];
        let mut sel = BTreeSet::from([2]);
        assert!(!all_selected(&sel, &roles));

        toggle_all(&mut sel, &roles);
        assert!(all_selected(&sel, &roles));
        assert_eq!(sel.len(), 3);

        toggle_all(&mut sel, &roles);
        assert!(sel.is_empty());
    }

    #[test]
    fn empty_list_is_never_all_selected() {
        assert!(!all_selected(&BTreeSet::new(), &[]));
    }
}
