//! Usage notes for admins.

use leptos::prelude::*;

use crate::router::Route;

const NOTES: &[(Route, &[&str])] = &[
    (
        Route::Files,
        &[
            "按帖子分组列出机器人管理的资源文件，点击帖子查看文件并可删除。",
            "「追踪记录」显示最近的文件领取记录，每份文件都带有领取者的隐形水印。",
            "发现外泄文件时，把文件拖进「水印验证」即可查到领取者。",
        ],
    ),
    (
        Route::Anon,
        &[
            "匿名区消息以甜品代号显示，点击一条消息可查看发送者的真实身份。",
            "请仅在处理违规时查看身份，不要对外透露。",
        ],
    ),
    (
        Route::Lottery,
        &[
            "抽奖到期后机器人会自动开奖，也可以在这里手动开奖或取消。",
            "开奖和取消都不可撤销。",
        ],
    ),
    (
        Route::Roles,
        &[
            "临时身份组到期后机器人会自动移除，也可以提前单个或批量移除。",
            "剩余时间不足 1 小时会以醒目颜色提示。",
        ],
    ),
    (
        Route::Tools,
        &[
            "公告由机器人代发：填写频道 ID 和内容后提交，页面会等待机器人执行结果。",
            "频道 ID 可在 Discord 开发者模式下右键频道复制。",
            "如果提示任务超时，请到右侧的操作日志查看最终状态。",
        ],
    ),
    (
        Route::Config,
        &[
            "欢迎消息和规则消息支持 Markdown 和变量，保存后立即生效。",
            "修改管理员身份组时请保留自己的身份组，否则会失去面板访问权限。",
        ],
    ),
];

#[component]
pub fn FaqPage() -> impl IntoView {
    view! {
        <div class="page">
            <h1 class="page-title">"使用说明"</h1>
            <p class="page-subtitle">"只有拥有管理员身份组的成员可以登录本面板，登录状态 7 天内有效。"</p>
            <div class="stack">
                {NOTES
                    .iter()
                    .map(|(route, lines)| view! {
                        <div class="card">
                            <div class="card-head">
                                <h2 class="card-title">
                                    <span class="nav-icon">{route.icon()}</span>
                                    <a href=route.href()>{route.label()}</a>
                                </h2>
                            </div>
                            <ul class="card-body notes">
                                {lines.iter().map(|line| view! { <li>{*line}</li> }).collect_view()}
                            </ul>
                        </div>
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
