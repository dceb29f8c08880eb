//! Frontend Models
//!
//! View-models matching the admin API's JSON responses.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};

// ========================
// Snowflake
// ========================

/// Discord 64-bit id. Accepts JSON numbers and decimal strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Snowflake(pub u64);

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Snowflake {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Snowflake)
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnowflakeVisitor;

        impl<'de> Visitor<'de> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a snowflake id as integer or decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Snowflake, E> {
                Ok(Snowflake(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Snowflake, E> {
                u64::try_from(v)
                    .map(Snowflake)
                    .map_err(|_| E::custom(format!("negative snowflake {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Snowflake, E> {
                v.parse().map_err(|_| E::custom(format!("invalid snowflake {v:?}")))
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

// ========================
// Session
// ========================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdminUser {
    pub user_id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl AdminUser {
    /// First character of the username, for the avatar placeholder
    pub fn initial(&self) -> String {
        self.username.chars().next().map(String::from).unwrap_or_else(|| "?".to_string())
    }
}

// ========================
// Dashboard
// ========================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Counts {
    pub total_files: u64,
    pub total_posts: u64,
    pub active_lotteries: u64,
    pub active_temp_roles: u64,
    pub anon_channels: u64,
    pub total_tracking: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Stats {
    pub counts: Counts,
    #[serde(default)]
    pub recent_tracking: Vec<TrackingRecord>,
    #[serde(default)]
    pub recent_lotteries: Vec<Lottery>,
    #[serde(default)]
    pub recent_temp_roles: Vec<TempRole>,
}

// ========================
// Files & Tracking
// ========================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileEntry {
    pub id: i64,
    pub file_name: String,
    pub version: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub uploaded_by: Option<Snowflake>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

/// Files of one post, in the order the server listed them
#[derive(Debug, Clone, PartialEq)]
pub struct PostGroup {
    pub name: String,
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilesResponse {
    #[serde(default, deserialize_with = "post_groups")]
    pub posts: Vec<PostGroup>,
}

/// Keeps the key order of the `posts` object, which `HashMap` would lose
fn post_groups<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<PostGroup>, D::Error> {
    struct GroupsVisitor;

    impl<'de> Visitor<'de> for GroupsVisitor {
        type Value = Vec<PostGroup>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object of post name to file list")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Vec<PostGroup>, A::Error> {
            let mut groups = Vec::new();
            while let Some((name, files)) = map.next_entry::<String, Vec<FileEntry>>()? {
                groups.push(PostGroup { name, files });
            }
            Ok(groups)
        }
    }

    deserializer.deserialize_map(GroupsVisitor)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostFilesResponse {
    pub post_name: String,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackingRecord {
    pub tracking_code: String,
    #[serde(default)]
    pub user_id: Option<Snowflake>,
    pub user_name: String,
    #[serde(default)]
    pub post_name: Option<String>,
    pub file_name: String,
    pub version: String,
    #[serde(default)]
    pub retrieved_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackingResponse {
    #[serde(default)]
    pub records: Vec<TrackingRecord>,
}

/// Result of uploading a file to the watermark checker
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WatermarkVerdict {
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub tracking_code: Option<String>,
    #[serde(default)]
    pub user_id: Option<Snowflake>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub post_name: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub retrieved_at: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ========================
// Anonymous channels
// ========================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnonChannel {
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub set_by: Option<Snowflake>,
    #[serde(default)]
    pub set_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnonChannelsResponse {
    #[serde(default)]
    pub channels: Vec<AnonChannel>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnonMessage {
    pub id: i64,
    pub bot_message_id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub sent_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnonMessagesResponse {
    #[serde(default)]
    pub messages: Vec<AnonMessage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnonIdentity {
    pub bot_message_id: Snowflake,
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub sent_at: Option<String>,
}

// ========================
// Lottery
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotteryStatus {
    Active,
    Ended,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl LotteryStatus {
    pub const TABS: [LotteryStatus; 3] = [LotteryStatus::Active, LotteryStatus::Ended, LotteryStatus::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            LotteryStatus::Active => "active",
            LotteryStatus::Ended => "ended",
            LotteryStatus::Cancelled => "cancelled",
            LotteryStatus::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LotteryStatus::Active => "进行中",
            LotteryStatus::Ended => "已结束",
            LotteryStatus::Cancelled => "已取消",
            LotteryStatus::Unknown => "未知",
        }
    }

    pub fn empty_text(&self) -> &'static str {
        match self {
            LotteryStatus::Active => "没有进行中的抽奖",
            LotteryStatus::Ended => "没有已结束的抽奖",
            LotteryStatus::Cancelled | LotteryStatus::Unknown => "没有已取消的抽奖",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Lottery {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub prize: String,
    #[serde(default)]
    pub winner_count: u32,
    pub status: LotteryStatus,
    #[serde(default)]
    pub entry_count: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
    #[serde(default)]
    pub created_by: Option<Snowflake>,
    #[serde(default)]
    pub required_role_id: Option<Snowflake>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LotteriesResponse {
    #[serde(default)]
    pub lotteries: Vec<Lottery>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LotteryEntry {
    pub user_id: Snowflake,
    #[serde(default)]
    pub entered_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LotteryDetail {
    pub lottery: Lottery,
    #[serde(default)]
    pub entries: Vec<LotteryEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DrawResult {
    pub lottery_id: i64,
    pub title: String,
    #[serde(default)]
    pub prize: String,
    #[serde(default)]
    pub total_entries: u32,
    #[serde(default)]
    pub winners: Vec<Snowflake>,
}

// ========================
// Roles
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempRoleStatus {
    Active,
    Expired,
    Removed,
    #[serde(other)]
    Unknown,
}

impl TempRoleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TempRoleStatus::Active => "活跃",
            TempRoleStatus::Expired => "已过期",
            TempRoleStatus::Removed => "已移除",
            TempRoleStatus::Unknown => "未知",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TempRole {
    pub id: i64,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub user_id: Snowflake,
    pub role_id: Snowflake,
    #[serde(default)]
    pub granted_by: Option<Snowflake>,
    #[serde(default)]
    pub granted_at: Option<String>,
    #[serde(default)]
    pub expire_at: Option<String>,
    pub status: TempRoleStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TempRolesResponse {
    #[serde(default)]
    pub temp_roles: Vec<TempRole>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubscribePanel {
    pub id: i64,
    pub message_id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    /// JSON-encoded array stored as text by the bot
    #[serde(default)]
    pub role_ids: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl SubscribePanel {
    /// Decode `role_ids`; anything other than a JSON array yields nothing
    pub fn role_ids(&self) -> Vec<String> {
        match serde_json::from_str::<serde_json::Value>(&self.role_ids) {
            Ok(serde_json::Value::Array(items)) => items
                .into_iter()
                .map(|v| match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubscribePanelsResponse {
    #[serde(default)]
    pub panels: Vec<SubscribePanel>,
}

// ========================
// Bot configuration
// ========================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfigEntry {
    pub value: serde_json::Value,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigResponse {
    #[serde(default)]
    pub configs: std::collections::BTreeMap<String, ConfigEntry>,
}

/// Value shape of `welcome_message` and `rules_message`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageTemplate {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_true")]
    pub show_guide_image: bool,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self { text: String::new(), show_guide_image: true }
    }
}

fn default_true() -> bool {
    true
}

impl ConfigResponse {
    pub fn message_template(&self, key: &str) -> MessageTemplate {
        self.configs
            .get(key)
            .and_then(|entry| serde_json::from_value(entry.value.clone()).ok())
            .unwrap_or_default()
    }

    pub fn string_list(&self, key: &str) -> Vec<String> {
        self.configs
            .get(key)
            .and_then(|entry| serde_json::from_value(entry.value.clone()).ok())
            .unwrap_or_default()
    }
}

// ========================
// Tasks
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Done,
    Failed,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending | TaskStatus::Unknown => "等待中",
            TaskStatus::Processing => "执行中",
            TaskStatus::Done => "完成",
            TaskStatus::Failed => "失败",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Task {
    pub id: i64,
    pub task_type: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Task {
    pub fn type_label(&self) -> String {
        let label = match self.task_type.as_str() {
            "draw_lottery" => "手动开奖",
            "cancel_lottery" => "取消抽奖",
            "remove_temp_role" => "移除身份组",
            "grant_temp_role" => "发放身份组",
            "bulk_delete" => "批量删除",
            "send_announcement" => "发送公告",
            other => return other.to_string(),
        };
        label.to_string()
    }

    /// One-line summary of `result` for the task log
    pub fn result_summary(&self) -> Option<String> {
        match self.result.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::Object(map) => match map.get("error") {
                Some(serde_json::Value::String(err)) => Some(err.clone()),
                _ => Some(serde_json::Value::Object(map.clone()).to_string()),
            },
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TasksResponse {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedTask {
    pub task_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask<P: Serialize> {
    pub task_type: &'static str,
    pub payload: P,
}

/// `send_announcement` task payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Announcement {
    pub channel_id: Snowflake,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_accepts_numbers_and_strings() {
        let a: Snowflake = serde_json::from_str("1446888252194816132").unwrap();
        let b: Snowflake = serde_json::from_str("\"1446888252194816132\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "1446888252194816132");
        assert!(serde_json::from_str::<Snowflake>("-5").is_err());
        assert!(serde_json::from_str::<Snowflake>("\"abc\"").is_err());
    }

    #[test]
    fn files_response_keeps_server_order() {
        let json = r#"{"posts": {
            "zeta": [{"id": 2, "file_name": "z.png", "version": "v2", "file_type": "image", "uploaded_by": 1, "uploaded_at": "2024-05-01T10:00:00"}],
            "alpha": [
                {"id": 1, "file_name": "a.json", "version": "v1", "file_type": "json", "uploaded_by": 1, "uploaded_at": null},
                {"id": 3, "file_name": "b.json", "version": "v1", "file_type": "json", "uploaded_by": null, "uploaded_at": null}
            ]
        }}"#;
        let resp: FilesResponse = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = resp.posts.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(resp.posts[1].files.len(), 2);
        assert_eq!(resp.posts[1].files[1].uploaded_by, None);
    }

    #[test]
    fn files_response_without_posts_is_empty() {
        let resp: FilesResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.posts.is_empty());
    }

    #[test]
    fn lottery_status_unknown_value() {
        let json = r#"{"id": 7, "title": "周末抽奖", "prize": "Nitro", "winner_count": 2,
                       "status": "paused", "entry_count": 5}"#;
        let lottery: Lottery = serde_json::from_str(json).unwrap();
        assert_eq!(lottery.status, LotteryStatus::Unknown);
        assert_eq!(lottery.required_role_id, None);
    }

    #[test]
    fn panel_role_ids_parse() {
        let mut panel = SubscribePanel {
            id: 1,
            message_id: Snowflake(10),
            channel_id: Snowflake(20),
            guild_id: None,
            role_ids: r#"["111", 222]"#.to_string(),
            created_at: None,
        };
        assert_eq!(panel.role_ids(), vec!["111".to_string(), "222".to_string()]);

        panel.role_ids = "not json".to_string();
        assert!(panel.role_ids().is_empty());

        panel.role_ids = r#"{"a": 1}"#.to_string();
        assert!(panel.role_ids().is_empty());
    }

    #[test]
    fn config_helpers_fall_back_to_defaults() {
        let json = r#"{"configs": {
            "welcome_message": {"value": {"text": "欢迎 {member_name}"}, "updated_at": "2024-01-01T00:00:00"},
            "admin_role_names": {"value": ["开心果bot"], "updated_at": null},
            "anon_nicknames": {"value": "broken", "updated_at": null}
        }}"#;
        let resp: ConfigResponse = serde_json::from_str(json).unwrap();
        let welcome = resp.message_template("welcome_message");
        assert_eq!(welcome.text, "欢迎 {member_name}");
        assert!(welcome.show_guide_image);
        assert_eq!(resp.message_template("rules_message"), MessageTemplate::default());
        assert_eq!(resp.string_list("admin_role_names"), vec!["开心果bot".to_string()]);
        assert!(resp.string_list("anon_nicknames").is_empty());
    }

    #[test]
    fn task_result_summary() {
        let mut task = Task {
            id: 1,
            task_type: "send_announcement".to_string(),
            status: TaskStatus::Failed,
            payload: None,
            result: Some(serde_json::json!({"error": "频道不存在"})),
            created_at: None,
        };
        assert_eq!(task.result_summary().as_deref(), Some("频道不存在"));
        assert_eq!(task.type_label(), "发送公告");

        task.result = Some(serde_json::json!({"message_id": 5}));
        assert_eq!(task.result_summary().as_deref(), Some(r#"{"message_id":5}"#));

        task.result = None;
        assert_eq!(task.result_summary(), None);

        task.task_type = "custom_job".to_string();
        assert_eq!(task.type_label(), "custom_job");
    }

    #[test]
    fn announcement_skips_empty_parts() {
        let payload = Announcement {
            channel_id: Snowflake(1446888252194816132),
            content: Some("hello".into()),
            embed: None,
        };
        let json = serde_json::to_value(NewTask { task_type: "send_announcement", payload }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "task_type": "send_announcement",
                "payload": {"channel_id": 1446888252194816132u64, "content": "hello"}
            })
        );
    }
}
