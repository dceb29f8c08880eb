//! Anonymous Channel Endpoints

use super::{get_json, ApiError};
use crate::models::{AnonChannel, AnonChannelsResponse, AnonIdentity, AnonMessage, AnonMessagesResponse, Snowflake};

/// Page sizes offered by the message list; the server caps at the largest
pub const MESSAGE_LIMITS: [u32; 3] = [50, 100, 200];

pub async fn channels() -> Result<Vec<AnonChannel>, ApiError> {
    let resp: AnonChannelsResponse = get_json("/anon/channels").await?;
    Ok(resp.channels)
}

pub fn messages_path(channel: Option<Snowflake>, limit: u32) -> String {
    match channel {
        Some(channel_id) => format!("/anon/messages?limit={limit}&channel_id={channel_id}"),
        None => format!("/anon/messages?limit={limit}"),
    }
}

pub async fn messages(channel: Option<Snowflake>, limit: u32) -> Result<Vec<AnonMessage>, ApiError> {
    let resp: AnonMessagesResponse = get_json(&messages_path(channel, limit)).await?;
    Ok(resp.messages)
}

/// Reveal who sent an anonymous message
pub async fn identity(bot_message_id: Snowflake) -> Result<AnonIdentity, ApiError> {
    get_json(&format!("/anon/identity/{bot_message_id}")).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_path_with_and_without_channel() {
        assert_eq!(messages_path(None, 50), "/anon/messages?limit=50");
        assert_eq!(
            messages_path(Some(Snowflake(1446888252194816132)), 200),
            "/anon/messages?limit=200&channel_id=1446888252194816132"
        );
    }
}
