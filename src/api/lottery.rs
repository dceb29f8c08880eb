//! Lottery Endpoints

use super::{get_json, post_empty, Ack, ApiError};
use crate::models::{DrawResult, LotteriesResponse, Lottery, LotteryDetail, LotteryStatus};

pub async fn list(status: LotteryStatus) -> Result<Vec<Lottery>, ApiError> {
    let resp: LotteriesResponse = get_json(&format!("/lottery?status={}", status.as_str())).await?;
    Ok(resp.lotteries)
}

pub async fn detail(id: i64) -> Result<LotteryDetail, ApiError> {
    get_json(&format!("/lottery/{id}")).await
}

/// Draw winners now; the server picks them
pub async fn draw(id: i64) -> Result<DrawResult, ApiError> {
    post_empty(&format!("/lottery/{id}/draw")).await
}

pub async fn cancel(id: i64) -> Result<(), ApiError> {
    post_empty::<Ack>(&format!("/lottery/{id}/cancel")).await.map(|_| ())
}
