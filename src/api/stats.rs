//! Dashboard Statistics

use super::{get_json, ApiError};
use crate::models::Stats;

pub async fn fetch_stats() -> Result<Stats, ApiError> {
    get_json("/stats").await
}
