//! Temporary Role & Subscribe Panel Endpoints

use super::{delete, get_json, Ack, ApiError};
use crate::models::{SubscribePanel, SubscribePanelsResponse, TempRole, TempRolesResponse};

pub async fn temp_roles() -> Result<Vec<TempRole>, ApiError> {
    let resp: TempRolesResponse = get_json("/temp-roles").await?;
    Ok(resp.temp_roles)
}

pub async fn remove_temp_role(id: i64) -> Result<(), ApiError> {
    delete::<Ack>(&format!("/temp-roles/{id}")).await.map(|_| ())
}

pub async fn subscribe_panels() -> Result<Vec<SubscribePanel>, ApiError> {
    let resp: SubscribePanelsResponse = get_json("/subscribe-panels").await?;
    Ok(resp.panels)
}
