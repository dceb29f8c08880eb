//! File & Tracking Endpoints

use wasm_bindgen::JsValue;

use super::{delete, encode_component, get_json, post_form, Ack, ApiError};
use crate::models::{FileEntry, FilesResponse, PostGroup, PostFilesResponse, TrackingRecord, TrackingResponse, WatermarkVerdict};

/// All posts with their files, newest upload first
pub async fn list_posts() -> Result<Vec<PostGroup>, ApiError> {
    let resp: FilesResponse = get_json("/files").await?;
    Ok(resp.posts)
}

pub async fn post_files(post_name: &str) -> Result<Vec<FileEntry>, ApiError> {
    let resp: PostFilesResponse = get_json(&format!("/files/{}", encode_component(post_name))).await?;
    Ok(resp.files)
}

pub async fn tracking(post_name: &str, limit: u32) -> Result<Vec<TrackingRecord>, ApiError> {
    let path = format!("/tracking/{}?limit={limit}", encode_component(post_name));
    let resp: TrackingResponse = get_json(&path).await?;
    Ok(resp.records)
}

pub async fn delete_file(file_id: i64) -> Result<(), ApiError> {
    delete::<Ack>(&format!("/files/{file_id}")).await.map(|_| ())
}

/// Upload a file to the server-side watermark extractor
pub async fn verify_watermark(file: &web_sys::File) -> Result<WatermarkVerdict, ApiError> {
    let form = web_sys::FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(js_error)?;
    post_form("/files/verify-watermark", form).await
}

fn js_error(err: JsValue) -> ApiError {
    ApiError::Request(format!("{err:?}"))
}
