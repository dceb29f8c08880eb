//! Goose Bot Admin Console Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod format;
mod logging;
mod markdown;
mod models;
mod pages;
mod router;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let cfg = config::init();
    logging::init(cfg.log_level);
    log::info!("[main] admin console starting, api base {}", cfg.api_base);
    mount_to_body(App);
}
