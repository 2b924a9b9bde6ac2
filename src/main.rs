//! QueryDesk Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod logging;
mod models;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logging::init(config::Mode::current().log_level());
    mount_to_body(App);
}
