mod api;
mod app;
mod components;
mod query;
mod types;
mod utils;

use tracing::Level;

fn main() {
    if let Err(err) = dioxus_logger::init(Level::INFO) {
        web_sys::console::error_1(&format!("failed to init logger: {err}").into());
    }
    dioxus::launch(app::App);
}
