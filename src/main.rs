use dioxus::prelude::*;

mod client;
mod components;
mod config;
mod contract;
mod error;
#[cfg(test)]
mod mock;
mod provider;
mod state;
mod units;
mod wallet;

use components::CrowdFundPage;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        div {
            style: "width: 100%; min-height: 100vh; display: flex; align-items: center; justify-content: center; background: #0f172a; font-family: sans-serif;",
            CrowdFundPage {}
        }
    }
}
