mod app_core;
mod app_router;
mod confetti;
mod input;
mod preload;
mod yew_app;

use app_core::WidgetCore;
use yew_app::{App, AppProps};

fn main() {
    console_error_panic_hook::set_once();
    let init = app_router::init_config();
    gloo::console::log!("placement policy", init.widget.placement.policy.as_str());
    preload::preload_images(&init.widget.asset_sources());
    let core = WidgetCore::new(init.widget, app_core::clock_seed());
    yew::Renderer::<App>::with_props(AppProps { core }).render();
}
