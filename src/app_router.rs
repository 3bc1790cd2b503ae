use std::cell::RefCell;

use web_sys::UrlSearchParams;

use sayyes_core::{PlacementPolicy, WidgetConfig};

const WIDGET_TOML: &str = include_str!("../widget.toml");

#[derive(Clone, Debug)]
pub(crate) struct InitConfig {
    pub(crate) widget: WidgetConfig,
    pub(crate) debug: bool,
}

thread_local! {
    static ACTIVE: RefCell<Option<InitConfig>> = const { RefCell::new(None) };
}

/// Page configuration, read from the URL on first use and cached after.
pub(crate) fn init_config() -> InitConfig {
    ACTIVE.with(|slot| {
        slot.borrow_mut()
            .get_or_insert_with(load_init_config)
            .clone()
    })
}

pub(crate) fn debug_enabled() -> bool {
    ACTIVE.with(|slot| slot.borrow().as_ref().is_some_and(|config| config.debug))
}

fn load_init_config() -> InitConfig {
    let mut widget = load_widget_config(WIDGET_TOML);
    let search = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();
    if let Some(policy) = parse_policy_from_query(&search) {
        widget.placement.policy = policy;
    }
    InitConfig {
        widget,
        debug: parse_debug_from_query(&search),
    }
}

pub(crate) fn load_widget_config(raw: &str) -> WidgetConfig {
    match WidgetConfig::from_toml_str(raw) {
        Ok(config) => config,
        Err(err) => {
            gloo::console::warn!("widget config rejected, using defaults", err.to_string());
            WidgetConfig::default()
        }
    }
}

fn query_params(search: &str) -> Option<UrlSearchParams> {
    let search = search.trim();
    if search.is_empty() {
        return None;
    }
    UrlSearchParams::new_with_str(search).ok()
}

pub(crate) fn parse_policy_from_query(search: &str) -> Option<PlacementPolicy> {
    let params = query_params(search)?;
    let raw = params.get("evade").or_else(|| params.get("policy"))?;
    let policy = PlacementPolicy::parse(&raw);
    if policy.is_none() {
        gloo::console::warn!("unknown placement policy", raw);
    }
    policy
}

pub(crate) fn parse_debug_from_query(search: &str) -> bool {
    let Some(params) = query_params(search) else {
        return false;
    };
    match params.get("debug") {
        Some(value) => !matches!(value.trim(), "0" | "false" | "off"),
        None => false,
    }
}
