//! Bridge to the page's global `confetti(options)` particle renderer.

use std::cell::Cell;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use sayyes_core::Burst;

const RENDERER_GLOBAL: &str = "confetti";

thread_local! {
    static MISSING_WARNED: Cell<bool> = Cell::new(false);
}

fn renderer() -> Option<Function> {
    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str(RENDERER_GLOBAL)).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    value.dyn_into::<Function>().ok()
}

fn set(target: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(target, &JsValue::from_str(key), &value);
}

pub(crate) fn burst_options(burst: &Burst) -> Object {
    let origin = Object::new();
    set(&origin, "x", JsValue::from_f64(burst.origin.x));
    set(&origin, "y", JsValue::from_f64(burst.origin.y));
    let options = Object::new();
    set(&options, "startVelocity", JsValue::from_f64(burst.start_velocity));
    set(&options, "spread", JsValue::from_f64(burst.spread));
    set(&options, "ticks", JsValue::from_f64(burst.ticks as f64));
    set(&options, "zIndex", JsValue::from_f64(burst.z_index as f64));
    set(&options, "particleCount", JsValue::from_f64(burst.particle_count));
    set(&options, "origin", origin.into());
    options
}

pub(crate) fn fire(burst: &Burst) {
    let Some(func) = renderer() else {
        let already_warned = MISSING_WARNED.with(|flag| flag.replace(true));
        if !already_warned {
            gloo::console::warn!("confetti renderer missing, skipping bursts");
        }
        return;
    };
    if burst.particle_count <= 0.0 {
        return;
    }
    let options = burst_options(burst);
    let _ = func.call1(&JsValue::NULL, &options);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sayyes_core::Origin;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn read(target: &JsValue, key: &str) -> JsValue {
        Reflect::get(target, &JsValue::from_str(key)).expect("property")
    }

    #[wasm_bindgen_test]
    fn options_use_renderer_field_names() {
        let burst = Burst {
            start_velocity: 30.0,
            spread: 360.0,
            ticks: 60,
            z_index: 999,
            particle_count: 42.5,
            origin: Origin { x: 0.25, y: -0.1 },
        };
        let options: JsValue = burst_options(&burst).into();
        assert_eq!(read(&options, "startVelocity").as_f64(), Some(30.0));
        assert_eq!(read(&options, "spread").as_f64(), Some(360.0));
        assert_eq!(read(&options, "ticks").as_f64(), Some(60.0));
        assert_eq!(read(&options, "zIndex").as_f64(), Some(999.0));
        assert_eq!(read(&options, "particleCount").as_f64(), Some(42.5));
        let origin = read(&options, "origin");
        assert_eq!(read(&origin, "x").as_f64(), Some(0.25));
        assert_eq!(read(&origin, "y").as_f64(), Some(-0.1));
    }
}
