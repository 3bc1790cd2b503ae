use std::cell::RefCell;

use gloo::events::EventListener;
use web_sys::HtmlImageElement;

struct PreloadedImage {
    image: HtmlImageElement,
    _on_error: EventListener,
}

thread_local! {
    static PRELOADED: RefCell<Vec<PreloadedImage>> = RefCell::new(Vec::new());
}

/// Starts fetching every source so later swaps show without a load delay.
/// Failures are only logged; the browser's broken-image rendering applies.
pub(crate) fn preload_images(sources: &[String]) {
    PRELOADED.with(|slot| {
        let mut preloaded = slot.borrow_mut();
        for src in sources {
            if preloaded.iter().any(|entry| entry.image.src().ends_with(src.as_str())) {
                continue;
            }
            let Ok(image) = HtmlImageElement::new() else {
                gloo::console::warn!("image preload unavailable");
                return;
            };
            let failed_src = src.clone();
            let on_error = EventListener::new(&image, "error", move |_| {
                gloo::console::warn!("image preload failed", failed_src.clone());
            });
            image.set_src(src);
            preloaded.push(PreloadedImage {
                image,
                _on_error: on_error,
            });
        }
    });
}

#[cfg(test)]
pub(crate) fn preloaded_count() -> usize {
    PRELOADED.with(|slot| slot.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn repeated_sources_are_fetched_once() {
        let before = preloaded_count();
        let sources = vec![
            "images/preload-test-a.png".to_string(),
            "images/preload-test-b.png".to_string(),
        ];
        preload_images(&sources);
        preload_images(&sources);
        assert_eq!(preloaded_count(), before + 2);
    }
}
