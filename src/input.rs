use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use web_sys::{DomRect, Element, Event, EventTarget, HtmlElement};
use yew::NodeRef;

use sayyes_core::{Geometry, Rect, RefusalChannel, Size};

pub(crate) type RefusalHandler = Rc<dyn Fn(RefusalChannel)>;

const REFUSAL_EVENTS: [(&str, RefusalChannel); 3] = [
    ("mouseenter", RefusalChannel::Hover),
    ("touchstart", RefusalChannel::Touch),
    ("click", RefusalChannel::Click),
];

/// Routes hover, touch and click on `target` into one handler. Touch is
/// non-passive so the synthetic click that follows it can be cancelled.
pub(crate) fn attach_refusal_listeners(
    target: &EventTarget,
    handler: RefusalHandler,
) -> Vec<EventListener> {
    REFUSAL_EVENTS
        .iter()
        .map(|(event_type, channel)| {
            let channel = *channel;
            let handler = handler.clone();
            EventListener::new_with_options(
                target,
                *event_type,
                EventListenerOptions {
                    phase: EventListenerPhase::Bubble,
                    passive: false,
                },
                move |event: &Event| {
                    if channel == RefusalChannel::Touch {
                        event.prevent_default();
                    }
                    handler(channel);
                },
            )
        })
        .collect()
}

pub(crate) struct LayoutRefs {
    pub(crate) panel: NodeRef,
    pub(crate) prompt: NodeRef,
    pub(crate) accept: NodeRef,
    pub(crate) refuse: NodeRef,
}

impl LayoutRefs {
    pub(crate) fn measure(&self) -> Geometry {
        let element = self
            .refuse
            .cast::<HtmlElement>()
            .map(|element| {
                Size::new(
                    element.offset_width() as f64,
                    element.offset_height() as f64,
                )
            })
            .unwrap_or_default();
        let avoid = [&self.accept, &self.prompt]
            .into_iter()
            .filter_map(element_rect)
            .collect();
        Geometry {
            viewport: viewport_size(),
            element,
            obstacle: element_rect(&self.panel),
            avoid,
        }
    }
}

pub(crate) fn viewport_size() -> Size {
    let Some(window) = web_sys::window() else {
        return Size::default();
    };
    let width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    Size::new(width, height)
}

fn element_rect(node: &NodeRef) -> Option<Rect> {
    let element = node.cast::<Element>()?;
    Some(dom_rect(&element.get_bounding_client_rect()))
}

fn dom_rect(rect: &DomRect) -> Rect {
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}
