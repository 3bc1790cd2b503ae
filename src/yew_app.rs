use std::rc::Rc;

use gloo::timers::callback::{Interval, Timeout};
use web_sys::Element;
use yew::prelude::*;

use crate::app_core::WidgetCore;
use crate::app_router;
use crate::confetti;
use crate::input::{self, LayoutRefs, RefusalHandler};
use sayyes_core::{CelebrationTick, RefusalChannel, RefusalOutcome, WidgetView};

#[derive(Properties)]
pub(crate) struct AppProps {
    pub(crate) core: Rc<WidgetCore>,
}

impl PartialEq for AppProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

fn page_body() -> Option<Element> {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
        .map(Element::from)
}

fn refuse_style(view: &WidgetView) -> Option<String> {
    view.refuse_placement.position.map(|point| {
        format!(
            "position: fixed; left: {}px; top: {}px; margin: 0; transform: none; white-space: nowrap;",
            point.x, point.y
        )
    })
}

#[function_component(App)]
pub(crate) fn app(props: &AppProps) -> Html {
    let core = props.core.clone();
    let view = use_state(|| core.snapshot());
    {
        let core = core.clone();
        let view = view.clone();
        use_effect_with((), move |_| {
            let core_for_cb = core.clone();
            let subscription = core.subscribe(Rc::new(move || {
                view.set(core_for_cb.snapshot());
            }));
            move || drop(subscription)
        });
    }

    let panel_ref = use_node_ref();
    let prompt_ref = use_node_ref();
    let accept_ref = use_node_ref();
    let refuse_ref = use_node_ref();
    let shake_timer = use_mut_ref(|| None::<Timeout>);
    let celebration_timer = use_mut_ref(|| None::<Interval>);

    {
        let shake_timer = shake_timer.clone();
        let celebration_timer = celebration_timer.clone();
        use_effect_with((), move |_| {
            move || {
                shake_timer.borrow_mut().take();
                celebration_timer.borrow_mut().take();
            }
        });
    }

    let on_refuse: RefusalHandler = {
        let core = core.clone();
        let shake_timer = shake_timer.clone();
        Rc::new(move |channel: RefusalChannel| {
            let outcome = core.refuse(channel);
            if app_router::debug_enabled() {
                gloo::console::log!("refusal", channel.as_str(), format!("{outcome:?}"));
            }
            match outcome {
                RefusalOutcome::Escalated {
                    exhausted: false, ..
                } => {
                    let shake_ms = core.shake_ms();
                    let core = core.clone();
                    let timeout = Timeout::new(shake_ms, move || core.end_shake());
                    *shake_timer.borrow_mut() = Some(timeout);
                }
                RefusalOutcome::Escalated {
                    exhausted: true,
                    step,
                } => {
                    gloo::console::log!("refusals exhausted", step);
                    shake_timer.borrow_mut().take();
                }
                _ => {}
            }
        })
    };

    let refusals = view.refusals;
    {
        let core = core.clone();
        let layout = LayoutRefs {
            panel: panel_ref.clone(),
            prompt: prompt_ref.clone(),
            accept: accept_ref.clone(),
            refuse: refuse_ref.clone(),
        };
        // Runs once the new label is in the DOM, so the measured size is current.
        use_effect_with(refusals, move |_| {
            if let Some(point) = core.relocate(&layout.measure()) {
                if app_router::debug_enabled() {
                    gloo::console::log!("relocated", point.x, point.y);
                }
            }
            || ()
        });
    }

    let refuse_visible = view.refuse_visible;
    let refuse_detached = view.refuse_placement.detached;
    {
        let refuse_ref = refuse_ref.clone();
        // The button is keyed on the refusal count, so each escalation mounts a
        // fresh node (replaying the shake) that needs its own listeners.
        use_effect_with((refuse_visible, refuse_detached, refusals), move |_| {
            let listeners = refuse_ref
                .cast::<Element>()
                .map(|target| input::attach_refusal_listeners(&target, on_refuse))
                .unwrap_or_default();
            move || drop(listeners)
        });
    }

    let on_accept = {
        let core = core.clone();
        let celebration_timer = celebration_timer.clone();
        Callback::from(move |_: MouseEvent| {
            if !core.accept() {
                return;
            }
            gloo::console::log!("accepted", core.snapshot().refusals);
            let tick_core = core.clone();
            let timer_for_tick = celebration_timer.clone();
            let interval = Interval::new(core.celebration_interval_ms(), move || {
                match tick_core.celebration_tick() {
                    CelebrationTick::Emit(bursts) => {
                        for burst in &bursts {
                            confetti::fire(burst);
                        }
                    }
                    CelebrationTick::Finished => {
                        let finished = timer_for_tick.borrow_mut().take();
                        drop(finished);
                        if app_router::debug_enabled() {
                            gloo::console::log!("celebration finished");
                        }
                    }
                }
            });
            *celebration_timer.borrow_mut() = Some(interval);
        })
    };

    let view = (*view).clone();
    let image = match &view.image {
        Some(image) => html! {
            <img class="meme-img" src={image.src.clone()} alt={image.alt.clone()} />
        },
        None => html! {},
    };
    let accept_button = if view.accept_visible {
        let style = format!("transform: scale({});", view.accept_scale);
        html! {
            <button ref={accept_ref} type="button" class="btn yes-btn" {style} onclick={on_accept}>
                { view.accept_label.clone() }
            </button>
        }
    } else {
        html! {}
    };
    let refuse_button = if view.refuse_visible {
        let mut class = classes!("btn", "no-btn");
        if view.refuse_shaking {
            class.push("shake");
        }
        if view.refuse_teleported() {
            class.push("teleported");
        }
        html! {
            <button key={view.refusals} ref={refuse_ref} type="button" {class} style={refuse_style(&view)}>
                { view.refuse_label.clone() }
            </button>
        }
    } else {
        html! {}
    };
    let (inline_refuse, floating_refuse) = if view.refuse_placement.detached {
        let floating = match page_body() {
            Some(host) => create_portal(refuse_button, host),
            None => refuse_button,
        };
        (html! {}, floating)
    } else {
        (refuse_button, html! {})
    };

    html! {
        <main class="stage">
            <section class="card" ref={panel_ref}>
                <div class="meme-container">{ image }</div>
                <h1 class="question" ref={prompt_ref}>{ view.prompt.clone() }</h1>
                <div class="btn-container">
                    { accept_button }
                    { inline_refuse }
                </div>
            </section>
            { floating_refuse }
        </main>
    }
}
