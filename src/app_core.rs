use std::cell::RefCell;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use js_sys::{Date, Math};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use sayyes_core::{
    CelebrationTick, Controller, Geometry, Point, RefusalChannel, RefusalOutcome, WidgetConfig,
    WidgetView,
};

pub(crate) type AppSubscriber = Rc<dyn Fn()>;

/// Page-session owner of the widget state. Every mutation refreshes the
/// cached view and notifies subscribers.
pub(crate) struct WidgetCore {
    controller: RefCell<Controller>,
    rng: RefCell<SmallRng>,
    view: RefCell<WidgetView>,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
}

impl WidgetCore {
    pub(crate) fn new(config: WidgetConfig, seed: u64) -> Rc<Self> {
        let controller = Controller::new(config);
        let view = controller.view();
        Rc::new(Self {
            controller: RefCell::new(controller),
            rng: RefCell::new(SmallRng::seed_from_u64(seed)),
            view: RefCell::new(view),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        })
    }

    pub(crate) fn subscribe(&self, subscriber: AppSubscriber) -> AppSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        AppSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    fn notify(&self) {
        {
            let controller = self.controller.borrow();
            *self.view.borrow_mut() = controller.view();
        }
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)();
        }
    }

    pub(crate) fn snapshot(&self) -> WidgetView {
        self.view.borrow().clone()
    }

    pub(crate) fn shake_ms(&self) -> u32 {
        self.controller.borrow().config().shake_ms
    }

    pub(crate) fn celebration_interval_ms(&self) -> u32 {
        self.controller.borrow().config().celebration.interval_ms
    }

    pub(crate) fn refuse(&self, channel: RefusalChannel) -> RefusalOutcome {
        let outcome = self.controller.borrow_mut().refuse(channel, now_ms());
        if outcome.is_escalated() {
            self.notify();
        }
        outcome
    }

    /// Applies a pending move once the new label has been rendered and measured.
    pub(crate) fn relocate(&self, geometry: &Geometry) -> Option<Point> {
        let point = {
            let mut controller = self.controller.borrow_mut();
            let mut rng = self.rng.borrow_mut();
            controller.relocate(geometry, &mut *rng)
        };
        if point.is_some() {
            self.notify();
        }
        point
    }

    pub(crate) fn end_shake(&self) {
        let changed = self.controller.borrow_mut().end_shake();
        if changed {
            self.notify();
        }
    }

    pub(crate) fn accept(&self) -> bool {
        let accepted = self.controller.borrow_mut().accept(now_ms());
        if accepted {
            self.notify();
        }
        accepted
    }

    pub(crate) fn celebration_tick(&self) -> CelebrationTick {
        let tick = {
            let mut controller = self.controller.borrow_mut();
            let mut rng = self.rng.borrow_mut();
            controller.celebration_tick(now_ms(), &mut *rng)
        };
        if tick == CelebrationTick::Finished && self.view.borrow().celebrating {
            self.notify();
        }
        tick
    }
}

pub(crate) struct AppSubscription {
    subscriber: AppSubscriber,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
}

impl Drop for AppSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}

pub(crate) fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|duration| duration.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

pub(crate) fn clock_seed() -> u64 {
    let now = now_ms() as u64;
    #[cfg(target_arch = "wasm32")]
    let noise = (Math::random() * u32::MAX as f64) as u64;
    #[cfg(not(target_arch = "wasm32"))]
    let noise = 0x9E37_79B9_7F4A_7C15u64;
    now.rotate_left(32) ^ noise
}
