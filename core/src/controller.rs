use rand::Rng;

use crate::celebration::{Celebration, CelebrationTick};
use crate::config::WidgetConfig;
use crate::escalation::{Escalation, RefusalChannel, RefusalOutcome};
use crate::geometry::Point;
use crate::placement::{place, Geometry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Both buttons are live.
    Asking,
    /// Refusals are exhausted; only the affirmative button remains.
    Waiting,
    Accepted,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageView {
    pub src: String,
    pub alt: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlacementState {
    /// Viewport-relative top-left corner, once the button has moved.
    pub position: Option<Point>,
    /// Set on the first relocation; the button then lives outside its
    /// layout container.
    pub detached: bool,
}

/// Everything the page needs to render the widget.
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetView {
    pub phase: Phase,
    pub refusals: u32,
    pub prompt: String,
    pub image: Option<ImageView>,
    pub accept_label: String,
    pub accept_visible: bool,
    pub accept_scale: f64,
    pub refuse_label: String,
    pub refuse_visible: bool,
    pub refuse_shaking: bool,
    pub refuse_placement: PlacementState,
    pub celebrating: bool,
}

impl WidgetView {
    pub fn refuse_teleported(&self) -> bool {
        self.refuse_placement.position.is_some()
    }
}

pub struct Controller {
    config: WidgetConfig,
    escalation: Escalation,
    phase: Phase,
    prompt: String,
    image: Option<ImageView>,
    refuse_label: String,
    shaking: bool,
    placement: PlacementState,
    relocation_pending: bool,
    celebration: Option<Celebration>,
}

impl Controller {
    pub fn new(config: WidgetConfig) -> Self {
        let escalation = Escalation::from_config(&config);
        Self {
            prompt: config.prompt.clone(),
            refuse_label: config.refuse_label.clone(),
            escalation,
            phase: Phase::Asking,
            image: None,
            shaking: false,
            placement: PlacementState::default(),
            relocation_pending: false,
            celebration: None,
            config,
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn refusals(&self) -> u32 {
        self.escalation.count()
    }

    /// Set by an escalation below the cap until [`Controller::relocate`] runs.
    pub fn relocation_pending(&self) -> bool {
        self.relocation_pending
    }

    pub fn accept_scale(&self) -> f64 {
        match self.phase {
            Phase::Waiting => self.config.max_scale(),
            _ => self.config.scale_for(self.escalation.count()),
        }
    }

    pub fn view(&self) -> WidgetView {
        WidgetView {
            phase: self.phase,
            refusals: self.escalation.count(),
            prompt: self.prompt.clone(),
            image: self.image.clone(),
            accept_label: self.config.accept_label.clone(),
            accept_visible: self.phase != Phase::Accepted,
            accept_scale: self.accept_scale(),
            refuse_label: self.refuse_label.clone(),
            refuse_visible: self.phase == Phase::Asking,
            refuse_shaking: self.shaking,
            refuse_placement: self.placement,
            celebrating: self
                .celebration
                .as_ref()
                .is_some_and(|celebration| !celebration.is_finished()),
        }
    }

    /// Single entry point for every refusal input channel. An accepted
    /// refusal below the cap swaps the label and leaves a relocation pending,
    /// so the move is computed from the size of the new label.
    pub fn refuse(&mut self, _channel: RefusalChannel, now_ms: f64) -> RefusalOutcome {
        if self.phase == Phase::Accepted {
            return RefusalOutcome::Settled;
        }
        let outcome = self.escalation.register_refusal(now_ms);
        if let RefusalOutcome::Escalated { step, exhausted } = outcome {
            self.apply_step(step, exhausted);
            self.relocation_pending = !exhausted;
        }
        outcome
    }

    fn apply_step(&mut self, step: u32, exhausted: bool) {
        self.image = self.config.refusal_image(step).map(|src| ImageView {
            src: src.to_string(),
            alt: self.config.alt_for(src).to_string(),
        });
        if exhausted {
            self.phase = Phase::Waiting;
            self.shaking = false;
            self.prompt = self.config.waiting_prompt.clone();
        } else {
            if let Some(text) = self.config.refusal_text(step) {
                self.refuse_label = text.to_string();
            }
            self.shaking = true;
        }
    }

    /// Performs the pending move against the re-measured `geometry`. `None`
    /// when nothing is pending or the button is no longer shown.
    pub fn relocate<R: Rng + ?Sized>(&mut self, geometry: &Geometry, rng: &mut R) -> Option<Point> {
        if self.phase != Phase::Asking || !std::mem::take(&mut self.relocation_pending) {
            return None;
        }
        self.placement.detached = true;
        let point = place(geometry, &self.config.placement, rng);
        self.placement.position = Some(point);
        Some(point)
    }

    /// Clears the attention animation; returns whether anything changed.
    pub fn end_shake(&mut self) -> bool {
        std::mem::replace(&mut self.shaking, false)
    }

    /// Returns `false` if the prompt was already accepted.
    pub fn accept(&mut self, now_ms: f64) -> bool {
        if self.phase == Phase::Accepted {
            return false;
        }
        self.phase = Phase::Accepted;
        self.shaking = false;
        self.relocation_pending = false;
        self.prompt = self.config.celebration_prompt.clone();
        let src = self.config.accept_image.clone();
        self.image = Some(ImageView {
            alt: self.config.alt_for(&src).to_string(),
            src,
        });
        self.celebration = Some(Celebration::start(now_ms, &self.config.celebration));
        true
    }

    pub fn celebration_tick<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) -> CelebrationTick {
        match self.celebration.as_mut() {
            Some(celebration) => celebration.tick(now_ms, rng),
            None => CelebrationTick::Finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Size};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn geometry() -> Geometry {
        Geometry {
            viewport: Size::new(1024.0, 768.0),
            element: Size::new(110.0, 44.0),
            obstacle: Some(Rect::new(312.0, 184.0, 400.0, 400.0)),
            avoid: Vec::new(),
        }
    }

    #[test]
    fn fresh_view_shows_the_question() {
        let controller = Controller::new(WidgetConfig::default());
        let view = controller.view();
        assert_eq!(view.phase, Phase::Asking);
        assert_eq!(view.prompt, WidgetConfig::default().prompt);
        assert_eq!(view.image, None);
        assert_eq!(view.accept_scale, 1.0);
        assert!(view.accept_visible && view.refuse_visible);
        assert!(!view.refuse_teleported());
        assert!(!view.refuse_placement.detached);
    }

    #[test]
    fn escalation_shakes_and_relocates() {
        let mut controller = Controller::new(WidgetConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        let outcome = controller.refuse(RefusalChannel::Hover, 0.0);
        assert!(outcome.is_escalated());
        assert!(controller.relocation_pending());
        assert!(controller.relocate(&geometry(), &mut rng).is_some());
        assert_eq!(controller.relocate(&geometry(), &mut rng), None);
        let view = controller.view();
        assert!(view.refuse_shaking);
        assert!(view.refuse_placement.detached);
        assert!(view.refuse_teleported());
        assert!(controller.end_shake());
        assert!(!controller.end_shake());
        assert!(!controller.view().refuse_shaking);
    }

    #[test]
    fn label_changes_before_the_button_moves() {
        let config = WidgetConfig::default();
        let mut controller = Controller::new(config.clone());
        let mut rng = StdRng::seed_from_u64(6);
        controller.refuse(RefusalChannel::Click, 0.0);
        let view = controller.view();
        assert_eq!(view.refuse_label, config.refusal_texts[0]);
        assert_eq!(view.refuse_placement, PlacementState::default());

        // Wider than the fallback; the move must fit the re-labelled button.
        let relabelled = Geometry {
            viewport: Size::new(400.0, 300.0),
            element: Size::new(190.0, 44.0),
            obstacle: None,
            avoid: Vec::new(),
        };
        for _ in 0..50 {
            controller.relocation_pending = true;
            let point = controller.relocate(&relabelled, &mut rng).expect("pending move");
            assert!(point.x + 190.0 <= 400.0 - 15.0);
            assert!(point.y + 44.0 <= 300.0 - 15.0);
        }
    }

    #[test]
    fn debounced_refusal_does_not_move_the_button() {
        let mut controller = Controller::new(WidgetConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        controller.refuse(RefusalChannel::Hover, 0.0);
        controller.relocate(&geometry(), &mut rng);
        let before = controller.view().refuse_placement;
        let outcome = controller.refuse(RefusalChannel::Click, 120.0);
        assert_eq!(outcome, RefusalOutcome::Debounced);
        assert!(!controller.relocation_pending());
        assert_eq!(controller.relocate(&geometry(), &mut rng), None);
        assert_eq!(controller.view().refuse_placement, before);
    }

    #[test]
    fn refusal_after_acceptance_is_settled() {
        let mut controller = Controller::new(WidgetConfig::default());
        assert!(controller.accept(0.0));
        assert!(!controller.accept(10.0));
        let outcome = controller.refuse(RefusalChannel::Touch, 1_000.0);
        assert_eq!(outcome, RefusalOutcome::Settled);
        assert_eq!(controller.refusals(), 0);
    }

    #[test]
    fn relocate_is_a_no_op_once_hidden() {
        let mut controller = Controller::new(WidgetConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        for step in 0..4 {
            controller.refuse(RefusalChannel::Click, step as f64 * 400.0);
            controller.relocate(&geometry(), &mut rng);
        }
        assert_eq!(controller.phase(), Phase::Waiting);
        let before = controller.view().refuse_placement;
        assert_eq!(controller.relocate(&geometry(), &mut rng), None);
        assert_eq!(controller.view().refuse_placement, before);
    }

    #[test]
    fn tick_without_acceptance_is_finished() {
        let mut controller = Controller::new(WidgetConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(controller.celebration_tick(0.0, &mut rng), CelebrationTick::Finished);
    }
}
