use rand::Rng;

use crate::config::CelebrationConfig;

/// Burst origin as fractions of the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
}

/// One call into the particle renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
    pub start_velocity: f64,
    pub spread: f64,
    pub ticks: u32,
    pub z_index: i32,
    /// Passed through unrounded; the renderer truncates it.
    pub particle_count: f64,
    pub origin: Origin,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CelebrationTick {
    Emit([Burst; 2]),
    Finished,
}

/// Fixed-length confetti sequence. Each tick emits a left and a right burst
/// whose particle count decays linearly to zero at the end of the run.
#[derive(Clone, Debug)]
pub struct Celebration {
    started_at_ms: f64,
    config: CelebrationConfig,
    finished: bool,
}

impl Celebration {
    pub fn start(now_ms: f64, config: &CelebrationConfig) -> Self {
        Self {
            started_at_ms: now_ms,
            config: config.clone(),
            finished: false,
        }
    }

    pub fn ends_at_ms(&self) -> f64 {
        self.started_at_ms + self.config.duration_ms
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn time_left_ms(&self, now_ms: f64) -> f64 {
        (self.ends_at_ms() - now_ms).max(0.0)
    }

    pub fn particle_count(&self, now_ms: f64) -> f64 {
        let fraction = self.time_left_ms(now_ms) / self.config.duration_ms;
        (self.config.initial_particles * fraction).max(0.0)
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) -> CelebrationTick {
        if self.finished || self.time_left_ms(now_ms) <= 0.0 {
            self.finished = true;
            return CelebrationTick::Finished;
        }
        let count = self.particle_count(now_ms);
        let left = self.burst(count, self.config.left_band, rng);
        let right = self.burst(count, self.config.right_band, rng);
        CelebrationTick::Emit([left, right])
    }

    fn burst<R: Rng + ?Sized>(&self, particle_count: f64, band: [f64; 2], rng: &mut R) -> Burst {
        let x = if band[1] > band[0] {
            rng.random_range(band[0]..band[1])
        } else {
            band[0]
        };
        let y = rng.random::<f64>() - self.config.origin_y_offset;
        Burst {
            start_velocity: self.config.start_velocity,
            spread: self.config.spread,
            ticks: self.config.ticks,
            z_index: self.config.z_index,
            particle_count,
            origin: Origin { x, y },
        }
    }
}
