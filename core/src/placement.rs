//! Keep-away placement for the refusal button.
//!
//! The zone policy partitions the viewport around the content panel into up to
//! four strips and samples a point from one of them. When the panel leaves no
//! usable strip, it falls back to bounded rejection sampling against the
//! elements that must stay clickable. The viewport policy is the plain
//! "anywhere on screen" variant.

use rand::Rng;

use crate::config::{PlacementConfig, PlacementPolicy};
use crate::geometry::{Point, Rect, Size};

/// Measured layout the placement runs against, in viewport pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub viewport: Size,
    /// Rendered size of the element being moved; zero when not measurable.
    pub element: Size,
    /// Region the element should never land on.
    pub obstacle: Option<Rect>,
    /// Regions the fallback sampler keeps clear of.
    pub avoid: Vec<Rect>,
}

/// Range of valid top-left corners, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SafeZone {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl SafeZone {
    fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Option<Self> {
        if max_x >= min_x && max_y >= min_y {
            Some(Self {
                min_x,
                max_x,
                min_y,
                max_y,
            })
        } else {
            None
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        Point::new(
            sample_span(rng, self.min_x, self.max_x),
            sample_span(rng, self.min_y, self.max_y),
        )
    }
}

/// Strips above, below, left and right of `obstacle` where an element of
/// `element` size fits with `padding` to every edge and to the obstacle.
pub fn safe_zones(viewport: Size, element: Size, obstacle: Rect, padding: f64) -> Vec<SafeZone> {
    let max_x = viewport.width - element.width - padding;
    let max_y = viewport.height - element.height - padding;
    // The panel may hang past any viewport edge; every strip stays on screen.
    let above_max_y = (obstacle.top() - padding - element.height).min(max_y);
    let below_min_y = (obstacle.bottom() + padding).max(padding);
    let left_max_x = (obstacle.left() - padding - element.width).min(max_x);
    let right_min_x = (obstacle.right() + padding).max(padding);
    [
        SafeZone::new(padding, max_x, padding, above_max_y),
        SafeZone::new(padding, max_x, below_min_y, max_y),
        SafeZone::new(padding, left_max_x, padding, max_y),
        SafeZone::new(right_min_x, max_x, padding, max_y),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Picks the next top-left corner for the element.
pub fn place<R: Rng + ?Sized>(geometry: &Geometry, config: &PlacementConfig, rng: &mut R) -> Point {
    let element = geometry.element.or_fallback(config.fallback_size());
    match config.policy {
        PlacementPolicy::Viewport => place_in_viewport(geometry.viewport, element, config, rng),
        PlacementPolicy::Zones => place_in_zones(geometry, element, config, rng),
    }
}

fn place_in_zones<R: Rng + ?Sized>(
    geometry: &Geometry,
    element: Size,
    config: &PlacementConfig,
    rng: &mut R,
) -> Point {
    if let Some(obstacle) = geometry.obstacle {
        let zones = safe_zones(geometry.viewport, element, obstacle, config.edge_padding);
        if !zones.is_empty() {
            let zone = zones[rng.random_range(0..zones.len())];
            return zone.sample(rng);
        }
    }
    sample_clear_of(geometry, element, config, rng)
}

fn sample_clear_of<R: Rng + ?Sized>(
    geometry: &Geometry,
    element: Size,
    config: &PlacementConfig,
    rng: &mut R,
) -> Point {
    let padding = config.edge_padding;
    let max_x = (geometry.viewport.width - element.width - padding).max(padding);
    let max_y = (geometry.viewport.height - element.height - padding).max(padding);
    let mut candidate = Point::new(padding, padding);
    for _ in 0..config.max_attempts {
        candidate = Point::new(
            sample_span(rng, padding, max_x),
            sample_span(rng, padding, max_y),
        );
        let bounds = Rect::at(candidate, element).inflate(config.overlap_buffer);
        if !geometry.avoid.iter().any(|rect| bounds.overlaps(rect)) {
            return candidate;
        }
    }
    candidate
}

fn place_in_viewport<R: Rng + ?Sized>(
    viewport: Size,
    element: Size,
    config: &PlacementConfig,
    rng: &mut R,
) -> Point {
    let padding = config.viewport_padding;
    let axis = |rng: &mut R, extent: f64, size: f64| {
        let max = (extent - size - padding).max(padding + 1.0);
        let value = (rng.random::<f64>() * (max - padding)).floor() + padding;
        value.min(extent - size - config.viewport_margin)
    };
    let x = axis(rng, viewport.width, element.width);
    let y = axis(rng, viewport.height, element.height);
    Point::new(x, y)
}

fn sample_span<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.random_range(min..=max)
    } else {
        min
    }
}
