pub mod catalog;
pub mod celebration;
pub mod config;
pub mod controller;
pub mod escalation;
pub mod geometry;
pub mod placement;

pub use celebration::{Burst, Celebration, CelebrationTick, Origin};
pub use config::{CelebrationConfig, ConfigError, PlacementConfig, PlacementPolicy, WidgetConfig};
pub use controller::{Controller, ImageView, Phase, PlacementState, WidgetView};
pub use escalation::{Escalation, RefusalChannel, RefusalOutcome};
pub use geometry::{Point, Rect, Size};
pub use placement::{place, safe_zones, Geometry, SafeZone};
