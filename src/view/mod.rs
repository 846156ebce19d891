//! Pure functions from selector values to chart descriptions.

pub mod controls;
pub mod format;
pub mod map;
pub mod trend;

pub use controls::{controls_spec, ControlsSpec};
pub use map::{map_view, MapFigure, MapSelection, MapView};
pub use trend::{region_series, trend_view, RegionSeries, TrendFigure, TrendView};
