//! Domain types for votelab

pub mod price;
pub mod selection;

pub use price::{PricePoint, PriceSeries, SeriesError};
pub use selection::{IndicatorKind, IndicatorSelection, SelectionError};
