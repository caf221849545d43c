pub mod arrow;
pub mod data;
pub mod prop;

pub use arrow::{ArrowPlacementManager, base_rotation};
pub use data::{
    PlacementData, PlacementError, PlacementLookup, PlacementNode, PlacementOffset,
    PlacementSource, clean_placement_data,
};
pub use prop::{BetaPropPositioner, DefaultPropPositioner};
