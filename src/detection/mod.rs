//! Card and symbol detection module
//!
//! Geometric side of the pipeline: locating circular card regions in a
//! scene, resampling them to the canonical comparison size, and extracting
//! the symbol boundaries printed inside each card.

pub mod card;
pub mod object;
pub mod rectify;
pub mod region;

pub use card::CardLocator;
pub use object::ObjectExtractor;
pub use rectify::CardRectifier;
pub use region::{RegionFilter, RegionProperties};
