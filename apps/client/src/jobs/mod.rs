//! Job-board domain logic: normalization at the wire boundary, location
//! resolution, and the client-side filter/pagination deriver.

pub mod filter;
pub mod locations;
pub mod normalizer;

pub use filter::{
    derive_page, derive_visible, is_deadline_urgent, matches, practice_area_options,
    state_options, FilterChange, FilterSelection, VisiblePage, ALL,
};
pub use locations::resolve_state;
pub use normalizer::{normalize, normalize_all};
