// src/domain/mod.rs
// =============================================================================
// URL -> registrable domain reduction.
//
// Submodules:
// - normalize: extract_origin (href -> scheme://host) and normalize
//   (URL -> eTLD+1, or the IP literal itself)
// =============================================================================

mod normalize;

pub use normalize::{extract_origin, normalize};
