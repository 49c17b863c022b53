//! Pipeline stages for building a personalized feed.
//!
//! This crate provides:
//! - FilterRule trait and the closed set of rule kinds
//! - FilterEngine for evaluating items against rules
//! - Backlog mixer for blending recent and older content
//! - Diversity enforcer for limiting same-source runs
//!
//! ## Architecture
//! Every stage is a pure function over in-memory collections:
//! 1. FilterEngine removes unwanted items (keywords, duration, source type)
//! 2. `mixer::mix` samples recent and backlog pools into one sequence
//! 3. `diversity::enforce` reorders that sequence to spread sources out
//!
//! Randomized stages take the random source as an argument, so callers can
//! pass a seeded generator when they need reproducible output.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterEngine, mixer, diversity};
//! use pipeline::filters::*;
//!
//! let engine = FilterEngine::new()
//!     .add_rule(KeywordRule::whole_word("spoilers")?)
//!     .add_rule(DurationRule::new(Some(60), None));
//!
//! let visible = engine.evaluate_batch(items);
//! let mixed = mixer::mix(&recent, &backlog, 0.3, &mut rand::rng());
//! let feed = diversity::enforce(mixed, NonZeroUsize::new(2).unwrap());
//! ```

pub mod traits;
pub mod filters;
pub mod filter_engine;
pub mod mixer;
pub mod diversity;

// Re-export main types
pub use traits::FilterRule;
pub use filter_engine::{FilterEngine, FilterResult};
pub use filters::Rule;
pub use mixer::{mix, MixQuota};
pub use diversity::enforce;
