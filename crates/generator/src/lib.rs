//! Generator crate for personalized feeds.
//!
//! This crate contains the FeedGenerator that runs every pipeline stage in
//! order, and the classification of interactions into presentable states.

pub mod generator;
pub mod interaction_state;

pub use generator::{FeedGenerator, project, reinsert_deferred};
pub use interaction_state::{create_interaction_state, resolve_interaction_states};
