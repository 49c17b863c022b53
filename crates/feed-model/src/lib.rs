//! # Feed Model Crate
//!
//! Domain types shared by every stage of feed generation.
//!
//! ## Main Components
//!
//! - **types**: Content, sources, interactions, preferences and the FeedItem projection
//! - **index**: InteractionIndex, the precomputed view of an interaction log
//! - **parser**: Load a JSON snapshot directory into memory
//! - **error**: Error types for loading and validation
//!
//! ## Example Usage
//!
//! ```ignore
//! use feed_model::Snapshot;
//! use std::path::Path;
//!
//! let snapshot = Snapshot::load_from_dir(Path::new("data/snapshot"))?;
//! let index = snapshot.interaction_index();
//!
//! for item in &snapshot.content {
//!     if index.is_excluded(&item.id) {
//!         println!("{} will never be shown again", item.title);
//!     }
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{FeedError, Result};
pub use index::InteractionIndex;
pub use parser::Snapshot;
pub use types::{
    // Type aliases
    ContentId,
    SourceId,
    // Core types
    ContentItem,
    ContentSource,
    ContentInteraction,
    FeedItem,
    FeedPreferences,
    KeywordFilter,
    SourceKey,
    // Enums
    InteractionState,
    InteractionType,
    SourceType,
    // Constants
    RECENT_WINDOW_DAYS,
};
