//! FolderLens Aggregate — whole-folder statistics.
//!
//! Pure functions over a folder's file set: structure breakdown,
//! activity timeline, health signals, content categories, entity and
//! keyword rollups, and frequency-based trend terms. Nothing here
//! touches storage or the network.

pub mod stats;
pub mod trends;

pub use stats::{
    CategoryProfile, FolderAggregator, FolderHealth, FolderStats, FolderStructure,
    FolderTimeline, LargestFile, TimelineEntry,
};
pub use trends::{CountRow, aggregate_rollups, extract_trend_terms};
