//! Folder structure, timeline, health and category statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use folderlens_store::FileRecord;

use crate::trends::{self, CountRow};

/// File count and size breakdown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderStructure {
    pub total_files: usize,
    /// Extension histogram, e.g. ".pdf" -> 3.
    pub file_types: BTreeMap<String, usize>,
    pub total_size_mb: f64,
    pub avg_file_size_kb: f64,
}

/// One file's position on the activity timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub file: String,
    /// Milliseconds since the epoch.
    pub modified_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderTimeline {
    /// All files with a known modification time, oldest first.
    pub timeline: Vec<TimelineEntry>,
    /// "YYYY-MM" -> files modified that month, sorted by month.
    pub monthly_activity: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LargestFile {
    pub file: String,
    pub size_mb: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderHealth {
    /// Up to 10 files, largest first.
    pub largest_files: Vec<LargestFile>,
    /// Files not modified within the age cutoff.
    pub old_unused_files: usize,
}

/// Extension-category histogram (datasets/documents/images/code/other).
pub type CategoryProfile = BTreeMap<String, usize>;

/// Everything the folder-level stats pass produces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderStats {
    pub structure: FolderStructure,
    pub timeline: FolderTimeline,
    pub health: FolderHealth,
    pub content_profile: CategoryProfile,
    pub top_entities: Vec<CountRow>,
    pub top_keywords: Vec<CountRow>,
    pub trend_terms: Vec<CountRow>,
}

/// Computes [`FolderStats`] for one folder's files.
///
/// `now` is a parameter rather than read from the clock so that the
/// old-file cutoff is deterministic under test.
pub struct FolderAggregator {
    old_file_age_days: i64,
    rollup_cap: usize,
    trend_terms: usize,
}

impl Default for FolderAggregator {
    fn default() -> Self {
        Self {
            old_file_age_days: 365,
            rollup_cap: 20,
            trend_terms: 10,
        }
    }
}

impl FolderAggregator {
    pub fn new(old_file_age_days: i64) -> Self {
        Self {
            old_file_age_days,
            ..Self::default()
        }
    }

    pub fn aggregate(&self, files: &[FileRecord], now: DateTime<Utc>) -> FolderStats {
        let (top_entities, top_keywords) = trends::aggregate_rollups(files, self.rollup_cap);
        let stats = FolderStats {
            structure: analyze_structure(files),
            timeline: analyze_timeline(files),
            health: self.analyze_health(files, now),
            content_profile: analyze_content_profile(files),
            top_entities,
            top_keywords,
            trend_terms: trends::extract_trend_terms(files, self.trend_terms),
        };
        debug!(
            "Aggregated {} files: {} extensions, {} active months",
            files.len(),
            stats.structure.file_types.len(),
            stats.timeline.monthly_activity.len()
        );
        stats
    }

    fn analyze_health(&self, files: &[FileRecord], now: DateTime<Utc>) -> FolderHealth {
        let mut by_size: Vec<&FileRecord> = files.iter().collect();
        by_size.sort_by(|a, b| {
            b.size_kb
                .partial_cmp(&a.size_kb)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let largest_files = by_size
            .iter()
            .take(10)
            .map(|f| LargestFile {
                file: f.file_name.clone(),
                size_mb: round2(f.size_kb / 1024.0),
            })
            .collect();

        let cutoff_millis = now.timestamp_millis() - self.old_file_age_days * 86_400_000;
        let old_unused_files = files
            .iter()
            .filter(|f| f.modified_at > 0 && f.modified_at < cutoff_millis)
            .count();

        FolderHealth {
            largest_files,
            old_unused_files,
        }
    }
}

fn analyze_structure(files: &[FileRecord]) -> FolderStructure {
    let mut file_types: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_kb = 0.0;
    for f in files {
        let ext = if f.extension.is_empty() {
            "unknown".to_string()
        } else {
            f.extension.clone()
        };
        *file_types.entry(ext).or_default() += 1;
        total_kb += f.size_kb;
    }
    let count = files.len().max(1) as f64;

    FolderStructure {
        total_files: files.len(),
        file_types,
        total_size_mb: round2(total_kb / 1024.0),
        avg_file_size_kb: round2(total_kb / count),
    }
}

fn analyze_timeline(files: &[FileRecord]) -> FolderTimeline {
    let mut timeline = Vec::new();
    let mut monthly_activity: BTreeMap<String, usize> = BTreeMap::new();

    for f in files {
        // 0 means the modification time is unknown
        let Some(modified) = DateTime::<Utc>::from_timestamp_millis(f.modified_at) else {
            continue;
        };
        if f.modified_at <= 0 {
            continue;
        }
        timeline.push(TimelineEntry {
            file: f.file_name.clone(),
            modified_at: f.modified_at,
        });
        let key = modified.format("%Y-%m").to_string();
        *monthly_activity.entry(key).or_default() += 1;
    }
    timeline.sort_by_key(|e| e.modified_at);

    FolderTimeline {
        timeline,
        monthly_activity,
    }
}

fn analyze_content_profile(files: &[FileRecord]) -> CategoryProfile {
    let mut categories = BTreeMap::new();
    for f in files {
        let category = match f.extension.to_lowercase().as_str() {
            ".csv" | ".xlsx" => "datasets",
            ".pdf" | ".docx" => "documents",
            ".jpg" | ".png" | ".jpeg" => "images",
            ".py" | ".js" => "code",
            _ => "other",
        };
        *categories.entry(category.to_string()).or_default() += 1;
    }
    categories
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
