//! Set-difference planning between two fully fetched collections.
//!
//! A sync run fetches the source and target collections to completion,
//! computes the symmetric difference by item identity and applies additions
//! (and, unless running add-only, removals) through the chunked mutator.
//! Planning is pure: running it twice over unchanged inputs yields the same
//! plan, and the plan is independent of item order.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate};

use crate::{
    error::SyncError,
    types::{Artist, Track},
};

/// Item identity for diffing.
///
/// Tracks key on their stable `id`, falling back to the mutation `uri` for
/// items without one (local files); artists key on their `id`.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Track {
    fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.uri)
    }
}

impl Keyed for Artist {
    fn key(&self) -> &str {
        &self.id
    }
}

/// The minimal mutation set that makes the target match the source.
#[derive(Debug, Clone)]
pub struct SyncPlan<T> {
    /// Items present in the source but missing from the target.
    pub to_add: Vec<T>,
    /// Items present in the target but absent from the source.
    pub to_remove: Vec<T>,
}

impl<T> SyncPlan<T> {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes the symmetric difference between `source` and `target` by
/// identity key.
///
/// Both collections must be fully materialized before planning; diffing a
/// partially drained collection would produce spurious removals. Duplicate
/// keys within one side are collapsed, so a remote that violates its
/// no-duplicates guarantee still produces a correct plan.
pub fn plan<T: Keyed + Clone>(source: &[T], target: &[T]) -> SyncPlan<T> {
    let source_keys: HashSet<&str> = source.iter().map(Keyed::key).collect();
    let target_keys: HashSet<&str> = target.iter().map(Keyed::key).collect();

    let mut seen_add: HashSet<&str> = HashSet::new();
    let to_add = source
        .iter()
        .filter(|item| !target_keys.contains(item.key()) && seen_add.insert(item.key()))
        .cloned()
        .collect();

    let mut seen_remove: HashSet<&str> = HashSet::new();
    let to_remove = target
        .iter()
        .filter(|item| !source_keys.contains(item.key()) && seen_remove.insert(item.key()))
        .cloned()
        .collect();

    SyncPlan { to_add, to_remove }
}

/// Optional narrowing of the source collection before diffing.
///
/// Mirrors the filters of the saved-tracks endpoint consumer: popularity
/// bounds, artist names and the date window of when the track was saved.
/// An empty filter passes everything through.
#[derive(Debug, Clone, Default)]
pub struct TrackFilter {
    /// Case-insensitive artist names; a track matches if any of its artists
    /// is listed here.
    pub artists: Vec<String>,
    pub min_popularity: Option<u32>,
    pub max_popularity: Option<u32>,
    pub added_after: Option<NaiveDate>,
    pub added_before: Option<NaiveDate>,
}

impl TrackFilter {
    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
            && self.min_popularity.is_none()
            && self.max_popularity.is_none()
            && self.added_after.is_none()
            && self.added_before.is_none()
    }

    pub fn matches(&self, track: &Track) -> bool {
        if let Some(min) = self.min_popularity {
            if !track.popularity.is_some_and(|p| p >= min) {
                return false;
            }
        }

        if let Some(max) = self.max_popularity {
            if !track.popularity.is_some_and(|p| p <= max) {
                return false;
            }
        }

        if !self.artists.is_empty() {
            let names: Vec<String> = track.artists.iter().map(|a| a.to_lowercase()).collect();
            if !self
                .artists
                .iter()
                .any(|wanted| names.contains(&wanted.to_lowercase()))
            {
                return false;
            }
        }

        if self.added_after.is_some() || self.added_before.is_some() {
            let Some(added) = track.added_date() else {
                return false;
            };
            if self.added_after.is_some_and(|after| added < after) {
                return false;
            }
            if self.added_before.is_some_and(|before| added > before) {
                return false;
            }
        }

        true
    }
}

/// Applies `filter` to `tracks`, keeping input order.
pub fn filter_tracks(tracks: Vec<Track>, filter: &TrackFilter) -> Vec<Track> {
    if filter.is_empty() {
        return tracks;
    }
    tracks.into_iter().filter(|t| filter.matches(t)).collect()
}

/// Parses a `YYYY-MM-DD` CLI argument into a date.
pub fn parse_filter_date(value: &str) -> Result<NaiveDate, SyncError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| SyncError::config(format!("invalid date '{}', expected YYYY-MM-DD", value)))
}

impl Track {
    /// The date this track was saved, parsed from the RFC 3339 `added_at`
    /// timestamp the API reports.
    pub fn added_date(&self) -> Option<NaiveDate> {
        self.added_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.date_naive())
    }
}
