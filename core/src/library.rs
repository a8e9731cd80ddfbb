//! Local user library: watch list, watched episodes, watch history and resume positions
//!
//! Everything lives in one JSON document under the data directory and is written
//! back after every change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const LIBRARY_FILE: &str = "library.json";

/// Oldest entries are dropped past this
pub const MAX_HISTORY: usize = 100;

/// Positions at or below this are not worth saving
const MIN_SAVE_SECONDS: f64 = 5.0;
/// Positions at or below this are not worth resuming
const MIN_RESUME_SECONDS: f64 = 1.0;
/// Closer than this to the end counts as finished
const END_MARGIN_SECONDS: f64 = 2.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub video_id: String,
    pub episode_name: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryData {
    #[serde(default)]
    pub watch_list: Vec<String>,
    #[serde(default)]
    pub watched_episodes: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub playback_positions: BTreeMap<String, f64>,
    #[serde(default)]
    pub watch_history: Vec<HistoryEntry>,
}

/// Portable subset used by export/import. Missing sections are left alone on import.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserDataExport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_episodes: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_positions: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_list: Option<Vec<String>>,
}

/// Key a playback position by video and trimmed episode name
pub fn position_key(video_id: &str, episode_name: &str) -> String {
    format!("{}||{}", video_id, episode_name.trim())
}

fn end_of(duration: Option<f64>) -> f64 {
    duration
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(f64::INFINITY)
}

pub struct Library {
    path: PathBuf,
    data: LibraryData,
}

impl Library {
    /// Open `<data_dir>/library.json`, creating the directory if needed
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir)?;
        }
        Self::open_at(data_dir.join(LIBRARY_FILE))
    }

    pub fn open_at(path: PathBuf) -> anyhow::Result<Self> {
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str::<LibraryData>(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse library {:?}: {}", path, e))?
        } else {
            tracing::debug!("No library at {:?}, starting empty", path);
            LibraryData::default()
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &LibraryData {
        &self.data
    }

    fn save(&self) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    // --- Watch list ---

    pub fn watch_list(&self) -> &[String] {
        &self.data.watch_list
    }

    pub fn in_watch_list(&self, video_id: &str) -> bool {
        self.data.watch_list.iter().any(|id| id == video_id)
    }

    /// Returns false if it was already there
    pub fn add_to_watch_list(&mut self, video_id: &str) -> anyhow::Result<bool> {
        if self.in_watch_list(video_id) {
            return Ok(false);
        }
        self.data.watch_list.push(video_id.to_string());
        self.save()?;
        Ok(true)
    }

    /// Returns false if it was not there
    pub fn remove_from_watch_list(&mut self, video_id: &str) -> anyhow::Result<bool> {
        let before = self.data.watch_list.len();
        self.data.watch_list.retain(|id| id != video_id);
        if self.data.watch_list.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Add or remove; returns whether the video is in the list afterwards
    pub fn toggle_watch_list(&mut self, video_id: &str) -> anyhow::Result<bool> {
        if self.in_watch_list(video_id) {
            self.remove_from_watch_list(video_id)?;
            Ok(false)
        } else {
            self.add_to_watch_list(video_id)?;
            Ok(true)
        }
    }

    // --- Watched episodes and history ---

    pub fn is_episode_watched(&self, video_id: &str, episode_name: &str) -> bool {
        self.data
            .watched_episodes
            .get(video_id)
            .map_or(false, |eps| eps.iter().any(|e| e == episode_name))
    }

    pub fn mark_episode_watched(&mut self, video_id: &str, episode_name: &str) -> anyhow::Result<()> {
        let episodes = self.data.watched_episodes.entry(video_id.to_string()).or_default();
        if !episodes.iter().any(|e| e == episode_name) {
            episodes.push(episode_name.to_string());
        }
        self.push_history(video_id, episode_name, Utc::now());
        self.save()
    }

    fn push_history(&mut self, video_id: &str, episode_name: &str, timestamp: DateTime<Utc>) {
        let history = &mut self.data.watch_history;
        if let Some(last) = history.last() {
            if last.video_id == video_id && last.episode_name == episode_name {
                tracing::debug!("Duplicate consecutive history entry for {}, skipping", video_id);
                return;
            }
        }
        history.push(HistoryEntry {
            video_id: video_id.to_string(),
            episode_name: episode_name.to_string(),
            timestamp,
        });
        if history.len() > MAX_HISTORY {
            let overflow = history.len() - MAX_HISTORY;
            history.drain(..overflow);
        }
    }

    /// Latest first
    pub fn recent_history(&self, limit: usize) -> Vec<&HistoryEntry> {
        self.data.watch_history.iter().rev().take(limit).collect()
    }

    pub fn history_len(&self) -> usize {
        self.data.watch_history.len()
    }

    // --- Playback positions ---

    /// Store `time` unless it is too close to the start or the end.
    /// Unknown duration counts as endless. Returns whether it was stored.
    pub fn save_position(
        &mut self,
        video_id: &str,
        episode_name: &str,
        time: f64,
        duration: Option<f64>,
    ) -> anyhow::Result<bool> {
        if !(time > MIN_SAVE_SECONDS && time < end_of(duration) - END_MARGIN_SECONDS) {
            return Ok(false);
        }
        self.data
            .playback_positions
            .insert(position_key(video_id, episode_name), time);
        self.save()?;
        Ok(true)
    }

    pub fn stored_position(&self, video_id: &str, episode_name: &str) -> Option<f64> {
        self.data
            .playback_positions
            .get(&position_key(video_id, episode_name))
            .copied()
    }

    /// Where playback should start; 0 when there is nothing meaningful to resume
    pub fn resume_position(&self, video_id: &str, episode_name: &str, duration: Option<f64>) -> f64 {
        let stored = self.stored_position(video_id, episode_name).unwrap_or(0.0);
        if stored > MIN_RESUME_SECONDS && stored < end_of(duration) - END_MARGIN_SECONDS {
            stored
        } else {
            0.0
        }
    }

    // --- Export / import ---

    pub fn export_data(&self) -> UserDataExport {
        UserDataExport {
            watched_episodes: Some(self.data.watched_episodes.clone()),
            playback_positions: Some(self.data.playback_positions.clone()),
            watch_list: Some(self.data.watch_list.clone()),
        }
    }

    pub fn export_to(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(&self.export_data())?;
        fs::write(path, content)?;
        tracing::info!("Exported user data to {:?}", path);
        Ok(())
    }

    /// Replace each section present in `imported`
    pub fn apply_import(&mut self, imported: UserDataExport) -> anyhow::Result<()> {
        if let Some(watched) = imported.watched_episodes {
            self.data.watched_episodes = watched;
        }
        if let Some(positions) = imported.playback_positions {
            self.data.playback_positions = positions;
        }
        if let Some(watch_list) = imported.watch_list {
            self.data.watch_list = watch_list;
        }
        self.save()
    }

    pub fn import_from(&mut self, path: &Path) -> anyhow::Result<()> {
        if !path.exists() {
            anyhow::bail!("File not found: {:?}", path);
        }
        let content = fs::read_to_string(path)?;
        let imported: UserDataExport = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to import user data: {}", e))?;
        self.apply_import(imported)?;
        tracing::info!("Imported user data from {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("vod-catalog-test-{}", uuid::Uuid::new_v4()))
    }

    fn fresh() -> (Library, PathBuf) {
        let dir = temp_dir();
        (Library::open(&dir).unwrap(), dir)
    }

    #[test]
    fn test_watch_list_toggle_and_persist() {
        let (mut lib, dir) = fresh();
        assert!(lib.toggle_watch_list("42").unwrap());
        assert!(!lib.add_to_watch_list("42").unwrap());
        assert!(lib.add_to_watch_list("7").unwrap());

        let reopened = Library::open(&dir).unwrap();
        assert_eq!(reopened.watch_list(), ["42".to_string(), "7".to_string()]);

        assert!(!lib.toggle_watch_list("42").unwrap());
        assert!(!lib.remove_from_watch_list("42").unwrap());
        assert_eq!(lib.watch_list(), ["7".to_string()]);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_mark_watched_records_once_and_skips_consecutive_duplicates() {
        let (mut lib, dir) = fresh();
        lib.mark_episode_watched("1", "E01").unwrap();
        lib.mark_episode_watched("1", "E01").unwrap();
        lib.mark_episode_watched("1", "E02").unwrap();
        lib.mark_episode_watched("1", "E01").unwrap();

        assert!(lib.is_episode_watched("1", "E01"));
        assert!(!lib.is_episode_watched("1", "E03"));
        assert_eq!(lib.data().watched_episodes["1"], vec!["E01", "E02"]);

        let recent: Vec<&str> = lib.recent_history(10).iter().map(|h| h.episode_name.as_str()).collect();
        assert_eq!(recent, vec!["E01", "E02", "E01"]);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_history_is_capped() {
        let (mut lib, dir) = fresh();
        for i in 0..(MAX_HISTORY + 5) {
            lib.push_history("v", &format!("E{}", i), Utc::now());
        }
        assert_eq!(lib.history_len(), MAX_HISTORY);
        assert_eq!(lib.recent_history(1)[0].episode_name, format!("E{}", MAX_HISTORY + 4));
        assert_eq!(lib.data().watch_history[0].episode_name, "E5");

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_save_position_thresholds() {
        let (mut lib, dir) = fresh();
        assert!(!lib.save_position("1", "E01", 4.0, Some(100.0)).unwrap());
        assert!(!lib.save_position("1", "E01", 99.0, Some(100.0)).unwrap());
        assert!(lib.save_position("1", " E01 ", 42.5, Some(100.0)).unwrap());
        assert!(lib.save_position("2", "E01", 5000.0, None).unwrap());

        assert_eq!(lib.stored_position("1", "E01"), Some(42.5));
        assert_eq!(lib.data().playback_positions.get("1||E01"), Some(&42.5));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_resume_position_thresholds() {
        let (mut lib, dir) = fresh();
        lib.save_position("1", "E01", 60.0, None).unwrap();

        assert_eq!(lib.resume_position("1", "E01", Some(120.0)), 60.0);
        assert_eq!(lib.resume_position("1", "E01", Some(61.0)), 0.0);
        assert_eq!(lib.resume_position("1", "E01", Some(0.0)), 60.0);
        assert_eq!(lib.resume_position("1", "E02", None), 0.0);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_export_then_import_into_other_library() {
        let (mut source, source_dir) = fresh();
        source.add_to_watch_list("5").unwrap();
        source.mark_episode_watched("5", "E01").unwrap();
        source.save_position("5", "E01", 33.0, None).unwrap();

        let export_path = source_dir.join("export.json");
        source.export_to(&export_path).unwrap();

        let (mut target, target_dir) = fresh();
        target.add_to_watch_list("99").unwrap();
        target.import_from(&export_path).unwrap();

        assert_eq!(target.watch_list(), ["5".to_string()]);
        assert!(target.is_episode_watched("5", "E01"));
        assert_eq!(target.stored_position("5", "E01"), Some(33.0));
        assert_eq!(target.history_len(), 0);

        fs::remove_dir_all(source_dir).ok();
        fs::remove_dir_all(target_dir).ok();
    }

    #[test]
    fn test_partial_import_keeps_missing_sections() {
        let (mut lib, dir) = fresh();
        lib.add_to_watch_list("1").unwrap();
        lib.save_position("1", "E01", 10.0, None).unwrap();

        let path = dir.join("partial.json");
        fs::write(&path, r#"{"watchList": ["2", "3"]}"#).unwrap();
        lib.import_from(&path).unwrap();

        assert_eq!(lib.watch_list(), ["2".to_string(), "3".to_string()]);
        assert_eq!(lib.stored_position("1", "E01"), Some(10.0));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_malformed_import_leaves_library_untouched() {
        let (mut lib, dir) = fresh();
        lib.add_to_watch_list("1").unwrap();

        let path = dir.join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(lib.import_from(&path).is_err());
        assert_eq!(lib.watch_list(), ["1".to_string()]);

        fs::remove_dir_all(dir).ok();
    }
}
