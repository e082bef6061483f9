// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Session state machine driving staged song generation.
//!
//! A `SongGenerator` owns one song and advances it through the
//! completion states empty -> named -> themed -> lyrics ready. It keeps
//! a FIFO of not-yet-offered candidate names, replenished one backend
//! batch at a time, and a session-long history of every surfaced name
//! used to bias future batches away from repeats. One generator per
//! session; no shared state across sessions.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::prompt::{PromptEngine, StructuredResponse};
use crate::song::{Song, SongSection};

/// Candidate names requested per backend batch.
pub const DEFAULT_NAME_BATCH: usize = 5;

/// History hint sent before any names have been surfaced.
const EMPTY_HISTORY_HINT: &str = "Neon";

/// Orchestrates name, theme and lyric generation for one song session.
pub struct SongGenerator {
    engine: PromptEngine,
    song: Song,
    candidate_names: VecDeque<String>,
    name_history: Vec<String>,
    name_batch_size: usize,
    songs_dir: PathBuf,
    clear_lyrics_on_theme_change: bool,
}

impl SongGenerator {
    /// Create a generator for a new song over the given structure
    /// template.
    pub fn new(engine: PromptEngine, structure: impl Into<String>) -> Self {
        debug!("creating a new song generator");
        Self {
            engine,
            song: Song::new(structure),
            candidate_names: VecDeque::new(),
            name_history: Vec::new(),
            name_batch_size: DEFAULT_NAME_BATCH,
            songs_dir: PathBuf::from("songs"),
            clear_lyrics_on_theme_change: false,
        }
    }

    /// Builder: names requested per replenishment batch.
    pub fn with_name_batch_size(mut self, size: usize) -> Self {
        self.name_batch_size = size.max(1);
        self
    }

    /// Builder: directory songs are persisted into.
    pub fn with_songs_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.songs_dir = dir.into();
        self
    }

    /// Builder: also clear generated lyrics whenever the theme changes.
    ///
    /// Off by default: an edited theme leaves earlier lyrics in place
    /// and callers are expected to check `has_lyrics` before allowing
    /// edits.
    pub fn with_lyrics_invalidation(mut self, enabled: bool) -> Self {
        self.clear_lyrics_on_theme_change = enabled;
        self
    }

    /// The owned song.
    pub fn song(&self) -> &Song {
        &self.song
    }

    /// Current song name. Empty means unset.
    pub fn song_name(&self) -> &str {
        self.song.name()
    }

    /// Set the song name.
    ///
    /// A changed name drops the session back before the themed state:
    /// the theme is cleared. Re-setting the current name is a no-op.
    pub fn set_song_name(&mut self, name: &str) {
        if name == self.song.name() {
            return;
        }
        self.set_song_theme("");
        self.song.set_name(name);
    }

    /// Current theme, either as stored (multi-paragraph) or flattened
    /// to a single paragraph for prompt use.
    pub fn song_theme(&self, single_paragraph: bool) -> String {
        let theme = self.song.theme();
        if single_paragraph {
            theme.replace("\n\n", " ").replace('\n', " ")
        } else {
            theme.to_string()
        }
    }

    /// Set the theme text.
    ///
    /// With lyrics invalidation enabled, a changed theme also clears
    /// any generated lyrics; otherwise stale lyrics are left for the
    /// caller to manage.
    pub fn set_song_theme(&mut self, theme: &str) {
        if theme == self.song.theme() {
            return;
        }
        if self.clear_lyrics_on_theme_change {
            self.song.set_lyrics(HashMap::new());
        }
        self.song.set_theme(theme);
    }

    /// Clear the theme.
    pub fn clear_song_theme(&mut self) {
        self.set_song_theme("");
    }

    /// Clear generated lyrics.
    pub fn clear_lyrics(&mut self) {
        self.song.set_lyrics(HashMap::new());
    }

    /// The structure template in use.
    pub fn song_structure(&self) -> &str {
        self.song.structure()
    }

    /// Names surfaced so far this session, oldest first.
    pub fn name_history(&self) -> &[String] {
        &self.name_history
    }

    /// Candidate names queued and not yet offered.
    pub fn queued_names(&self) -> usize {
        self.candidate_names.len()
    }

    /// Pick the next candidate name, replenishing the queue with one
    /// backend batch when it is empty, and make it the song name.
    ///
    /// The popped name goes through `set_song_name`, so it clears the
    /// theme like any other name change.
    pub fn set_random_song_name(&mut self) -> Result<String> {
        if self.candidate_names.is_empty() {
            self.replenish_candidate_names()?;
        }
        let name = match self.candidate_names.pop_front() {
            Some(name) => name,
            None => return Err(Error::MissingField("name1".to_string())),
        };
        debug!(%name, "setting random song name");
        self.set_song_name(&name);
        Ok(name)
    }

    /// One backend batch call. The queue and the history both take the
    /// batch, in the reply's field order.
    fn replenish_candidate_names(&mut self) -> Result<()> {
        debug!("generating new song names");
        let history = if self.name_history.is_empty() {
            EMPTY_HISTORY_HINT.to_string()
        } else {
            self.name_history.join(", ")
        };
        let response = self.engine.request_song_names(self.name_batch_size, &history)?;
        let names = response.text_values()?;
        if names.is_empty() {
            return Err(Error::MissingField("name1".to_string()));
        }
        debug!(count = names.len(), "generated song names");
        self.candidate_names.extend(names.iter().cloned());
        self.name_history.extend(names);
        Ok(())
    }

    /// Generate a fresh theme for the current name.
    ///
    /// The reply must carry `description`, `narrative1`, `narrative2`
    /// and `mood`; a parse sentinel or an absent field surfaces as an
    /// error for the caller to report, the stored theme is untouched.
    pub fn set_random_song_theme(&mut self) -> Result<String> {
        if self.song.name().is_empty() {
            return Err(Error::NameNotSet);
        }
        debug!("generating new song theme");
        let response = self.engine.request_song_theme(self.song.name())?;
        let description = response.text_field("description")?;
        let narrative1 = response.text_field("narrative1")?;
        let narrative2 = response.text_field("narrative2")?;
        let mood = response.text_field("mood")?;
        let theme = format!("{}\n\n{} {}\n\n{}", description, narrative1, narrative2, mood);
        self.set_song_theme(&theme);
        Ok(theme)
    }

    /// Whether lyric generation is allowed: both name and theme set.
    pub fn can_generate_lyrics(&self) -> bool {
        !self.song.name().is_empty() && !self.song.theme().is_empty()
    }

    /// Whether lyrics have been generated.
    pub fn has_lyrics(&self) -> bool {
        self.song.has_lyrics()
    }

    /// Generate lyrics for every section of the structure, replace the
    /// song's lyrics wholesale and persist the song.
    ///
    /// Does nothing and returns `Ok(false)` until both name and theme
    /// are set. The theme is flattened to a single paragraph for the
    /// prompt; the stored multi-paragraph form is kept for display.
    pub fn generate_lyrics(&mut self) -> Result<bool> {
        if !self.can_generate_lyrics() {
            return Ok(false);
        }
        info!(name = %self.song.name(), "generating lyrics");
        let theme = self.song_theme(true);
        let response = self.engine.request_full_song(self.song.name(), &theme)?;
        let lyrics = self.complete_lyrics(&response)?;
        self.song.set_lyrics(lyrics);
        self.save()?;
        Ok(true)
    }

    /// The reply must carry a lyric for every section the structure
    /// references; a partial set never reaches the song or disk.
    fn complete_lyrics(&self, response: &StructuredResponse) -> Result<HashMap<String, String>> {
        let mut lyrics = HashMap::new();
        for section in self.song.referenced_sections() {
            let text = response.text_field(section.key())?;
            lyrics.insert(section.key().to_string(), text.to_string());
        }
        Ok(lyrics)
    }

    /// Trimmed lyric text for one section.
    pub fn section_lyrics(&self, section: SongSection) -> Result<&str> {
        self.song.section_lyrics(section)
    }

    /// Overwrite the lyric text for one section.
    pub fn set_section_lyrics(&mut self, section: SongSection, text: impl Into<String>) {
        self.song.set_section_lyrics(section, text);
    }

    /// Assemble the final song listing.
    pub fn export(&self) -> Result<String> {
        self.song.export()
    }

    /// Persist the song under the songs directory, filename derived
    /// from the song name. Returns the path written.
    pub fn save(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.songs_dir)?;
        let path = self.songs_dir.join(self.song.default_filename());
        self.song.save_to(&path)?;
        debug!(path = %path.display(), "song saved");
        Ok(path)
    }

    /// Load a previously saved song record into the session.
    pub fn load_song_from<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.song.load_from(path)
    }
}
