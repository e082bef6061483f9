// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song entity: completion state, lyric assembly, and persistence.
//!
//! A `Song` tracks name, theme and per-section lyrics against an
//! immutable structure template. The structure interleaves literal
//! labels with `[@section]` placeholders; `export` substitutes every
//! placeholder with the trimmed lyric for that section in a single
//! pass. Songs persist as a JSON record of name, theme and lyrics.

pub mod section;

pub use section::SongSection;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Persisted form of a song. The structure template is configuration,
/// not session state, so it is not part of the record. Every field
/// defaults so older or hand-edited records load cleanly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SongRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    theme: String,
    #[serde(default)]
    lyrics: HashMap<String, String>,
}

/// A song in progress.
///
/// Created empty; name and theme are set by the session driver, lyrics
/// are replaced wholesale by one generation call. The lyrics mapping is
/// either empty or covers every section the structure references.
#[derive(Debug, Clone)]
pub struct Song {
    name: String,
    theme: String,
    lyrics: HashMap<String, String>,
    structure: String,
}

impl Song {
    /// Create an empty song over the given structure template.
    pub fn new(structure: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            theme: String::new(),
            lyrics: HashMap::new(),
            structure: structure.into(),
        }
    }

    /// Get the song name. Empty means unset.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the song name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the theme text. Empty means unset.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Set the theme text.
    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.theme = theme.into();
    }

    /// Get the structure template.
    pub fn structure(&self) -> &str {
        &self.structure
    }

    /// Get the lyrics mapping.
    pub fn lyrics(&self) -> &HashMap<String, String> {
        &self.lyrics
    }

    /// Replace the lyrics mapping wholesale. Partial updates go through
    /// `set_section_lyrics`.
    pub fn set_lyrics(&mut self, lyrics: HashMap<String, String>) {
        self.lyrics = lyrics;
    }

    /// Whether lyrics have been generated.
    pub fn has_lyrics(&self) -> bool {
        !self.lyrics.is_empty()
    }

    /// Get the trimmed lyric text for one section.
    ///
    /// Fails only when the lyrics mapping is incomplete relative to the
    /// sections in use, which callers are expected to prevent.
    pub fn section_lyrics(&self, section: SongSection) -> Result<&str> {
        self.lyrics
            .get(section.key())
            .map(|text| text.trim())
            .ok_or_else(|| Error::MissingSection(section.key().to_string()))
    }

    /// Overwrite the lyric text for one section.
    pub fn set_section_lyrics(&mut self, section: SongSection, text: impl Into<String>) {
        self.lyrics.insert(section.key().to_string(), text.into());
    }

    /// Sections referenced by the structure template, in order of first
    /// appearance, duplicates included.
    pub fn referenced_sections(&self) -> Vec<SongSection> {
        let mut sections = Vec::new();
        let mut rest = self.structure.as_str();
        while let Some(start) = rest.find("[@") {
            let token = &rest[start..];
            match token.find(']') {
                Some(end) => {
                    if let Some(section) = SongSection::from_key(&token[2..end]) {
                        sections.push(section);
                    }
                    rest = &token[end + 1..];
                }
                None => break,
            }
        }
        sections
    }

    /// Assemble the final song listing.
    ///
    /// Walks the structure once; every exact `[@key]` token is replaced
    /// by the trimmed lyric for that section, literal labels pass
    /// through unchanged. An unterminated token tail passes through
    /// literally.
    pub fn export(&self) -> Result<String> {
        let mut out = String::with_capacity(self.structure.len());
        let mut rest = self.structure.as_str();
        while let Some(start) = rest.find("[@") {
            out.push_str(&rest[..start]);
            let token = &rest[start..];
            match token.find(']') {
                Some(end) => {
                    let key = &token[2..end];
                    match SongSection::from_key(key) {
                        Some(section) => out.push_str(self.section_lyrics(section)?),
                        None => return Err(Error::MissingSection(key.to_string())),
                    }
                    rest = &token[end + 1..];
                }
                None => {
                    out.push_str(token);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Default persistence filename derived from the song name.
    pub fn default_filename(&self) -> String {
        format!("{}.json", self.name.to_lowercase().replace(' ', "_"))
    }

    /// Write the song record to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let record = SongRecord {
            name: self.name.clone(),
            theme: self.theme.clone(),
            lyrics: self.lyrics.clone(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Load a song record from a file, replacing name, theme and
    /// lyrics. Missing record fields default to empty.
    pub fn load_from<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let contents = fs::read_to_string(path.as_ref())?;
        let record: SongRecord = serde_json::from_str(&contents)?;
        self.name = record.name;
        self.theme = record.theme;
        self.lyrics = record.lyrics;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURE: &str = "[Verse 1]\n[@verse1]\n\n[Chorus]\n[@chorus]\n\n[Chorus]\n[@chorus]\n\n[Outro]\n[@outro]\n";

    fn complete_lyrics() -> HashMap<String, String> {
        let mut lyrics = HashMap::new();
        lyrics.insert("verse1".to_string(), "first verse line".to_string());
        lyrics.insert("chorus".to_string(), "  the big chorus  ".to_string());
        lyrics.insert("outro".to_string(), "fading out\n".to_string());
        lyrics
    }

    #[test]
    fn test_new_song_is_empty() {
        let song = Song::new(STRUCTURE);
        assert_eq!(song.name(), "");
        assert_eq!(song.theme(), "");
        assert!(!song.has_lyrics());
        assert_eq!(song.structure(), STRUCTURE);
    }

    #[test]
    fn test_accessors() {
        let mut song = Song::new(STRUCTURE);
        song.set_name("Dancing At The Beach");
        song.set_theme("night time dancing");
        assert_eq!(song.name(), "Dancing At The Beach");
        assert_eq!(song.theme(), "night time dancing");
    }

    #[test]
    fn test_section_lyrics_trimmed() {
        let mut song = Song::new(STRUCTURE);
        song.set_lyrics(complete_lyrics());
        assert_eq!(song.section_lyrics(SongSection::Chorus).unwrap(), "the big chorus");
        assert_eq!(song.section_lyrics(SongSection::Outro).unwrap(), "fading out");
    }

    #[test]
    fn test_section_lyrics_missing() {
        let song = Song::new(STRUCTURE);
        let err = song.section_lyrics(SongSection::Bridge).unwrap_err();
        assert!(matches!(err, Error::MissingSection(key) if key == "bridge"));
    }

    #[test]
    fn test_set_section_lyrics_overwrites() {
        let mut song = Song::new(STRUCTURE);
        song.set_lyrics(complete_lyrics());
        song.set_section_lyrics(SongSection::Chorus, "new chorus");
        assert_eq!(song.section_lyrics(SongSection::Chorus).unwrap(), "new chorus");
    }

    #[test]
    fn test_referenced_sections() {
        let song = Song::new(STRUCTURE);
        assert_eq!(
            song.referenced_sections(),
            vec![
                SongSection::Verse1,
                SongSection::Chorus,
                SongSection::Chorus,
                SongSection::Outro,
            ]
        );
    }

    #[test]
    fn test_export_substitutes_every_placeholder() {
        let mut song = Song::new(STRUCTURE);
        song.set_lyrics(complete_lyrics());

        let listing = song.export().unwrap();
        assert!(!listing.contains("[@"));
        assert!(listing.contains("first verse line"));
        assert!(listing.contains("fading out"));
        // Repeated placeholder substituted at each occurrence
        assert_eq!(listing.matches("the big chorus").count(), 2);
        // Literal labels pass through in original order
        let verse_label = listing.find("[Verse 1]").unwrap();
        let chorus_label = listing.find("[Chorus]").unwrap();
        let outro_label = listing.find("[Outro]").unwrap();
        assert!(verse_label < chorus_label && chorus_label < outro_label);
    }

    #[test]
    fn test_export_exact_token_matching() {
        // verse1 must not be treated as a prefix of a longer key
        let mut song = Song::new("[@verse1]\n[@verse2]\n");
        song.set_section_lyrics(SongSection::Verse1, "one");
        song.set_section_lyrics(SongSection::Verse2, "two");
        assert_eq!(song.export().unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_export_incomplete_lyrics_fails() {
        let mut song = Song::new(STRUCTURE);
        let mut lyrics = complete_lyrics();
        lyrics.remove("outro");
        song.set_lyrics(lyrics);
        let err = song.export().unwrap_err();
        assert!(matches!(err, Error::MissingSection(key) if key == "outro"));
    }

    #[test]
    fn test_export_unterminated_token_passes_through() {
        let mut song = Song::new("[Chorus]\n[@chorus]\nend [@brid");
        song.set_section_lyrics(SongSection::Chorus, "la la la");
        assert_eq!(song.export().unwrap(), "[Chorus]\nla la la\nend [@brid");
    }

    #[test]
    fn test_default_filename() {
        let mut song = Song::new(STRUCTURE);
        song.set_name("Dancing At The Beach");
        assert_eq!(song.default_filename(), "dancing_at_the_beach.json");
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.json");

        let mut song = Song::new(STRUCTURE);
        song.set_name("Round Trip");
        song.set_theme("a theme\n\nwith paragraphs");
        song.set_lyrics(complete_lyrics());
        song.save_to(&path).unwrap();

        let mut loaded = Song::new(STRUCTURE);
        loaded.load_from(&path).unwrap();
        assert_eq!(loaded.name(), "Round Trip");
        assert_eq!(loaded.theme(), "a theme\n\nwith paragraphs");
        assert_eq!(loaded.lyrics(), song.lyrics());
    }

    #[test]
    fn test_load_tolerates_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"name": "Only A Name"}"#).unwrap();

        let mut song = Song::new(STRUCTURE);
        song.set_theme("stale theme");
        song.load_from(&path).unwrap();
        assert_eq!(song.name(), "Only A Name");
        assert_eq!(song.theme(), "");
        assert!(!song.has_lyrics());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let mut song = Song::new(STRUCTURE);
        assert!(song.load_from("/nonexistent/song.json").is_err());
    }
}
