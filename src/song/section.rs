// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Canonical song section identifiers.
//!
//! Sections are the closed set of lyric subdivisions a structure
//! template may reference. Each has a stable string key used in lyric
//! mappings, persisted records, and structured backend replies.

use std::fmt;

/// A named subdivision of a song's lyrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SongSection {
    Verse1,
    Verse2,
    Prechorus,
    Chorus,
    Bridge,
    Outro,
}

impl SongSection {
    /// All known sections, in conventional song order.
    pub const ALL: [SongSection; 6] = [
        SongSection::Verse1,
        SongSection::Verse2,
        SongSection::Prechorus,
        SongSection::Chorus,
        SongSection::Bridge,
        SongSection::Outro,
    ];

    /// Stable string key for this section.
    pub fn key(&self) -> &'static str {
        match self {
            SongSection::Verse1 => "verse1",
            SongSection::Verse2 => "verse2",
            SongSection::Prechorus => "prechorus",
            SongSection::Chorus => "chorus",
            SongSection::Bridge => "bridge",
            SongSection::Outro => "outro",
        }
    }

    /// Placeholder token form used in structure templates.
    pub fn placeholder(&self) -> String {
        format!("[@{}]", self.key())
    }

    /// Look up a section by its string key.
    pub fn from_key(key: &str) -> Option<SongSection> {
        SongSection::ALL.iter().copied().find(|s| s.key() == key)
    }
}

impl fmt::Display for SongSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
