// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Template store: song structure styles and prompt templates.
//!
//! Two YAML files back the pipeline: a structure file keyed by song
//! style, yielding a structure template of literal labels and
//! `[@section]` placeholders, and a prompts file carrying the role
//! preamble plus the named prompt templates. Both are pure data
//! providers; a missing or malformed file is fatal at startup.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::song::SongSection;

/// Template names the prompt engine requires.
pub const REQUIRED_TEMPLATES: [&str; 3] = ["song_names", "song_theme", "full_song"];

/// Song structure templates, keyed by style name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureFile {
    styles: HashMap<String, String>,
}

impl StructureFile {
    /// Load and validate a structure file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "failed to read structure file {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a structure file from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: StructureFile = serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("failed to parse structure file: {}", e)))?;
        file.validate()?;
        Ok(file)
    }

    /// Style names, sorted for stable listings.
    pub fn styles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.styles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get the structure template for a style.
    pub fn structure(&self, style: &str) -> Result<&str> {
        self.styles
            .get(style)
            .map(String::as_str)
            .ok_or_else(|| Error::Config(format!("unknown song style '{}'", style)))
    }

    /// Every placeholder in every style must name a known section and
    /// be terminated.
    fn validate(&self) -> Result<()> {
        for (style, structure) in &self.styles {
            let mut rest = structure.as_str();
            while let Some(start) = rest.find("[@") {
                let token = &rest[start..];
                let end = match token.find(']') {
                    Some(end) => end,
                    None => {
                        return Err(Error::Config(format!(
                            "style '{}' has an unterminated placeholder",
                            style
                        )));
                    }
                };
                let key = &token[2..end];
                if SongSection::from_key(key).is_none() {
                    return Err(Error::Config(format!(
                        "style '{}' references unknown section '[@{}]'",
                        style, key
                    )));
                }
                rest = &token[end + 1..];
            }
        }
        Ok(())
    }
}

/// Prompt templates plus the shared role preamble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptsFile {
    /// Persona preamble prepended to every prompt.
    pub role: String,
    /// Named prompt templates.
    #[serde(flatten)]
    pub templates: HashMap<String, String>,
}

impl PromptsFile {
    /// Load and validate a prompts file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "failed to read prompts file {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a prompts file from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: PromptsFile = serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("failed to parse prompts file: {}", e)))?;
        for name in REQUIRED_TEMPLATES {
            if !file.templates.contains_key(name) {
                return Err(Error::Config(format!(
                    "prompts file is missing template '{}'",
                    name
                )));
            }
        }
        Ok(file)
    }
}
