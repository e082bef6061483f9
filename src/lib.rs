// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! VERSEGEN - staged song lyrics generation pipeline.
//!
//! The crate tracks a song's progressive completion state (name, theme,
//! per-section lyrics), fills prompt templates, parses structured
//! backend replies, and assembles finished lyrics from a structure
//! template of literal labels and `[@section]` placeholders. Callers
//! drive one `SongGenerator` per session; the generation backend is an
//! injected capability behind the `TextBackend` trait.

pub mod config;
pub mod error;
pub mod generator;
pub mod prompt;
pub mod song;

pub use config::{PromptsFile, StructureFile};
pub use error::{Error, Result};
pub use generator::SongGenerator;
pub use prompt::{PromptEngine, ScriptedBackend, StructuredResponse, TextBackend};
pub use song::{Song, SongSection};
