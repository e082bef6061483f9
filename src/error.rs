// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error taxonomy for the generation pipeline.
//!
//! Configuration and template problems are fatal to the call that hits
//! them; backend failures are surfaced without retry. A reply that fails
//! to parse as structured data is not an error at the invoke layer (it
//! degrades to a sentinel response) but reading fields out of the
//! sentinel produces `ParseFailed`.

use thiserror::Error;

/// Errors produced by the generation pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file missing, malformed, or referencing unknown
    /// section keys. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// A prompt template name that is not in the loaded template set.
    #[error("unknown prompt template: {0}")]
    UnknownTemplate(String),

    /// A template referenced a parameter the caller did not supply.
    #[error("template '{template}' references missing parameter '{parameter}'")]
    MissingParameter { template: String, parameter: String },

    /// The generation backend capability itself failed. Not retried.
    #[error("generation backend failed: {0}")]
    Backend(anyhow::Error),

    /// A field was read out of a reply that never parsed as structured
    /// data.
    #[error("backend reply was not valid structured data")]
    ParseFailed,

    /// A structured reply lacked an expected field.
    #[error("structured reply missing field '{0}'")]
    MissingField(String),

    /// Lyrics have no entry for a section the structure references.
    #[error("no lyrics for section '{0}'")]
    MissingSection(String),

    /// A generation stage was invoked before the song was named.
    #[error("song name is not set")]
    NameNotSet,

    /// Filesystem failure while persisting or loading a song record.
    #[error("song persistence failed: {0}")]
    Io(#[from] std::io::Error),

    /// Song record serialization or deserialization failure.
    #[error("song record is not valid: {0}")]
    Record(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
