// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Prompt engine: template filling, backend invocation, reply parsing.
//!
//! The engine is stateless with respect to song data; it holds the
//! loaded template set and a handle to the generation backend. Building
//! a prompt and invoking the backend are separate operations so the
//! three call sites (names, theme, full song) share one
//! normalization/parsing path while supplying different templates and
//! parameters.

pub mod response;

pub use response::StructuredResponse;

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use tracing::debug;

use crate::config::PromptsFile;
use crate::error::{Error, Result};

/// Generation backend capability: prompt string in, raw text reply out.
///
/// One blocking call per request. Transport, model selection and any
/// retry policy live behind the implementation.
pub trait TextBackend: Send {
    /// Send a prompt and return the raw text reply.
    fn complete(&mut self, prompt: &str) -> anyhow::Result<String>;
}

/// Canned-reply backend for tests and the offline demo driver.
///
/// Replies are handed out in order; every received prompt is recorded
/// in a shared log the caller can keep a handle to.
pub struct ScriptedBackend {
    replies: VecDeque<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedBackend {
    /// Create a backend with a fixed sequence of replies.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the prompts received so far.
    pub fn prompt_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

impl TextBackend for ScriptedBackend {
    fn complete(&mut self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .pop_front()
            .ok_or_else(|| anyhow!("scripted backend has no replies left"))
    }
}

/// Fills named templates, invokes the backend, parses replies.
pub struct PromptEngine {
    role: String,
    templates: HashMap<String, String>,
    backend: Box<dyn TextBackend>,
}

impl PromptEngine {
    /// Create an engine over a loaded template set and a backend.
    pub fn new(prompts: PromptsFile, backend: Box<dyn TextBackend>) -> Self {
        Self {
            role: prompts.role,
            templates: prompts.templates,
            backend,
        }
    }

    /// Build the full prompt: role preamble plus the named template
    /// with `{parameter}` substitution.
    ///
    /// Only `{identifier}` spans (ASCII alphanumerics and underscores)
    /// are parameters; any other braced text passes through literally,
    /// so JSON examples inside templates survive.
    pub fn build_prompt(&self, template_name: &str, params: &[(&str, &str)]) -> Result<String> {
        let template = self
            .templates
            .get(template_name)
            .ok_or_else(|| Error::UnknownTemplate(template_name.to_string()))?;
        let body = fill(template_name, template, params)?;
        Ok(format!("{}\n\n{}\n", self.role, body))
    }

    /// One blocking backend call.
    ///
    /// The reply is parsed as a structured response; a reply that is
    /// not valid structured data degrades to the parse sentinel rather
    /// than erroring. A failure of the backend itself is fatal to the
    /// call and is not retried here.
    pub fn invoke(&mut self, prompt: &str) -> Result<StructuredResponse> {
        debug!(prompt_len = prompt.len(), "invoking generation backend");
        let raw = self.backend.complete(prompt).map_err(Error::Backend)?;
        Ok(StructuredResponse::parse(&raw))
    }

    /// Request a batch of candidate song names.
    pub fn request_song_names(
        &mut self,
        count: usize,
        history: &str,
    ) -> Result<StructuredResponse> {
        let count = count.to_string();
        let prompt = self.build_prompt("song_names", &[("count", &count), ("history", history)])?;
        self.invoke(&prompt)
    }

    /// Request a theme for a named song.
    pub fn request_song_theme(&mut self, song_name: &str) -> Result<StructuredResponse> {
        let prompt = self.build_prompt("song_theme", &[("song_name", song_name)])?;
        self.invoke(&prompt)
    }

    /// Request full lyrics for a named, themed song.
    pub fn request_full_song(
        &mut self,
        song_name: &str,
        song_theme: &str,
    ) -> Result<StructuredResponse> {
        let prompt = self.build_prompt(
            "full_song",
            &[("song_name", song_name), ("song_theme", song_theme)],
        )?;
        self.invoke(&prompt)
    }
}

/// Substitute `{identifier}` parameters into a template body.
fn fill(template_name: &str, template: &str, params: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let brace = &rest[start..];
        match brace.find('}') {
            Some(end) if is_identifier(&brace[1..end]) => {
                let ident = &brace[1..end];
                match params.iter().find(|(name, _)| *name == ident) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        return Err(Error::MissingParameter {
                            template: template_name.to_string(),
                            parameter: ident.to_string(),
                        });
                    }
                }
                rest = &brace[end + 1..];
            }
            _ => {
                out.push('{');
                rest = &brace[1..];
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
