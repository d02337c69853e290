//! Static leg slates.
//!
//! Legs typed in by the user and saved to a TOML (`[[legs]]`) or JSON
//! (array) file, or the built-in sample slate when no file is given.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{LegSource, SourceError};
use crate::types::Leg;

/// TOML file layout: a top-level `[[legs]]` array.
#[derive(Debug, Deserialize)]
struct SlateFile {
    #[serde(default)]
    legs: Vec<Leg>,
}

/// Leg source backed by a file or the sample slate.
pub struct StaticLegSource {
    path: Option<PathBuf>,
}

impl StaticLegSource {
    /// Source reading legs from `path` on every fetch.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()) }
    }

    /// Source returning `sample_slate()`.
    pub fn sample() -> Self {
        Self { path: None }
    }

    /// Five example matches for trying the generator without any input.
    pub fn sample_slate() -> Vec<Leg> {
        vec![
            Leg::new("Match 1", "1X2 Maison", 1.55).with_confidence(0.6),
            Leg::new("Match 2", "1X2 Maison", 1.85).with_confidence(0.5),
            Leg::new("Match 3", "Under 2.5", 1.72).with_confidence(0.7),
            Leg::new("Match 4", "Over 2.5", 2.10).with_confidence(0.4),
            Leg::new("Match 5", "1X2 Maison", 1.95).with_confidence(0.5),
        ]
    }

    fn read_file(path: &Path) -> Result<Vec<Leg>, SourceError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        parse_slate(&contents, path)
    }
}

/// Parse slate contents; `.json` files are a JSON array, anything else TOML.
pub fn parse_slate(contents: &str, path: &Path) -> Result<Vec<Leg>, SourceError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let legs = if is_json {
        serde_json::from_str::<Vec<Leg>>(contents)?
    } else {
        toml::from_str::<SlateFile>(contents)?.legs
    };

    debug!(path = %path.display(), count = legs.len(), "Slate parsed");
    Ok(legs)
}

#[async_trait]
impl LegSource for StaticLegSource {
    async fn fetch_legs(&self) -> Result<Vec<Leg>, SourceError> {
        match &self.path {
            Some(path) => Self::read_file(path),
            None => Ok(Self::sample_slate()),
        }
    }

    fn name(&self) -> &str {
        if self.path.is_some() {
            "slate-file"
        } else {
            "sample-slate"
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
