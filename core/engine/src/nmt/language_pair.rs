use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Error, Result};

/// Languages with an OPUS-MT export we know how to name.
/// Model directories follow `opus-mt-{source}-{target}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageCode {
    Ja,
    En,
    Zh,
    Es,
}

impl LanguageCode {
    pub fn as_code(&self) -> &'static str {
        match self {
            LanguageCode::Ja => "ja",
            LanguageCode::En => "en",
            LanguageCode::Zh => "zh",
            LanguageCode::Es => "es",
        }
    }
}

impl FromStr for LanguageCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ja" | "jpn" | "japanese" | "日本語" => Ok(LanguageCode::Ja),
            "en" | "eng" | "english" => Ok(LanguageCode::En),
            "zh" | "zho" | "chinese" | "中文" => Ok(LanguageCode::Zh),
            "es" | "spa" | "spanish" | "español" => Ok(LanguageCode::Es),
            _ => Err(anyhow!("unsupported language code: {s}")),
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Source -> target language pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    pub source: LanguageCode,
    pub target: LanguageCode,
}

impl LanguagePair {
    pub fn new(source: LanguageCode, target: LanguageCode) -> Self {
        Self { source, target }
    }

    /// Directory name for this pair, e.g. `opus-mt-ja-en`.
    pub fn model_dir_name(&self) -> String {
        format!("opus-mt-{}-{}", self.source.as_code(), self.target.as_code())
    }

    pub fn from_model_dir_name(dir_name: &str) -> Result<Self> {
        let name = dir_name
            .strip_prefix("opus-mt-")
            .ok_or_else(|| anyhow!("invalid model directory name: {dir_name}"))?;

        let parts: Vec<&str> = name.split('-').collect();
        if parts.len() != 2 {
            return Err(anyhow!("invalid model directory name format: {dir_name}"));
        }

        Ok(Self {
            source: parts[0].parse()?,
            target: parts[1].parse()?,
        })
    }

    /// Identify the language pair from a model directory path.
    pub fn from_model_dir(model_dir: &Path) -> Result<Self> {
        let dir_name = model_dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("invalid model directory path: {}", model_dir.display()))?;

        Self::from_model_dir_name(dir_name)
    }
}

impl FromStr for LanguagePair {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 2 {
            return Err(anyhow!("invalid language pair format: {s}"));
        }
        Ok(Self {
            source: parts[0].parse()?,
            target: parts[1].parse()?,
        })
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}
