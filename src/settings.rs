use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::analysis::classify::IngredientRule;
use crate::analysis::gender::NameFallback;
use crate::analysis::grouping::ACCEPT_THRESHOLD;
use crate::error::{PipelineError, Result};

/// Looked up in the working directory when no file is given.
const DEFAULT_FILE: &str = "price_gap";
const ENV_PREFIX: &str = "PRICE_GAP";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub similarity_threshold: f64,
    pub name_fallback: NameFallback,
    pub output_dir: PathBuf,
    /// Appended after the built-in ingredient table.
    pub extra_ingredients: Vec<IngredientRule>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            similarity_threshold: ACCEPT_THRESHOLD,
            name_fallback: NameFallback::default(),
            output_dir: PathBuf::from("out"),
            extra_ingredients: Vec::new(),
        }
    }
}

impl Settings {
    /// Layers: defaults, then the settings file (`file`, or an optional
    /// `price_gap.toml`), then `PRICE_GAP_*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let source = match file {
            Some(path) => File::from(path),
            None => File::with_name(DEFAULT_FILE).required(false),
        };
        let settings: Settings = Config::builder()
            .add_source(source)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(PipelineError::InvalidThreshold(self.similarity_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn settings_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.similarity_threshold, 0.3);
        assert_eq!(s.name_fallback, NameFallback::MenFirst);
        assert_eq!(s.output_dir, PathBuf::from("out"));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn loads_file() {
        let file = settings_file(
            r#"
similarity_threshold = 0.5
name_fallback = "women_first"

[[extra_ingredients]]
needle = "bakuchiol"
label = "Gentle retinol alternative"
"#,
        );
        let s = Settings::load(Some(file.path())).unwrap();
        assert_eq!(s.similarity_threshold, 0.5);
        assert_eq!(s.name_fallback, NameFallback::WomenFirst);
        assert_eq!(s.output_dir, PathBuf::from("out"));
        assert_eq!(s.extra_ingredients[0].needle, "bakuchiol");
    }

    #[test]
    fn rejects_bad_threshold() {
        let file = settings_file("similarity_threshold = 2.0\n");
        assert!(matches!(
            Settings::load(Some(file.path())),
            Err(PipelineError::InvalidThreshold(_))
        ));
    }
}
