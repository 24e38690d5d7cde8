// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{ConfigWarnings, DefaultConfigWarnings};
use crate::{
    errors::{ConfigParseError, ConfigParseErrorKind},
    helpers::normalize_lexically,
};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Deserializer};
use std::{collections::BTreeSet, fmt};

/// Configuration for process-results.
#[derive(Clone, Debug)]
pub struct ProcessorConfig {
    inner: ProcessorConfigDeserialize,
}

impl ProcessorConfig {
    /// The default location of the config within the output directory.
    pub const CONFIG_PATH: &'static str = ".config/process-results.toml";

    /// Contains the default config as a TOML file.
    ///
    /// User configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../../default-config.toml");

    /// Reads the config from the given sources, logging warnings for unknown keys.
    ///
    /// If `config_file` is `None`, `.config/process-results.toml` under `root` is read if it
    /// exists.
    pub fn from_sources(
        root: impl AsRef<Utf8Path>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        Self::from_sources_with_warnings(root, config_file, &mut DefaultConfigWarnings)
    }

    /// Reads the config from the given sources, reporting warnings to `warnings`.
    pub fn from_sources_with_warnings(
        root: impl AsRef<Utf8Path>,
        config_file: Option<&Utf8Path>,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigParseError> {
        let root = root.as_ref();
        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = root.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let builder = Self::make_default_config().add_source(source);
        let (inner, unknown) = Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(&config_file, kind))?;

        if !unknown.is_empty() {
            warnings.unknown_config_keys(&config_file, root, &unknown);
        }

        Ok(Self { inner })
    }

    /// Returns the default config.
    pub fn default_config() -> Self {
        let (inner, unknown) = Self::build_and_deserialize_config(&Self::make_default_config())
            .expect("default config is always valid");
        debug_assert!(
            unknown.is_empty(),
            "default config has no unknown keys: {unknown:?}"
        );
        Self { inner }
    }

    /// Returns the output formats to write.
    pub fn formats(&self) -> &[OutputFormat] {
        &self.inner.output.formats
    }

    /// Returns whether existing output files may be replaced.
    pub fn overwrite(&self) -> bool {
        self.inner.output.overwrite
    }

    /// Returns the directory that local artifact paths are made relative to.
    ///
    /// A relative `artifacts.base-dir` is resolved against `output_dir`.
    pub fn artifacts_base_dir(&self, output_dir: &Utf8Path) -> Utf8PathBuf {
        normalize_lexically(&output_dir.join(&self.inner.artifacts.base_dir))
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<(ProcessorConfigDeserialize, BTreeSet<String>), ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let mut ignored = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            ignored.insert(path.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(config, &mut cb);
        let config: ProcessorConfigDeserialize = serde_path_to_error::deserialize(ignored_de)
            .map_err(|error| {
                // serde_path_to_error already reports the key, so drop it from the config error.
                let path = error.path().clone();
                let error = match error.into_inner() {
                    ConfigError::At { error, .. } => *error,
                    other => other,
                };
                ConfigParseErrorKind::DeserializeError(Box::new(serde_path_to_error::Error::new(
                    path, error,
                )))
            })?;

        Ok((config, ignored))
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

/// An output format that process-results can write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// The JSON Test Results Format, version 3.
    JsonTestResults,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JsonTestResults => write!(f, "json-test-results"),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ProcessorConfigDeserialize {
    output: OutputConfig,
    artifacts: ArtifactsConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct OutputConfig {
    #[serde(deserialize_with = "deserialize_formats")]
    formats: Vec<OutputFormat>,
    overwrite: bool,
}

/// Each format is written once, in the order it is first listed.
fn deserialize_formats<'de, D>(deserializer: D) -> Result<Vec<OutputFormat>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut formats = Vec::<OutputFormat>::deserialize(deserializer)?;
    let mut seen = BTreeSet::new();
    formats.retain(|format| seen.insert(*format));
    Ok(formats)
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ArtifactsConfig {
    base_dir: Utf8PathBuf,
}
