use crate::cli::Cli;
use crate::error::{CliError, Result};
use molfile::core::io::mol::{ReadOptions, WriteOptions};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

const INITIALS_WIDTH: usize = 2;
const PROGRAM_NAME_WIDTH: usize = 8;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialReadConfig {
    #[serde(rename = "legacy-version-fallback")]
    legacy_version_fallback: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialWriteConfig {
    #[serde(rename = "molecule-name")]
    molecule_name: Option<String>,
    initials: Option<String>,
    program: Option<String>,
    comment: Option<String>,
    timestamp: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAppConfig {
    read: Option<PartialReadConfig>,
    write: Option<PartialWriteConfig>,
}

/// Codec options after merging the config file, `-S` overrides and flags.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub read: ReadOptions,
    pub write: WriteOptions,
}

impl PartialAppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads `path` if given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    pub fn merge_with_cli(mut self, cli: &Cli) -> Result<AppConfig> {
        self.apply_set_values(&cli.set_values)?;

        let read_file = self.read.take().unwrap_or_default();
        let write_file = self.write.take().unwrap_or_default();

        let read = ReadOptions::builder()
            .legacy_version_fallback(
                cli.legacy_version_fallback || read_file.legacy_version_fallback.unwrap_or(false),
            )
            .build();

        let mut builder = WriteOptions::builder();
        if let Some(name) = write_file.molecule_name {
            builder = builder.molecule_name(name);
        }
        if let Some(initials) = write_file.initials {
            if initials.chars().count() > INITIALS_WIDTH {
                return Err(CliError::Config(format!(
                    "`write.initials` must be at most {} characters, got '{}'",
                    INITIALS_WIDTH, initials
                )));
            }
            builder = builder.initials(initials);
        }
        if let Some(program) = write_file.program {
            if program.chars().count() > PROGRAM_NAME_WIDTH {
                return Err(CliError::Config(format!(
                    "`write.program` must be at most {} characters, got '{}'",
                    PROGRAM_NAME_WIDTH, program
                )));
            }
            builder = builder.program(program);
        }
        if let Some(comment) = write_file.comment {
            builder = builder.comment(comment);
        }
        if write_file.timestamp.unwrap_or(true) {
            builder = builder.stamped_now();
        }

        Ok(AppConfig {
            read,
            write: builder.build(),
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let parse_bool = || {
                value_str.parse::<bool>().map_err(|_| {
                    CliError::Config(format!("Invalid boolean value for {}: {}", key, value_str))
                })
            };

            match key {
                "read.legacy-version-fallback" => {
                    self.read
                        .get_or_insert_with(Default::default)
                        .legacy_version_fallback = Some(parse_bool()?);
                }
                "write.molecule-name" => {
                    self.write.get_or_insert_with(Default::default).molecule_name =
                        Some(value_str.to_string());
                }
                "write.initials" => {
                    self.write.get_or_insert_with(Default::default).initials =
                        Some(value_str.to_string());
                }
                "write.program" => {
                    self.write.get_or_insert_with(Default::default).program =
                        Some(value_str.to_string());
                }
                "write.comment" => {
                    self.write.get_or_insert_with(Default::default).comment =
                        Some(value_str.to_string());
                }
                "write.timestamp" => {
                    self.write.get_or_insert_with(Default::default).timestamp =
                        Some(parse_bool()?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
