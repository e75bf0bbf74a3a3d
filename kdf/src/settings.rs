// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Derivation defaults loaded from configuration files and the environment.

use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat, Source};
use serde::Deserialize;

use crate::crypto::{
    hash::HashAlg,
    kdf::{DEFAULT_INFO, DeriveKeyParams},
    keys::{KeyUsages, default_usages},
    symm::{DEFAULT_SYMM_ALG, DEFAULT_SYMM_KEY_LENGTH, SymmAlg, SymmKeyOpts},
};

const ENV_PREFIX: &str = "AIRKDF";

/// Settings for key derivations. Missing fields take the library defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DerivationSettings {
    pub info: String,
    pub hash: HashAlg,
    pub usages: KeyUsages,
    /// Length of derived keys in bits.
    pub length: u32,
    pub alg: SymmAlg,
}

impl Default for DerivationSettings {
    fn default() -> Self {
        Self {
            info: DEFAULT_INFO.to_owned(),
            hash: HashAlg::default(),
            usages: default_usages(),
            length: DEFAULT_SYMM_KEY_LENGTH,
            alg: DEFAULT_SYMM_ALG,
        }
    }
}

impl DerivationSettings {
    pub fn into_params(self) -> DeriveKeyParams {
        DeriveKeyParams {
            info: self.info,
            hash_alg: self.hash,
            usages: self.usages,
            opts: SymmKeyOpts {
                length: self.length,
                alg: self.alg,
            },
        }
    }
}

impl From<DerivationSettings> for DeriveKeyParams {
    fn from(settings: DerivationSettings) -> Self {
        settings.into_params()
    }
}

/// Load the settings from `base.yaml` and the optional file named after the
/// running environment (`AIRKDF_ENVIRONMENT`, default `local`) in the given
/// directory.
pub fn get_settings(configuration_directory: &Path) -> Result<DerivationSettings, ConfigError> {
    let environment = std::env::var(format!("{ENV_PREFIX}_ENVIRONMENT"))
        .unwrap_or_else(|_| "local".into())
        .to_lowercase();

    get_settings_impl(
        File::from(configuration_directory.join("base")).required(true),
        File::from(configuration_directory.join(environment)).required(false),
        ENV_PREFIX,
    )
}

/// Load the settings from the given configuration strings (in YAML format).
pub fn get_settings_from_str(
    base: &str,
    environment: &str,
) -> Result<DerivationSettings, ConfigError> {
    get_settings_impl(
        File::from_str(base, FileFormat::Yaml),
        File::from_str(environment, FileFormat::Yaml),
        ENV_PREFIX,
    )
}

fn get_settings_impl(
    base: impl Source + Send + Sync + 'static,
    environment: impl Source + Send + Sync + 'static,
    env_prefix: &str,
) -> Result<DerivationSettings, ConfigError> {
    let builder = Config::builder()
        .add_source(base)
        // Layer on the environment-specific values.
        .add_source(environment)
        // E.g. `AIRKDF_LENGTH=128` sets `DerivationSettings.length`.
        .add_source(Environment::with_prefix(env_prefix).separator("_"));
    builder.build()?.try_deserialize()
}
