// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Options describing the symmetric key produced by a derivation.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::errors::ProviderError;

/// Bit length of derived keys unless overridden.
pub const DEFAULT_SYMM_KEY_LENGTH: u32 = 256;
/// Algorithm of derived keys unless overridden.
pub const DEFAULT_SYMM_ALG: SymmAlg = SymmAlg::AesGcm;

/// Algorithm a derived key is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SymmAlg {
    #[default]
    #[serde(rename = "AES-GCM")]
    AesGcm,
    /// HMAC keyed with the hash algorithm used for the derivation.
    #[serde(rename = "HMAC")]
    Hmac,
}

impl SymmAlg {
    pub fn name(&self) -> &'static str {
        match self {
            SymmAlg::AesGcm => "AES-GCM",
            SymmAlg::Hmac => "HMAC",
        }
    }
}

impl fmt::Display for SymmAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SymmAlg {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AES-GCM" => Ok(SymmAlg::AesGcm),
            "HMAC" => Ok(SymmAlg::Hmac),
            _ => Err(ProviderError::NotSupported("unsupported key algorithm")),
        }
    }
}

/// Overrides for the derived key. Fields missing from a serialized form take
/// their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymmKeyOpts {
    /// Output length in bits.
    pub length: u32,
    pub alg: SymmAlg,
}

impl Default for SymmKeyOpts {
    fn default() -> Self {
        Self {
            length: DEFAULT_SYMM_KEY_LENGTH,
            alg: DEFAULT_SYMM_ALG,
        }
    }
}

impl SymmKeyOpts {
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    pub fn with_alg(mut self, alg: SymmAlg) -> Self {
        self.alg = alg;
        self
    }
}
