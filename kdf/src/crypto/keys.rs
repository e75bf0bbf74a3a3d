// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Key objects handed out by the [`RustCrypto`](super::provider::RustCrypto)
//! provider. A key carries its algorithm, the operations it may be used for
//! and whether its raw material may be exported.

use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};

use super::{errors::ProviderError, hash::HashAlg, secrets::SecretBytes};

#[derive(Debug, EnumSetType, Serialize, Deserialize)]
#[enumset(serialize_repr = "list")]
#[serde(rename_all = "camelCase")]
pub enum KeyUsage {
    Encrypt,
    Decrypt,
    Sign,
    Verify,
    DeriveKey,
    DeriveBits,
    WrapKey,
    UnwrapKey,
}

pub type KeyUsages = EnumSet<KeyUsage>;

/// Usages of a derived key unless overridden.
pub fn default_usages() -> KeyUsages {
    KeyUsage::Encrypt | KeyUsage::Decrypt
}

/// Algorithm a key is bound to, including its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum KeyAlgorithm {
    #[serde(rename = "HKDF")]
    Hkdf,
    #[serde(rename = "AES-GCM")]
    AesGcm { length: u32 },
    #[serde(rename = "HMAC")]
    Hmac { hash: HashAlg, length: u32 },
}

impl KeyAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            KeyAlgorithm::Hkdf => "HKDF",
            KeyAlgorithm::AesGcm { .. } => "AES-GCM",
            KeyAlgorithm::Hmac { .. } => "HMAC",
        }
    }
}

/// Opaque key handle.
pub struct CryptoKey {
    algorithm: KeyAlgorithm,
    extractable: bool,
    usages: KeyUsages,
    material: SecretBytes,
}

/// A key derived for symmetric use.
pub type SymmKey = CryptoKey;

impl CryptoKey {
    pub(crate) fn new(
        algorithm: KeyAlgorithm,
        extractable: bool,
        usages: KeyUsages,
        material: SecretBytes,
    ) -> Self {
        Self {
            algorithm,
            extractable,
            usages,
            material,
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn extractable(&self) -> bool {
        self.extractable
    }

    pub fn usages(&self) -> KeyUsages {
        self.usages
    }

    pub fn has_usage(&self, usage: KeyUsage) -> bool {
        self.usages.contains(usage)
    }

    /// Export the raw key material. Fails if the key is not extractable.
    pub fn export_raw(&self) -> Result<SecretBytes, ProviderError> {
        if !self.extractable {
            return Err(ProviderError::InvalidAccess("key is not extractable"));
        }
        Ok(self.material.clone())
    }

    /// Returns the material if the key is bound to `usage`.
    pub(crate) fn material_for(&self, usage: KeyUsage) -> Result<&SecretBytes, ProviderError> {
        if !self.has_usage(usage) {
            return Err(ProviderError::InvalidAccess(
                "key usages do not permit this operation",
            ));
        }
        Ok(&self.material)
    }
}

impl std::fmt::Debug for CryptoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoKey")
            .field("algorithm", &self.algorithm)
            .field("extractable", &self.extractable)
            .field("usages", &self.usages)
            .field("material", &self.material)
            .finish()
    }
}
