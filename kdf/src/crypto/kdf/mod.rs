// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Derivation of symmetric keys from input keying material (IKM) with HKDF.
//!
//! The IKM must be key material with high entropy; passwords are neither
//! recommended nor safe. The salt is a non-secret value that should be unique
//! for every derived key. Neither property is checked here.

#[cfg(test)]
mod tests;

use tracing::instrument;

use super::{
    hash::HashAlg,
    keys::{KeyUsage, KeyUsages, SymmKey, default_usages},
    provider::{CryptoProvider, HkdfParams, ImportAlgorithm, RustCrypto},
    symm::{SymmAlg, SymmKeyOpts},
};
use crate::crypto::errors::ProviderError;

/// Info string used for the HKDF-Expand step unless overridden.
pub const DEFAULT_INFO: &str = "default-info";

/// Optional inputs of a derivation, with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeriveKeyParams {
    /// Context and application specific information.
    pub info: String,
    pub hash_alg: HashAlg,
    /// Operations the derived key may be used for.
    pub usages: KeyUsages,
    pub opts: SymmKeyOpts,
}

impl Default for DeriveKeyParams {
    fn default() -> Self {
        Self {
            info: DEFAULT_INFO.to_owned(),
            hash_alg: HashAlg::default(),
            usages: default_usages(),
            opts: SymmKeyOpts::default(),
        }
    }
}

impl DeriveKeyParams {
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn with_hash_alg(mut self, hash_alg: HashAlg) -> Self {
        self.hash_alg = hash_alg;
        self
    }

    pub fn with_usages(mut self, usages: impl Into<KeyUsages>) -> Self {
        self.usages = usages.into();
        self
    }

    pub fn with_opts(mut self, opts: SymmKeyOpts) -> Self {
        self.opts = opts;
        self
    }

    fn output_algorithm(&self) -> ImportAlgorithm {
        match self.opts.alg {
            SymmAlg::AesGcm => ImportAlgorithm::AesGcm,
            SymmAlg::Hmac => ImportAlgorithm::Hmac {
                hash: self.hash_alg,
            },
        }
    }
}

/// Derive a symmetric key from `ikm` and `salt` with the [`RustCrypto`]
/// provider.
pub async fn derive_key(
    ikm: &[u8],
    salt: &[u8],
    params: DeriveKeyParams,
) -> Result<SymmKey, ProviderError> {
    derive_key_with(&RustCrypto, ikm, salt, params).await
}

/// Derive a symmetric key from `ikm` and `salt` with the given provider.
///
/// The IKM is imported as a non-extractable HKDF key that can only derive bits.
/// HKDF output of `params.opts.length` bits is then imported as an extractable
/// key of `params.opts.alg`, restricted to `params.usages`. Any rejection by
/// the provider is returned as is.
#[instrument(level = "trace", skip_all, fields(
    hash_alg = %params.hash_alg,
    alg = %params.opts.alg,
    length = params.opts.length,
))]
pub async fn derive_key_with<P>(
    provider: &P,
    ikm: &[u8],
    salt: &[u8],
    params: DeriveKeyParams,
) -> Result<P::Key, P::Error>
where
    P: CryptoProvider + ?Sized,
{
    let base_key = provider
        .import_raw_key(ikm, ImportAlgorithm::Hkdf, false, KeyUsage::DeriveBits.into())
        .await?;
    let hkdf_params = HkdfParams {
        hash: params.hash_alg,
        salt,
        info: params.info.as_bytes(),
    };
    let bits = provider
        .derive_bits(hkdf_params, &base_key, params.opts.length)
        .await?;
    provider
        .import_raw_key(&bits, params.output_algorithm(), true, params.usages)
        .await
}
