// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The boundary to the cryptography backend. A [`CryptoProvider`] imports raw
//! key material and derives bits from HKDF base keys; everything else in this
//! crate is built on these two operations.

use async_trait::async_trait;
use enumset::{EnumSet, enum_set};
use hkdf::Hkdf;
use sha2::{Sha256, Sha384, Sha512};
use tracing::instrument;

use super::{
    errors::ProviderError,
    hash::HashAlg,
    keys::{CryptoKey, KeyAlgorithm, KeyUsage, KeyUsages},
    secrets::SecretBytes,
};

/// Algorithm requested when importing raw key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportAlgorithm {
    Hkdf,
    AesGcm,
    Hmac { hash: HashAlg },
}

/// Parameters of an HKDF bit derivation.
#[derive(Debug, Clone, Copy)]
pub struct HkdfParams<'a> {
    pub hash: HashAlg,
    pub salt: &'a [u8],
    pub info: &'a [u8],
}

#[async_trait]
pub trait CryptoProvider {
    type Key: Send + Sync;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Import `key_data` as a key of the given algorithm, restricted to
    /// `usages`.
    async fn import_raw_key(
        &self,
        key_data: &[u8],
        algorithm: ImportAlgorithm,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<Self::Key, Self::Error>;

    /// Run HKDF over `base_key` and return `length` bits of output key
    /// material.
    async fn derive_bits(
        &self,
        params: HkdfParams<'_>,
        base_key: &Self::Key,
        length: u32,
    ) -> Result<SecretBytes, Self::Error>;
}

const HKDF_USAGES: EnumSet<KeyUsage> = enum_set!(KeyUsage::DeriveKey | KeyUsage::DeriveBits);
const AES_GCM_USAGES: EnumSet<KeyUsage> =
    enum_set!(KeyUsage::Encrypt | KeyUsage::Decrypt | KeyUsage::WrapKey | KeyUsage::UnwrapKey);
const HMAC_USAGES: EnumSet<KeyUsage> = enum_set!(KeyUsage::Sign | KeyUsage::Verify);

/// Provider backed by the RustCrypto crates. It follows the rules of the Web
/// Crypto API for key imports and HKDF derivations.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustCrypto;

impl RustCrypto {
    pub fn new() -> Self {
        RustCrypto
    }
}

#[async_trait]
impl CryptoProvider for RustCrypto {
    type Key = CryptoKey;
    type Error = ProviderError;

    #[instrument(level = "trace", skip_all, fields(algorithm = ?algorithm, extractable = extractable))]
    async fn import_raw_key(
        &self,
        key_data: &[u8],
        algorithm: ImportAlgorithm,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<CryptoKey, ProviderError> {
        if usages.is_empty() {
            return Err(ProviderError::Syntax("usages must not be empty"));
        }
        let key_algorithm = match algorithm {
            ImportAlgorithm::Hkdf => {
                if extractable {
                    return Err(ProviderError::Syntax("HKDF keys cannot be extractable"));
                }
                check_usages(usages, HKDF_USAGES)?;
                if key_data.is_empty() {
                    return Err(ProviderError::Data("key data must not be empty"));
                }
                KeyAlgorithm::Hkdf
            }
            ImportAlgorithm::AesGcm => {
                check_usages(usages, AES_GCM_USAGES)?;
                if !matches!(key_data.len(), 16 | 24 | 32) {
                    return Err(ProviderError::Data("AES key must be 128, 192 or 256 bits"));
                }
                KeyAlgorithm::AesGcm {
                    length: bit_length(key_data),
                }
            }
            ImportAlgorithm::Hmac { hash } => {
                check_usages(usages, HMAC_USAGES)?;
                if key_data.is_empty() {
                    return Err(ProviderError::Data("key data must not be empty"));
                }
                KeyAlgorithm::Hmac {
                    hash,
                    length: bit_length(key_data),
                }
            }
        };
        Ok(CryptoKey::new(
            key_algorithm,
            extractable,
            usages,
            SecretBytes::from(key_data),
        ))
    }

    #[instrument(level = "trace", skip_all, fields(hash = %params.hash, length = length))]
    async fn derive_bits(
        &self,
        params: HkdfParams<'_>,
        base_key: &CryptoKey,
        length: u32,
    ) -> Result<SecretBytes, ProviderError> {
        if base_key.algorithm() != KeyAlgorithm::Hkdf {
            return Err(ProviderError::InvalidAccess("base key is not an HKDF key"));
        }
        let ikm = base_key.material_for(KeyUsage::DeriveBits)?;
        if length == 0 || length % 8 != 0 {
            return Err(ProviderError::Operation(
                "length must be a non-zero multiple of 8",
            ));
        }
        let mut okm = vec![0u8; (length / 8) as usize];
        let HkdfParams { hash, salt, info } = params;
        let result = match hash {
            HashAlg::Sha256 => Hkdf::<Sha256>::new(Some(salt), ikm).expand(info, &mut okm),
            HashAlg::Sha384 => Hkdf::<Sha384>::new(Some(salt), ikm).expand(info, &mut okm),
            HashAlg::Sha512 => Hkdf::<Sha512>::new(Some(salt), ikm).expand(info, &mut okm),
        };
        let okm = SecretBytes::from(okm);
        result.map_err(|_| ProviderError::Operation("length exceeds the HKDF output limit"))?;
        Ok(okm)
    }
}

fn check_usages(usages: KeyUsages, allowed: KeyUsages) -> Result<(), ProviderError> {
    if allowed.is_superset(usages) {
        Ok(())
    } else {
        Err(ProviderError::Syntax("usages not permitted for algorithm"))
    }
}

fn bit_length(key_data: &[u8]) -> u32 {
    (key_data.len() * 8) as u32
}
