// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! HMAC tags computed with derived keys.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use tracing::instrument;

use super::{
    errors::ProviderError,
    hash::HashAlg,
    keys::{CryptoKey, KeyAlgorithm, KeyUsage},
};

/// A key that can be used to compute and verify HMAC tags.
pub trait MacKey {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, ProviderError>;

    /// Verify `tag` over `data` in constant time. Returns `false` if the tag
    /// does not match.
    fn verify(&self, data: &[u8], tag: &[u8]) -> Result<bool, ProviderError>;
}

impl MacKey for CryptoKey {
    #[instrument(level = "trace", skip_all, fields(algorithm = ?self.algorithm()))]
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, ProviderError> {
        let hash = hmac_hash(self)?;
        let key = self.material_for(KeyUsage::Sign)?;
        let tag = match hash {
            HashAlg::Sha256 => new_mac::<Hmac<Sha256>>(key, data)?
                .finalize()
                .into_bytes()
                .to_vec(),
            HashAlg::Sha384 => new_mac::<Hmac<Sha384>>(key, data)?
                .finalize()
                .into_bytes()
                .to_vec(),
            HashAlg::Sha512 => new_mac::<Hmac<Sha512>>(key, data)?
                .finalize()
                .into_bytes()
                .to_vec(),
        };
        Ok(tag)
    }

    #[instrument(level = "trace", skip_all, fields(algorithm = ?self.algorithm()))]
    fn verify(&self, data: &[u8], tag: &[u8]) -> Result<bool, ProviderError> {
        let hash = hmac_hash(self)?;
        let key = self.material_for(KeyUsage::Verify)?;
        let verified = match hash {
            HashAlg::Sha256 => new_mac::<Hmac<Sha256>>(key, data)?.verify_slice(tag),
            HashAlg::Sha384 => new_mac::<Hmac<Sha384>>(key, data)?.verify_slice(tag),
            HashAlg::Sha512 => new_mac::<Hmac<Sha512>>(key, data)?.verify_slice(tag),
        };
        Ok(verified.is_ok())
    }
}

fn hmac_hash(key: &CryptoKey) -> Result<HashAlg, ProviderError> {
    match key.algorithm() {
        KeyAlgorithm::Hmac { hash, .. } => Ok(hash),
        _ => Err(ProviderError::InvalidAccess("key is not an HMAC key")),
    }
}

fn new_mac<M: Mac + hmac::digest::KeyInit>(key: &[u8], data: &[u8]) -> Result<M, ProviderError> {
    let mut mac = <M as Mac>::new_from_slice(key)
        .map_err(|_| ProviderError::Data("invalid HMAC key"))?;
    mac.update(data);
    Ok(mac)
}
