// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! AES-GCM encryption and decryption with derived keys. Keys must be bound to
//! the AES-GCM algorithm and carry the matching usage.

use aes_gcm::{
    Aes128Gcm, Aes256Gcm, AesGcm, KeyInit,
    aead::{Aead, AeadCore, Nonce, consts::U12},
    aes::Aes192,
};
pub use aes_gcm::aead::Payload;
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use super::{
    errors::ProviderError,
    keys::{CryptoKey, KeyAlgorithm, KeyUsage},
    secrets::random_array,
};

type Aes192Gcm = AesGcm<Aes192, U12>;

pub const AEAD_NONCE_SIZE: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AeadCiphertext {
    #[serde(with = "serde_bytes")]
    ciphertext: Vec<u8>,
    #[serde(with = "serde_bytes")]
    nonce: [u8; AEAD_NONCE_SIZE],
}

impl AeadCiphertext {
    pub fn new(ciphertext: Vec<u8>, nonce: [u8; AEAD_NONCE_SIZE]) -> Self {
        Self { ciphertext, nonce }
    }

    pub fn into_parts(self) -> (Vec<u8>, [u8; AEAD_NONCE_SIZE]) {
        let Self { ciphertext, nonce } = self;
        (ciphertext, nonce)
    }
}

/// A key that can be used with AES-GCM.
pub trait AeadKey {
    /// Encrypt the given plaintext. Generates a random nonce internally.
    fn encrypt<'msg, 'aad>(
        &self,
        plaintext: impl Into<Payload<'msg, 'aad>>,
    ) -> Result<AeadCiphertext, ProviderError>;

    /// Decrypt the given ciphertext (including the nonce).
    fn decrypt(&self, ciphertext: &AeadCiphertext) -> Result<Vec<u8>, ProviderError> {
        self.decrypt_with_aad(ciphertext, &[])
    }

    fn decrypt_with_aad(
        &self,
        ciphertext: &AeadCiphertext,
        aad: &[u8],
    ) -> Result<Vec<u8>, ProviderError>;
}

impl AeadKey for CryptoKey {
    #[instrument(level = "trace", skip_all, fields(algorithm = ?self.algorithm()))]
    fn encrypt<'msg, 'aad>(
        &self,
        plaintext: impl Into<Payload<'msg, 'aad>>,
    ) -> Result<AeadCiphertext, ProviderError> {
        let length = aes_gcm_length(self)?;
        let key = self.material_for(KeyUsage::Encrypt)?;
        let nonce = random_array::<AEAD_NONCE_SIZE>()?;
        let payload = plaintext.into();
        let ciphertext = match length {
            128 => seal::<Aes128Gcm>(key, &nonce, payload),
            192 => seal::<Aes192Gcm>(key, &nonce, payload),
            _ => seal::<Aes256Gcm>(key, &nonce, payload),
        }?;
        Ok(AeadCiphertext { ciphertext, nonce })
    }

    #[instrument(level = "trace", skip_all, fields(algorithm = ?self.algorithm()))]
    fn decrypt_with_aad(
        &self,
        ciphertext: &AeadCiphertext,
        aad: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        let length = aes_gcm_length(self)?;
        let key = self.material_for(KeyUsage::Decrypt)?;
        let payload = Payload {
            msg: ciphertext.ciphertext.as_slice(),
            aad,
        };
        match length {
            128 => open::<Aes128Gcm>(key, &ciphertext.nonce, payload),
            192 => open::<Aes192Gcm>(key, &ciphertext.nonce, payload),
            _ => open::<Aes256Gcm>(key, &ciphertext.nonce, payload),
        }
    }
}

fn aes_gcm_length(key: &CryptoKey) -> Result<u32, ProviderError> {
    match key.algorithm() {
        KeyAlgorithm::AesGcm { length } => Ok(length),
        _ => Err(ProviderError::InvalidAccess("key is not an AES-GCM key")),
    }
}

fn seal<C>(
    key: &[u8],
    nonce: &[u8; AEAD_NONCE_SIZE],
    payload: Payload,
) -> Result<Vec<u8>, ProviderError>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key).map_err(|_| ProviderError::Data("invalid AES key"))?;
    // The Aead trait surfaces an error, but it's not clear under which
    // circumstances it would actually fail.
    cipher
        .encrypt(&Nonce::<C>::from(*nonce), payload)
        .map_err(|_| ProviderError::Operation("encryption failed"))
}

fn open<C>(
    key: &[u8],
    nonce: &[u8; AEAD_NONCE_SIZE],
    payload: Payload,
) -> Result<Vec<u8>, ProviderError>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key).map_err(|_| ProviderError::Data("invalid AES key"))?;
    cipher.decrypt(&Nonce::<C>::from(*nonce), payload).map_err(|e| {
        error!(%e, "Decryption error");
        ProviderError::Operation("decryption failed")
    })
}
