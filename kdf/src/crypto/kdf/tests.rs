// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::crypto::{
    aead::AeadKey,
    keys::{CryptoKey, KeyAlgorithm},
    mac::MacKey,
    secrets::SecretBytes,
};

use super::*;

const ZERO_IKM: [u8; 32] = [0; 32];
const ZERO_SALT: [u8; 16] = [0; 16];

async fn raw_key(ikm: &[u8], salt: &[u8], params: DeriveKeyParams) -> Vec<u8> {
    derive_key(ikm, salt, params)
        .await
        .unwrap()
        .export_raw()
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn known_vector_sha256() {
    let _ = tracing_subscriber::fmt::try_init();
    let key = raw_key(&ZERO_IKM, &ZERO_SALT, DeriveKeyParams::default()).await;
    assert_eq!(
        hex::encode(key),
        "4fe2362ce2b2795ecdf7894a8446f603e8f5ebe13cfd7bb2259de802379e3879"
    );
}

#[tokio::test]
async fn known_vector_sha512_differs() {
    let sha256 = raw_key(&ZERO_IKM, &ZERO_SALT, DeriveKeyParams::default()).await;
    let sha512 = raw_key(
        &ZERO_IKM,
        &ZERO_SALT,
        DeriveKeyParams::default().with_hash_alg(HashAlg::Sha512),
    )
    .await;
    assert_eq!(
        hex::encode(&sha512),
        "115dc910503692e88a8d9b31850eb5d1fa1ff4c1220a49c490551fc7d5c15a72"
    );
    assert_ne!(sha256, sha512);
}

#[tokio::test]
async fn derivation_is_deterministic() {
    let ikm = [0x42; 32];
    let salt = b"unique salt";
    let params = DeriveKeyParams::default().with_info("context");
    let first = raw_key(&ikm, salt, params.clone()).await;
    let second = raw_key(&ikm, salt, params).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn salt_and_info_change_output() {
    let ikm = [0x42; 32];
    let base = raw_key(&ikm, b"salt-a", DeriveKeyParams::default()).await;
    let other_salt = raw_key(&ikm, b"salt-b", DeriveKeyParams::default()).await;
    let other_info = raw_key(
        &ikm,
        b"salt-a",
        DeriveKeyParams::default().with_info("other-info"),
    )
    .await;
    assert_ne!(base, other_salt);
    assert_ne!(base, other_info);
}

#[tokio::test]
async fn default_key_encrypts_and_decrypts() {
    let key = derive_key(&ZERO_IKM, &ZERO_SALT, DeriveKeyParams::default())
        .await
        .unwrap();
    assert_eq!(key.algorithm(), KeyAlgorithm::AesGcm { length: 256 });
    assert_eq!(key.usages(), KeyUsage::Encrypt | KeyUsage::Decrypt);
    assert!(key.extractable());

    let ciphertext = key.encrypt(b"secret message".as_slice()).unwrap();
    assert_eq!(key.decrypt(&ciphertext).unwrap(), b"secret message");
}

#[tokio::test]
async fn encrypt_only_key_cannot_decrypt() {
    let params = DeriveKeyParams::default().with_usages(KeyUsage::Encrypt);
    let key = derive_key(&ZERO_IKM, &ZERO_SALT, params).await.unwrap();
    let ciphertext = key.encrypt(b"secret message".as_slice()).unwrap();
    assert!(matches!(
        key.decrypt(&ciphertext),
        Err(ProviderError::InvalidAccess(_))
    ));
}

#[tokio::test]
async fn shorter_key_is_a_prefix() {
    let opts = SymmKeyOpts::default().with_length(128);
    let key = derive_key(
        &ZERO_IKM,
        &ZERO_SALT,
        DeriveKeyParams::default().with_opts(opts),
    )
    .await
    .unwrap();
    assert_eq!(key.algorithm(), KeyAlgorithm::AesGcm { length: 128 });
    assert_eq!(
        hex::encode(key.export_raw().unwrap().as_slice()),
        "4fe2362ce2b2795ecdf7894a8446f603"
    );
}

#[tokio::test]
async fn hmac_key_signs() {
    let params = DeriveKeyParams::default()
        .with_hash_alg(HashAlg::Sha384)
        .with_usages(KeyUsage::Sign | KeyUsage::Verify)
        .with_opts(SymmKeyOpts::default().with_alg(SymmAlg::Hmac).with_length(384));
    let key = derive_key(&ZERO_IKM, &ZERO_SALT, params).await.unwrap();
    assert_eq!(
        key.algorithm(),
        KeyAlgorithm::Hmac {
            hash: HashAlg::Sha384,
            length: 384
        }
    );
    let tag = key.sign(b"data").unwrap();
    assert!(key.verify(b"data", &tag).unwrap());
}

#[tokio::test]
async fn provider_rejections_are_returned() {
    let empty_ikm = derive_key(&[], &ZERO_SALT, DeriveKeyParams::default()).await;
    assert!(matches!(empty_ikm, Err(ProviderError::Data(_))));

    let bad_length = DeriveKeyParams::default().with_opts(SymmKeyOpts::default().with_length(100));
    let result = derive_key(&ZERO_IKM, &ZERO_SALT, bad_length).await;
    assert!(matches!(result, Err(ProviderError::Operation(_))));

    // 512 bits is valid HKDF output, but not a valid AES key.
    let aes_512 = DeriveKeyParams::default().with_opts(SymmKeyOpts::default().with_length(512));
    let result = derive_key(&ZERO_IKM, &ZERO_SALT, aes_512).await;
    assert!(matches!(result, Err(ProviderError::Data(_))));

    let wrong_usage = DeriveKeyParams::default().with_usages(KeyUsage::Sign);
    let result = derive_key(&ZERO_IKM, &ZERO_SALT, wrong_usage).await;
    assert!(matches!(result, Err(ProviderError::Syntax(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_derivations_agree() {
    let expected = raw_key(&ZERO_IKM, &ZERO_SALT, DeriveKeyParams::default()).await;
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            tokio::spawn(async {
                raw_key(&ZERO_IKM, &ZERO_SALT, DeriveKeyParams::default()).await
            })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap(), expected);
    }
}

/// Provider that counts calls and forwards to [`RustCrypto`].
#[derive(Default)]
struct CountingProvider {
    imports: AtomicUsize,
    derivations: AtomicUsize,
}

#[async_trait]
impl CryptoProvider for CountingProvider {
    type Key = CryptoKey;
    type Error = ProviderError;

    async fn import_raw_key(
        &self,
        key_data: &[u8],
        algorithm: ImportAlgorithm,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<CryptoKey, ProviderError> {
        self.imports.fetch_add(1, Ordering::SeqCst);
        RustCrypto
            .import_raw_key(key_data, algorithm, extractable, usages)
            .await
    }

    async fn derive_bits(
        &self,
        params: HkdfParams<'_>,
        base_key: &CryptoKey,
        length: u32,
    ) -> Result<SecretBytes, ProviderError> {
        self.derivations.fetch_add(1, Ordering::SeqCst);
        RustCrypto.derive_bits(params, base_key, length).await
    }
}

#[tokio::test]
async fn custom_provider_sees_two_imports_and_one_derivation() {
    let provider = Arc::new(CountingProvider::default());
    let key = derive_key_with(
        provider.as_ref(),
        &ZERO_IKM,
        &ZERO_SALT,
        DeriveKeyParams::default(),
    )
    .await
    .unwrap();
    assert!(key.extractable());
    assert_eq!(provider.imports.load(Ordering::SeqCst), 2);
    assert_eq!(provider.derivations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_import_short_circuits() {
    let provider = CountingProvider::default();
    let result = derive_key_with(&provider, &[], &ZERO_SALT, DeriveKeyParams::default()).await;
    assert!(matches!(result, Err(ProviderError::Data(_))));
    assert_eq!(provider.imports.load(Ordering::SeqCst), 1);
    assert_eq!(provider.derivations.load(Ordering::SeqCst), 0);
}
