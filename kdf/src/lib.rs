// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Derivation of symmetric keys from high-entropy input keying material using
//! HKDF (RFC 5869).
//!
//! The actual primitives are delegated to a [`crypto::provider::CryptoProvider`].
//! The default provider, [`crypto::provider::RustCrypto`], is backed by the
//! RustCrypto `hkdf`, `hmac`, `sha2` and `aes-gcm` crates.

pub mod crypto;
pub mod settings;

pub use crypto::{
    hash::HashAlg,
    kdf::{DEFAULT_INFO, DeriveKeyParams, derive_key, derive_key_with},
    keys::{CryptoKey, KeyAlgorithm, KeyUsage, KeyUsages, SymmKey},
    symm::{SymmAlg, SymmKeyOpts},
};
