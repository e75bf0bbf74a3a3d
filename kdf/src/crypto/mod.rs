// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! A module that provides key derivation via HKDF, the key objects it
//! produces and the operations these keys can be used for (AEAD and MACs).
//!
//! All primitives go through a [`provider::CryptoProvider`], so callers can
//! swap the backend without touching the derivation logic.

pub mod aead;
pub mod errors;
pub mod hash;
pub mod kdf;
pub mod keys;
pub mod mac;
pub mod provider;
pub mod secrets;
pub mod symm;
