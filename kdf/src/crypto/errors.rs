// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use thiserror::Error;

/// Rejection by the cryptography provider.
///
/// The variants follow the exception names of the Web Crypto API, so that
/// keys derived here behave like keys derived by a browser or Node runtime.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ProviderError {
    /// The requested algorithm or hash is not supported.
    #[error("Not supported: {0}")]
    NotSupported(&'static str),
    /// The parameters are malformed, e.g. usages not allowed for the algorithm.
    #[error("Syntax error: {0}")]
    Syntax(&'static str),
    /// The key data is invalid for the algorithm.
    #[error("Data error: {0}")]
    Data(&'static str),
    /// The key may not be used for the requested operation.
    #[error("Invalid access: {0}")]
    InvalidAccess(&'static str),
    /// The operation itself failed.
    #[error("Operation error: {0}")]
    Operation(&'static str),
}

#[derive(Debug, Error)]
pub enum RandomnessError {
    #[error("Insufficient randomness")]
    InsufficientRandomness,
}

impl From<RandomnessError> for ProviderError {
    fn from(_: RandomnessError) -> Self {
        ProviderError::Operation("insufficient randomness")
    }
}
