// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session errors.

/// Failure of a [`Session`](crate::Session) operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The operation needs an attached root.
    #[error("no navigation root is attached")]
    Detached,
    /// The root handle passed to `attach_root` is not live in its tree.
    #[error("navigation root is not a live element")]
    StaleRoot,
}
