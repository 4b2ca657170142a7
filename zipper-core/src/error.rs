// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types shared by the merge engine, the bounded channel and the
//! graph runtime that drives them.
//!
//! Operational errors ([`ZipperError::Empty`]) are returned from hot-path
//! calls that callers are expected to guard with `empty()`/`size()`; they
//! never indicate a bug in the caller's configuration. Configuration
//! errors surface only from graph construction, before any simulation
//! tick runs, and are always fatal to the run.
//!
//! # Examples
//!
//! ```
//! use zipper_core::{Result, ZipperError};
//!
//! fn drain_one() -> Result<u64> {
//!     Err(ZipperError::Empty)
//! }
//! ```

/// Root error type for zipper operations.
#[derive(Debug, thiserror::Error)]
pub enum ZipperError {
    /// `peek`/`drain` called on a queue with no resident nodes.
    #[error("merge queue is empty")]
    Empty,

    /// An edge in the graph configuration references a port index that
    /// does not exist on its endpoint node.
    #[error("edge {edge} references port {port} on node `{node}`, which has no such port")]
    OutOfBoundsPort {
        /// Descriptor of the offending edge, e.g. `"tail:src.0 -> head:sink.0"`.
        edge: String,
        /// Name of the node the out-of-range port belongs to.
        node: String,
        /// The offending port index.
        port: usize,
    },

    /// A node or distribution name was referenced before it was declared.
    #[error("{kind} `{name}` referenced before declaration")]
    UndeclaredReference {
        /// What kind of thing was referenced (`"node"`, `"distribution"`, ...).
        kind: &'static str,
        /// The undeclared name.
        name: String,
    },

    /// The configuration document itself could not be parsed or is
    /// structurally invalid.
    #[error("malformed configuration: {context}")]
    Malformed {
        /// Human-readable description of what was wrong.
        context: String,
    },
}

impl ZipperError {
    /// Build an [`ZipperError::OutOfBoundsPort`].
    pub fn out_of_bounds_port(
        edge: impl Into<String>,
        node: impl Into<String>,
        port: usize,
    ) -> Self {
        Self::OutOfBoundsPort {
            edge: edge.into(),
            node: node.into(),
            port,
        }
    }

    /// Build an [`ZipperError::UndeclaredReference`].
    pub fn undeclared(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UndeclaredReference {
            kind,
            name: name.into(),
        }
    }

    /// Build a [`ZipperError::Malformed`].
    pub fn malformed(context: impl Into<String>) -> Self {
        Self::Malformed {
            context: context.into(),
        }
    }

    /// Configuration errors terminate the program before the first tick;
    /// the operational [`Self::Empty`] does not.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Specialized `Result` for zipper operations.
pub type Result<T> = std::result::Result<T, ZipperError>;
