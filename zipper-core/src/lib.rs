// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared error types and the abortable [`Ticket`] primitive used by the
//! zipper merge engine, its bounded channel, and the graph runtime that
//! drives both.

pub mod error;
pub mod ticket;

pub use error::{Result, ZipperError};
pub use ticket::Ticket;
