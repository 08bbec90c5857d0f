// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! pt-core: Shared types for the prodq production-entry client
//!
//! This crate provides the production record payload, client-side local
//! identifiers, and the clock abstraction used to mint them.

pub mod clock;
pub mod entry;
pub mod error;
pub mod local_id;

pub use clock::{ClockSource, SystemClock};
pub use entry::{parse_date, ProductionEntry, RemoteRecord, Shift};
pub use error::{Error, Result};
pub use local_id::{LocalId, LocalIdGenerator};
