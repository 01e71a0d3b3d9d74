// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Why a [`CollectorBuilder`](crate::CollectorBuilder) refused to build.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConfigError {
    /// No `on_change` callback was supplied.
    MissingOnChange,
    /// No clock was supplied and no default clock is available.
    ///
    /// Only returned when the `std` feature is disabled.
    MissingClock,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOnChange => f.write_str("collector requires an on_change callback"),
            Self::MissingClock => {
                f.write_str("collector requires a clock when built without the `std` feature")
            }
        }
    }
}

impl core::error::Error for ConfigError {}
