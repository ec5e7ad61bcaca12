// Copyright 2023 The Pigweed Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

//! `pw_log` is a small logging facade for firmware and the host tools that
//! exercise it.
//!
//! Clients import and use the logging macros; the line is handed to a
//! backend together with its [`LogLevel`].  Host builds print to standard
//! output.  Bare-metal builds (`target_os = "none"`) expect the final binary
//! to provide the backend:
//!
//! ```ignore
//! #[unsafe(no_mangle)]
//! fn pw_log_backend_write(level: pw_log::LogLevel, args: core::fmt::Arguments<'_>) {
//!     // Write `args` to the console.
//! }
//! ```
//!
//! Format strings use [`core::fmt`] syntax:
//!
//! ```ignore
//! pw_log::info!("configured {} regions", 4);
//! pw_log::debug!("RBAR {:#010x}", 0x1000_u32);
//! ```
#![cfg_attr(target_os = "none", no_std)]
#![deny(missing_docs)]

use core::fmt;

/// Severity of a log line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u8)]
pub enum LogLevel {
    /// Detailed diagnostics such as decoded register values.
    Debug = 1,
    /// Milestones of normal operation.
    Info = 2,
    /// Unexpected but tolerated conditions.
    Warn = 3,
    /// Failed operations.
    Error = 4,
    /// Conditions that compromise the system.
    Critical = 5,
    // Level 6 is not defined in order to match the protobuf definition.
    /// Unrecoverable conditions; emitted right before the system halts.
    Fatal = 7,
}

/// Short tag printed in front of each log line.
pub const fn log_level_tag(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "DBG",
        LogLevel::Info => "INF",
        LogLevel::Warn => "WRN",
        LogLevel::Error => "ERR",
        LogLevel::Critical => "CRT",
        LogLevel::Fatal => "FTL",
    }
}

#[cfg(not(target_os = "none"))]
mod backend {
    use super::{LogLevel, fmt, log_level_tag};

    #[inline]
    pub fn write(level: LogLevel, args: fmt::Arguments<'_>) {
        std::println!("[{}] {}", log_level_tag(level), args);
    }
}

#[cfg(target_os = "none")]
mod backend {
    use super::{LogLevel, fmt};

    unsafe extern "Rust" {
        fn pw_log_backend_write(level: LogLevel, args: fmt::Arguments<'_>);
    }

    #[inline]
    pub fn write(level: LogLevel, args: fmt::Arguments<'_>) {
        // SAFETY: The symbol is provided by the target and has the declared
        // signature.
        unsafe { pw_log_backend_write(level, args) }
    }
}

// Re-export dependences of `pw_log` macros to be accessed via `$crate::__private`.
#[doc(hidden)]
pub mod __private {
    use super::{LogLevel, fmt};

    #[inline]
    pub fn write(level: LogLevel, args: fmt::Arguments<'_>) {
        super::backend::write(level, args)
    }
}

/// Emit a log line at `level`.
#[macro_export]
macro_rules! pw_log {
    ($log_level:expr, $($args:tt)+) => {{
        $crate::__private::write($log_level, ::core::format_args!($($args)+))
    }};
}

/// Emit a log line at [`LogLevel::Debug`].
#[macro_export]
macro_rules! debug {
    ($($args:tt)+) => {
        $crate::pw_log!($crate::LogLevel::Debug, $($args)+)
    };
}

/// Emit a log line at [`LogLevel::Info`].
#[macro_export]
macro_rules! info {
    ($($args:tt)+) => {
        $crate::pw_log!($crate::LogLevel::Info, $($args)+)
    };
}

/// Emit a log line at [`LogLevel::Warn`].
#[macro_export]
macro_rules! warn {
    ($($args:tt)+) => {
        $crate::pw_log!($crate::LogLevel::Warn, $($args)+)
    };
}

/// Emit a log line at [`LogLevel::Error`].
#[macro_export]
macro_rules! error {
    ($($args:tt)+) => {
        $crate::pw_log!($crate::LogLevel::Error, $($args)+)
    };
}

/// Emit a log line at [`LogLevel::Critical`].
#[macro_export]
macro_rules! critical {
    ($($args:tt)+) => {
        $crate::pw_log!($crate::LogLevel::Critical, $($args)+)
    };
}

/// Emit a log line at [`LogLevel::Fatal`].
#[macro_export]
macro_rules! fatal {
    ($($args:tt)+) => {
        $crate::pw_log!($crate::LogLevel::Fatal, $($args)+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_three_characters() {
        for level in [
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
            LogLevel::Critical,
            LogLevel::Fatal,
        ] {
            assert_eq!(log_level_tag(level).len(), 3);
        }
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Critical < LogLevel::Fatal);
        assert_eq!(LogLevel::Fatal as u8, 7);
    }

    #[test]
    fn macros_accept_format_arguments() {
        debug!("plain");
        info!("{} regions", 4);
        warn!("{:#010x}", 0x1000_u32);
        error!("{}: {}", "pair", 3);
        critical!("critical {}", true);
        fatal!("fatal");
    }
}
