// Copyright 2025 The Pigweed Authors
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

//! Fatal assertions.
//!
//! A failed assertion logs at fatal level and then calls
//! `pw_assert_HandleFailure()`, which the target provides and which must not
//! return (typically it resets or halts the device).  Host builds unwind
//! through `std::panic!` instead so tests can observe the failure.
#![cfg_attr(target_os = "none", no_std)]

#[cfg(target_os = "none")]
unsafe extern "C" {
    pub fn pw_assert_HandleFailure() -> !;
}

// Re-export pw_log for use by panic/assert macros.
#[doc(hidden)]
pub mod __private {
    pub use pw_log::fatal;

    #[cfg(target_os = "none")]
    #[inline]
    pub fn handle_failure() -> ! {
        // SAFETY: The target provides the handler; it takes no arguments and
        // never returns.
        unsafe { super::pw_assert_HandleFailure() }
    }

    #[cfg(not(target_os = "none"))]
    #[inline]
    pub fn handle_failure() -> ! {
        std::panic!("pw_assert failure")
    }
}

#[macro_export]
macro_rules! panic {
  ($format_string:literal $(,)?) => {{
      $crate::__private::fatal!($format_string);
      $crate::__private::handle_failure()
  }};

  ($format_string:literal, $($args:expr),* $(,)?) => {{
      $crate::__private::fatal!($format_string, $($args),*);
      $crate::__private::handle_failure()
  }};
}

#[macro_export]
macro_rules! assert {
  ($condition:expr $(,)?) => {{
      if !$condition {
          $crate::__private::fatal!("assert!() failed: {}", ::core::stringify!($condition));
          $crate::__private::handle_failure()
      }
  }};

  ($condition:expr, $($args:expr),* $(,)?) => {{
      if !$condition {
          $crate::__private::fatal!("assert!() failed: {}", ::core::stringify!($condition));
          $crate::__private::fatal!($($args),*);
          $crate::__private::handle_failure()
      }
  }};
}

#[macro_export]
macro_rules! ne {
  ($condition_a:expr, $condition_b:expr $(,)?) => {{
      let a = &$condition_a;
      let b = &$condition_b;
      if *a == *b {
          $crate::__private::fatal!("assert_ne!() failed, {:?} == {:?}", a, b);
          $crate::__private::handle_failure()
      }
  }};

  ($condition_a:expr, $condition_b:expr, $($args:expr),* $(,)?) => {{
      let a = &$condition_a;
      let b = &$condition_b;
      if *a == *b {
          $crate::__private::fatal!("assert_ne!() failed, {:?} == {:?}", a, b);
          $crate::__private::fatal!($($args),*);
          $crate::__private::handle_failure()
      }
  }};
}
