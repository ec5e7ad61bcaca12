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

#[test]
fn assert_syntax_works() {
    pw_assert::assert!(true as bool);
    pw_assert::assert!(true as bool,);

    pw_assert::assert!(true as bool, "custom msg");
    pw_assert::assert!(true as bool, "custom msg",);

    pw_assert::assert!(true as bool, "custom msg with arg {}", 42 as u32);
    pw_assert::assert!(true as bool, "custom msg with arg {}", 42 as u32,);
}

#[test]
fn assert_ne_syntax_works() {
    pw_assert::ne!(1 as u32, 2 as u32);
    pw_assert::ne!(1 as u32, 2 as u32,);

    pw_assert::ne!(1 as u32, 2 as u32, "custom msg");
    pw_assert::ne!(1 as u32, 2 as u32, "custom msg with arg {}", 42 as u32);
}

#[test]
#[should_panic(expected = "pw_assert failure")]
fn failed_assert_halts() {
    pw_assert::assert!(1 + 1 == 3, "arithmetic is broken");
}

#[test]
#[should_panic(expected = "pw_assert failure")]
fn failed_ne_halts() {
    pw_assert::ne!(4 as u32, 4 as u32);
}

#[test]
#[should_panic(expected = "pw_assert failure")]
fn panic_halts() {
    fn halt() -> u32 {
        pw_assert::panic!("unrecoverable: {}", 7 as u32)
    }
    let _ = halt();
}
