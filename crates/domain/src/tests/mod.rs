// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test module for the domain crate.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod error;
mod feed;
mod validation;

use crate::User;

pub fn create_test_user(email: &str, first_name: &str, last_name: &str) -> User {
    User {
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        user_type: String::from("Student"),
        status: String::from("Active"),
        ..User::default()
    }
}
