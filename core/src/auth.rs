//! # AUTH VERIFIER
//!
//! Digest credentials for the envelope:
//!
//! - regular users: `hex(SHA-512(account + login + salt))`
//! - admin: `hex(SHA-512(YYYYMMDDHH + admin_salt))`, taken from the local clock
//!
//! The admin token is only a function of the clock hour and a shared salt.
//! Anyone holding the salt can mint it, and a captured token replays freely
//! until the hour rolls over. Do not reuse this scheme outside the scoring API.

use crate::request::MethodRequest;
use chrono::{DateTime, Local, TimeZone};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

pub const SALT: &str = "Otus";
pub const ADMIN_SALT: &str = "42";

/// Hour-granularity stamp mixed into the admin digest.
const HOUR_STAMP_FORMAT: &str = "%Y%m%d%H";

#[derive(Debug, Clone)]
pub struct AuthVerifier {
    salt: String,
    admin_salt: String,
}

impl Default for AuthVerifier {
    fn default() -> Self {
        Self::new(SALT, ADMIN_SALT)
    }
}

impl AuthVerifier {
    pub fn new(salt: impl Into<String>, admin_salt: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            admin_salt: admin_salt.into(),
        }
    }

    pub fn user_digest(&self, account: &str, login: &str) -> String {
        sha512_hex(&[account, login, self.salt.as_str()])
    }

    pub fn admin_digest_at<Tz>(&self, now: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let stamp = now.format(HOUR_STAMP_FORMAT).to_string();
        sha512_hex(&[stamp.as_str(), self.admin_salt.as_str()])
    }

    pub fn admin_digest(&self) -> String {
        self.admin_digest_at(&Local::now())
    }

    /// Expected token for the envelope at the given instant.
    pub fn expected_token_at<Tz>(&self, request: &MethodRequest, now: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        if request.is_admin() {
            self.admin_digest_at(now)
        } else {
            self.user_digest(request.account.as_deref().unwrap_or_default(), &request.login)
        }
    }

    pub fn check_auth_at<Tz>(&self, request: &MethodRequest, now: &DateTime<Tz>) -> bool
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let expected = self.expected_token_at(request, now);
        expected.as_bytes().ct_eq(request.token.as_bytes()).into()
    }

    pub fn check_auth(&self, request: &MethodRequest) -> bool {
        self.check_auth_at(request, &Local::now())
    }
}

fn sha512_hex(parts: &[&str]) -> String {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}
