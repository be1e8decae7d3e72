use ring::hmac;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::OtpError;

pub mod base32;
pub mod uri;

pub use uri::parse_otpauth_uri;

pub const DEFAULT_DIGITS: u32 = 6;
pub const DEFAULT_PERIOD: u64 = 30;
/// Widest code whose modulus, 10^digits, still fits in a `u64`.
pub const MAX_DIGITS: u32 = 19;

/// Everything needed to derive codes for one account, plus the labels
/// shown next to them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpSpec {
    pub issuer: String,
    pub account: String,
    /// Base32 text as entered, decoded only when a code is generated.
    pub secret: String,
    pub digits: u32,
    pub period: u64,
}

impl TotpSpec {
    /// A spec with the usual 6 digits every 30 seconds.
    pub fn new(issuer: &str, account: &str, secret: &str) -> Self {
        TotpSpec {
            issuer: issuer.to_string(),
            account: account.to_string(),
            secret: secret.to_string(),
            digits: DEFAULT_DIGITS,
            period: DEFAULT_PERIOD,
        }
    }

    /// Generates the current token.
    pub fn get_otp(&self) -> Result<String, OtpError> {
        generate(&self.secret, self.digits, self.period)
    }

    /// Generates the token valid at `unix_secs`.
    pub fn get_otp_at(&self, unix_secs: u64) -> Result<String, OtpError> {
        generate_at(&self.secret, self.digits, self.period, unix_secs)
    }

    /// Checks that codes can be generated at all: the secret has key
    /// bytes, digits is in `1..=MAX_DIGITS` and period is positive.
    pub fn validate(&self) -> Result<(), OtpError> {
        self.get_otp_at(0).map(|_| ())
    }
}

/// Big endian representation of the moving factor, where the lower index
/// holds the most significant byte. Eg: 1 -> [0, 0, 0, 0, 0, 0, 0, 1]
struct Bytes([u8; 8]);

impl From<u64> for Bytes {
    fn from(v: u64) -> Bytes {
        Bytes(v.to_be_bytes())
    }
}

/// Seconds since the unix epoch according to the wall clock.
pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Generate the code for `secret` at the current time.
pub fn generate(secret: &str, digits: u32, period: u64) -> Result<String, OtpError> {
    generate_at(secret, digits, period, now())
}

/// Generate the code for `secret` at `unix_secs`.
///
/// The returned string is always exactly `digits` characters long,
/// left padded with zeros. `digits` must be in `1..=MAX_DIGITS`.
pub fn generate_at(
    secret: &str,
    digits: u32,
    period: u64,
    unix_secs: u64,
) -> Result<String, OtpError> {
    if !(1..=MAX_DIGITS).contains(&digits) {
        return Err(OtpError::InvalidDigits);
    }
    let key = base32::decode(secret);
    if key.is_empty() {
        return Err(OtpError::InvalidSecret);
    }
    let counter = counter_at(period, unix_secs)?;
    Ok(hotp(&key, counter, digits))
}

/// Seconds left before the code for `period` changes, in `1..=period`.
pub fn seconds_until_next_step(period: u64) -> Result<u64, OtpError> {
    seconds_until_next_step_at(period, now())
}

pub fn seconds_until_next_step_at(period: u64, unix_secs: u64) -> Result<u64, OtpError> {
    if period == 0 {
        return Err(OtpError::InvalidPeriod);
    }
    Ok(period - unix_secs % period)
}

/// The interval number at `unix_secs`, used as the HOTP counter.
fn counter_at(period: u64, unix_secs: u64) -> Result<u64, OtpError> {
    if period == 0 {
        return Err(OtpError::InvalidPeriod);
    }
    Ok(unix_secs / period)
}

/// RFC 4226 HOTP value for `counter`, rendered as `digits` characters.
fn hotp(key: &[u8], counter: u64, digits: u32) -> String {
    // At the moment, only SHA1 is supported.
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, key);
    let tag = hmac::sign(&key, &Bytes::from(counter).0);
    let tag = tag.as_ref();

    // The offset is the low-order 4 bits of the last byte of the
    // 160 bit signature.
    let offset = (tag[19] & 0x0f) as usize;

    let h = u32::from_be_bytes([
        tag[offset] & 0x7f,
        tag[offset + 1],
        tag[offset + 2],
        tag[offset + 3],
    ]) as u64;

    let code = h % 10u64.pow(digits);

    format!("{:0w$}", code, w = digits as usize)
}
