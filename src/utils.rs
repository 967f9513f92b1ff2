use chrono::Utc;
use totp_rs::{Algorithm, TOTP};

use crate::types::{SecretVersion, TotpSeed};

pub const TOTP_DIGITS: usize = 6;
pub const TOTP_PERIOD_SECS: u64 = 30;

pub const FALLBACK_SECRET_VERSION: &str = "19";
pub const FALLBACK_SECRET_DIGITS: [u32; 26] = [
    99, 111, 47, 88, 49, 56, 118, 65, 52, 67, 50, 104, 117, 101, 55, 94, 95, 75, 94, 49, 69, 36,
    85, 64, 74, 60,
];

pub fn fallback_secret() -> SecretVersion {
    SecretVersion {
        version: FALLBACK_SECRET_VERSION.to_string(),
        raw_digits: FALLBACK_SECRET_DIGITS.to_vec(),
    }
}

/// Turns an obfuscated secret into hex encoded TOTP material.
///
/// Each digit is XORed with `(i % 33) + 9`, the results are joined as decimal
/// text and that text's UTF-8 bytes become the secret.
pub fn decode_secret(secret: &SecretVersion) -> TotpSeed {
    let joined: String = secret
        .raw_digits
        .iter()
        .enumerate()
        .map(|(i, digit)| (digit ^ ((i as u32 % 33) + 9)).to_string())
        .collect();

    TotpSeed {
        version: secret.version.clone(),
        secret_hex: hex::encode(joined.as_bytes()),
    }
}

/// SHA1, 6 digits, 30 second period.
pub struct TotpGenerator {
    totp: TOTP,
}

impl TotpGenerator {
    pub fn new(seed: &TotpSeed) -> Result<Self, hex::FromHexError> {
        let secret = hex::decode(&seed.secret_hex)?;
        Ok(Self::from_secret(secret))
    }

    pub fn from_secret(secret: Vec<u8>) -> Self {
        // unchecked: remote secrets are not guaranteed to reach 128 bits
        let totp = TOTP::new_unchecked(Algorithm::SHA1, TOTP_DIGITS, 1, TOTP_PERIOD_SECS, secret);
        Self { totp }
    }

    pub fn generate(&self, timestamp_ms: u64) -> String {
        self.totp.generate(timestamp_ms / 1000)
    }
}

pub fn generate_totp(seed: &TotpSeed, timestamp_ms: u64) -> Result<String, hex::FromHexError> {
    Ok(TotpGenerator::new(seed)?.generate(timestamp_ms))
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{track_id}")
}

pub fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Renders a millisecond offset as `m:ss.mmm`.
pub fn format_timestamp(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{minutes}:{seconds:02}.{millis:03}")
}
