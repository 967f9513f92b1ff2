use canvas_lyric::types::{SecretVersion, TotpSeed};
use canvas_lyric::utils::*;

const FALLBACK_PLAINTEXT: &str = "1061013684605412181378133124961153270708169458858749610730";
const FALLBACK_HEX: &str = "31303631303133363834363035343132313831333738313333313234393631313533323730373038313639343538383538373439363130373330";

fn fallback_seed() -> TotpSeed {
    decode_secret(&fallback_secret())
}

#[test]
fn test_fallback_secret() {
    let secret = fallback_secret();

    assert_eq!(secret.version, "19");
    assert_eq!(secret.raw_digits.len(), 26);
    assert_eq!(secret.raw_digits[0], 99);
    assert_eq!(secret.raw_digits[25], 60);
}

#[test]
fn test_decode_fallback_secret() {
    let seed = fallback_seed();

    assert_eq!(seed.version, "19");
    assert_eq!(seed.secret_hex, FALLBACK_HEX);

    // hex of the joined decimal text, not of the digits themselves
    let bytes = hex::decode(&seed.secret_hex).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), FALLBACK_PLAINTEXT);
}

#[test]
fn test_decode_secret_xor_mask() {
    let seed = decode_secret(&SecretVersion {
        version: "x".to_string(),
        raw_digits: vec![1, 2, 3],
    });

    // 1^9, 2^10, 3^11
    assert_eq!(seed.secret_hex, hex::encode("888"));
    assert_eq!(seed.version, "x");
}

#[test]
fn test_decode_secret_mask_wraps_after_33() {
    let mut digits = vec![0u32; 34];
    digits[33] = 9;
    let seed = decode_secret(&SecretVersion {
        version: "1".to_string(),
        raw_digits: digits,
    });

    let text = String::from_utf8(hex::decode(&seed.secret_hex).unwrap()).unwrap();
    // index 33 reuses the mask of index 0, so 9 ^ 9 == 0
    assert!(text.ends_with("410"));
}

#[test]
fn test_decode_secret_is_deterministic() {
    assert_eq!(fallback_seed(), fallback_seed());
}

#[test]
fn test_totp_rfc6238_vectors() {
    let generator = TotpGenerator::from_secret(b"12345678901234567890".to_vec());

    assert_eq!(generator.generate(59_000), "287082");
    assert_eq!(generator.generate(1_111_111_109_000), "081804");
}

#[test]
fn test_totp_with_fallback_secret() {
    let seed = fallback_seed();

    assert_eq!(generate_totp(&seed, 1_700_000_010_000).unwrap(), "255086");
    assert_eq!(generate_totp(&seed, 1_700_000_040_000).unwrap(), "701379");
    assert_eq!(generate_totp(&seed, 1_700_000_000_000).unwrap(), "680052");
}

#[test]
fn test_totp_same_period_same_code() {
    let generator = TotpGenerator::new(&fallback_seed()).unwrap();

    // 1700000010 and 1700000039 share a 30 second period
    assert_eq!(
        generator.generate(1_700_000_010_000),
        generator.generate(1_700_000_039_999)
    );
    assert_ne!(
        generator.generate(1_700_000_039_000),
        generator.generate(1_700_000_040_000)
    );
}

#[test]
fn test_totp_is_six_digits() {
    let generator = TotpGenerator::new(&fallback_seed()).unwrap();

    for ms in [0, 59_000, 1_700_000_040_000, now_ms()] {
        let code = generator.generate(ms);
        assert_eq!(code.len(), TOTP_DIGITS);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}

#[test]
fn test_totp_rejects_bad_hex() {
    let seed = TotpSeed {
        version: "1".to_string(),
        secret_hex: "not hex".to_string(),
    };

    assert!(TotpGenerator::new(&seed).is_err());
    assert!(generate_totp(&seed, 0).is_err());
}

#[test]
fn test_track_uri() {
    assert_eq!(
        track_uri("4uLU6hMCjMI75M1A2tKUQC"),
        "spotify:track:4uLU6hMCjMI75M1A2tKUQC"
    );
}

#[test]
fn test_format_timestamp() {
    assert_eq!(format_timestamp(0), "0:00.000");
    assert_eq!(format_timestamp(1_500), "0:01.500");
    assert_eq!(format_timestamp(83_456), "1:23.456");
    assert_eq!(format_timestamp(600_000), "10:00.000");
}

#[test]
fn test_now_ms_is_recent() {
    // 2023-11-14
    assert!(now_ms() > 1_700_000_000_000);
}
