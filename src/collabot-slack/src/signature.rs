//! Slack request signature verification.
//!
//! Slack signs every webhook with the app's signing secret:
//!
//! 1. Concatenate `v0:{timestamp}:{body}` as the base string.
//! 2. Compute `HMAC-SHA256(signing_secret, base_string)`.
//! 3. Send `v0={hex_digest}` in the `X-Slack-Signature` header.
//!
//! Requests whose timestamp is more than five minutes away from the local
//! clock are rejected to bound replays.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Header carrying the request timestamp (seconds since epoch).
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Header carrying the `v0=` signature.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Maximum distance between the request timestamp and now, in seconds.
pub const MAX_TIMESTAMP_SKEW_SECS: i64 = 300;

const VERSION_PREFIX: &str = "v0=";

type HmacSha256 = Hmac<Sha256>;

/// Verify a Slack request signature against the current time.
///
/// Returns `true` only if the timestamp is fresh and the signature matches.
pub fn verify_signature(signing_secret: &str, timestamp: &str, body: &[u8], signature: &str) -> bool {
    verify_signature_at(
        signing_secret,
        timestamp,
        body,
        signature,
        chrono::Utc::now().timestamp(),
    )
}

/// Verify a Slack request signature against an explicit `now`.
pub fn verify_signature_at(
    signing_secret: &str,
    timestamp: &str,
    body: &[u8],
    signature: &str,
    now: i64,
) -> bool {
    let Ok(ts) = timestamp.trim().parse::<i64>() else {
        return false;
    };
    if now.abs_diff(ts) > MAX_TIMESTAMP_SKEW_SECS as u64 {
        return false;
    }

    let Some(provided) = signature
        .strip_prefix(VERSION_PREFIX)
        .and_then(|hex_digest| hex::decode(hex_digest).ok())
    else {
        return false;
    };

    let Some(mac) = signed_mac(signing_secret, timestamp, body) else {
        return false;
    };

    // verify_slice compares in constant time
    mac.verify_slice(&provided).is_ok()
}

/// Compute the `v0=` signature Slack would send for a request.
pub fn compute_signature(signing_secret: &str, timestamp: &str, body: &[u8]) -> String {
    let digest = signed_mac(signing_secret, timestamp, body)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default();
    format!("{VERSION_PREFIX}{digest}")
}

fn signed_mac(signing_secret: &str, timestamp: &str, body: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes()).ok()?;
    mac.update(b"v0:");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    Some(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const NOW: i64 = 1_531_420_618;

    #[test]
    fn test_valid_signature() {
        let timestamp = NOW.to_string();
        let body = b"token=xyz&team_id=T1&user_id=U1&command=%2Faskai&text=hi";

        let sig = compute_signature(TEST_SECRET, &timestamp, body);
        assert!(sig.starts_with("v0="));
        assert!(verify_signature_at(TEST_SECRET, &timestamp, body, &sig, NOW));
    }

    #[test]
    fn test_known_vector() {
        // Example published in Slack's request-signing documentation.
        let body = b"token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";
        let expected = "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503";

        assert_eq!(compute_signature(TEST_SECRET, "1531420618", body), expected);
        assert!(verify_signature_at(TEST_SECRET, "1531420618", body, expected, NOW));
    }

    #[test]
    fn test_stale_timestamp_rejected_even_with_correct_signature() {
        let timestamp = (NOW - 301).to_string();
        let body = b"text=hello";

        let sig = compute_signature(TEST_SECRET, &timestamp, body);
        assert!(!verify_signature_at(TEST_SECRET, &timestamp, body, &sig, NOW));
    }

    #[test]
    fn test_timestamp_at_window_edge_accepted() {
        let timestamp = (NOW - 300).to_string();
        let body = b"text=hello";

        let sig = compute_signature(TEST_SECRET, &timestamp, body);
        assert!(verify_signature_at(TEST_SECRET, &timestamp, body, &sig, NOW));
    }

    #[test]
    fn test_future_timestamp_rejected() {
        let timestamp = (NOW + 600).to_string();
        let body = b"body";

        let sig = compute_signature(TEST_SECRET, &timestamp, body);
        assert!(!verify_signature_at(TEST_SECRET, &timestamp, body, &sig, NOW));
    }

    #[test]
    fn test_extreme_timestamps_rejected_without_overflow() {
        let body = b"body";
        for timestamp in [i64::MIN.to_string(), i64::MAX.to_string()] {
            let sig = compute_signature(TEST_SECRET, &timestamp, body);
            assert!(!verify_signature_at(TEST_SECRET, &timestamp, body, &sig, NOW));
        }
        let sig = compute_signature(TEST_SECRET, "0", body);
        assert!(!verify_signature_at(TEST_SECRET, "0", body, &sig, i64::MIN));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let timestamp = NOW.to_string();
        let body = b"text=hello";

        let sig = compute_signature("some-other-secret", &timestamp, body);
        assert!(!verify_signature_at(TEST_SECRET, &timestamp, body, &sig, NOW));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let timestamp = NOW.to_string();
        let sig = compute_signature(TEST_SECRET, &timestamp, b"text=original");
        assert!(!verify_signature_at(TEST_SECRET, &timestamp, b"text=tampered", &sig, NOW));
    }

    #[test]
    fn test_malformed_inputs_rejected() {
        let timestamp = NOW.to_string();
        let sig = compute_signature(TEST_SECRET, &timestamp, b"body");

        assert!(!verify_signature_at(TEST_SECRET, "not-a-number", b"body", &sig, NOW));
        assert!(!verify_signature_at(TEST_SECRET, &timestamp, b"body", "", NOW));
        assert!(!verify_signature_at(TEST_SECRET, &timestamp, b"body", &sig[3..], NOW));
        assert!(!verify_signature_at(TEST_SECRET, &timestamp, b"body", "v0=zz-not-hex", NOW));
        assert!(!verify_signature_at(TEST_SECRET, &timestamp, b"body", &sig[..20], NOW));
    }

    #[test]
    fn test_verify_signature_uses_wall_clock() {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let sig = compute_signature(TEST_SECRET, &timestamp, b"body");
        assert!(verify_signature(TEST_SECRET, &timestamp, b"body", &sig));
    }
}
