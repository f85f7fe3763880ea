//! Stripe webhook signature verification.
//!
//! HMAC-SHA256 over the raw payload with timestamp validation to reject
//! replays. Verification happens before any parsing of event content.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::SubscriptionError;
use super::stripe_event::StripeEvent;

/// Maximum allowed age for webhook events (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for future events (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the Stripe-Signature header.
///
/// Format: `t=<timestamp>,v1=<signature>[,v0=<legacy>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// v1 signature (HMAC-SHA256).
    pub v1_signature: Vec<u8>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSignature` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, SubscriptionError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| SubscriptionError::invalid_signature("invalid header format"))?;

            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        SubscriptionError::invalid_signature("invalid timestamp")
                    })?);
                }
                "v1" => {
                    v1_signature = Some(hex::decode(value).map_err(|_| {
                        SubscriptionError::invalid_signature("invalid v1 signature hex")
                    })?);
                }
                _ => {
                    // Ignore unknown fields for forward compatibility
                }
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| SubscriptionError::invalid_signature("missing timestamp"))?;
        let v1_signature = v1_signature
            .ok_or_else(|| SubscriptionError::invalid_signature("missing v1 signature"))?;

        Ok(SignatureHeader {
            timestamp,
            v1_signature,
        })
    }
}

/// Verifier for Stripe webhook signatures.
pub struct StripeWebhookVerifier {
    /// The webhook signing secret from the Stripe dashboard.
    secret: String,
}

impl StripeWebhookVerifier {
    /// Creates a new verifier with the given webhook secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verifies the webhook signature and parses the event.
    ///
    /// # Verification Steps
    ///
    /// 1. Parse the signature header
    /// 2. Validate timestamp is within acceptable range
    /// 3. Compute expected signature using HMAC-SHA256
    /// 4. Compare signatures using constant-time comparison
    /// 5. Only then parse the JSON payload into a StripeEvent
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - header malformed, timestamp out of range, or
    ///   signature mismatch
    /// - `ValidationFailed` - payload is not a valid event after the
    ///   signature checked out
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent, SubscriptionError> {
        let header = SignatureHeader::parse(signature_header)?;

        self.validate_timestamp(header.timestamp)?;

        let expected_signature = self.compute_signature(header.timestamp, payload);
        if !constant_time_compare(&expected_signature, &header.v1_signature) {
            return Err(SubscriptionError::invalid_signature("signature mismatch"));
        }

        let event: StripeEvent = serde_json::from_slice(payload)
            .map_err(|e| SubscriptionError::validation("payload", e.to_string()))?;

        Ok(event)
    }

    /// Validates that the timestamp is within acceptable bounds.
    fn validate_timestamp(&self, timestamp: i64) -> Result<(), SubscriptionError> {
        let now = chrono::Utc::now().timestamp();
        let age = now - timestamp;

        if age > MAX_EVENT_AGE_SECS {
            return Err(SubscriptionError::invalid_signature(format!(
                "event too old ({} seconds)",
                age
            )));
        }

        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(SubscriptionError::invalid_signature(
                "event timestamp in future",
            ));
        }

        Ok(())
    }

    /// Computes the HMAC-SHA256 signature for the given timestamp and payload.
    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));

        let mut mac =
            Hmac::<Sha256>::new_from_slice(self.secret.as_bytes()).expect("HMAC accepts any key");
        mac.update(signed_payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes a valid signature header for test fixtures.
#[cfg(test)]
pub fn sign_test_payload(secret: &str, timestamp: i64, payload: &str) -> String {
    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(signed_payload.as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "whsec_test_secret_12345";

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    // ══════════════════════════════════════════════════════════════
    // SignatureHeader Parsing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_header_with_v1() {
        let signature = "a".repeat(64);
        let header_str = format!("t=1234567890,v1={}", signature);

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signature.len(), 32); // 64 hex chars = 32 bytes
    }

    #[test]
    fn parse_header_ignores_unknown_fields() {
        let signature = "a".repeat(64);
        let header_str = format!("t=1234567890,v1={},v0=legacy00,scheme=hmac", signature);

        let header = SignatureHeader::parse(&header_str).unwrap();
        assert_eq!(header.timestamp, 1234567890);
    }

    #[test]
    fn parse_header_missing_timestamp_fails() {
        let result = SignatureHeader::parse(&format!("v1={}", "a".repeat(64)));
        assert!(matches!(result, Err(SubscriptionError::InvalidSignature(_))));
    }

    #[test]
    fn parse_header_missing_v1_fails() {
        let result = SignatureHeader::parse("t=1234567890");
        assert!(matches!(result, Err(SubscriptionError::InvalidSignature(_))));
    }

    #[test]
    fn parse_header_invalid_hex_fails() {
        let result = SignatureHeader::parse("t=1234567890,v1=not_valid_hex");
        assert!(matches!(result, Err(SubscriptionError::InvalidSignature(_))));
    }

    #[test]
    fn parse_header_no_equals_fails() {
        let result = SignatureHeader::parse("t1234567890");
        assert!(matches!(result, Err(SubscriptionError::InvalidSignature(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_valid_signature() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let payload = r#"{"id":"evt_test123","type":"invoice.paid","created":1704067200,"data":{"object":{}},"livemode":false}"#;
        let header = sign_test_payload(TEST_SECRET, now(), payload);

        let event = verifier.verify_and_parse(payload.as_bytes(), &header).unwrap();
        assert_eq!(event.id, "evt_test123");
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let verifier = StripeWebhookVerifier::new("wrong_secret");
        let payload = r#"{"id":"evt_test"}"#;
        let header = sign_test_payload(TEST_SECRET, now(), payload);

        let result = verifier.verify_and_parse(payload.as_bytes(), &header);
        assert!(matches!(result, Err(SubscriptionError::InvalidSignature(_))));
    }

    #[test]
    fn verify_tampered_payload_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = sign_test_payload(TEST_SECRET, now(), r#"{"id":"evt_test"}"#);

        let result = verifier.verify_and_parse(br#"{"id":"evt_forged"}"#, &header);
        assert!(matches!(result, Err(SubscriptionError::InvalidSignature(_))));
    }

    #[test]
    fn verify_timestamp_too_old_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let payload = r#"{"id":"evt_test"}"#;
        let header = sign_test_payload(TEST_SECRET, now() - 600, payload);

        let result = verifier.verify_and_parse(payload.as_bytes(), &header);
        assert!(matches!(result, Err(SubscriptionError::InvalidSignature(_))));
    }

    #[test]
    fn verify_timestamp_at_boundary_succeeds() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        assert!(verifier.validate_timestamp(now() - 300).is_ok());
    }

    #[test]
    fn verify_timestamp_from_future_with_skew_succeeds() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        assert!(verifier.validate_timestamp(now() + 30).is_ok());
    }

    #[test]
    fn verify_timestamp_from_future_beyond_skew_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        assert!(verifier.validate_timestamp(now() + 120).is_err());
    }

    #[test]
    fn verify_invalid_json_fails_after_signature_passes() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let payload = "not valid json";
        let header = sign_test_payload(TEST_SECRET, now(), payload);

        let result = verifier.verify_and_parse(payload.as_bytes(), &header);
        assert!(matches!(
            result,
            Err(SubscriptionError::ValidationFailed { .. })
        ));
    }

    // ══════════════════════════════════════════════════════════════
    // Constant Time Comparison Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_compare_equal_values() {
        assert!(constant_time_compare(&[1, 2, 3], &[1, 2, 3]));
    }

    #[test]
    fn constant_time_compare_different_values() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 4]));
    }

    #[test]
    fn constant_time_compare_different_lengths() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 3, 4]));
    }
}
