// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token codec.
//!
//! Tokens are three base64url segments joined by `.`:
//!
//! ```text
//! base64url(header) "." base64url(payload) "." base64url(HMAC-SHA256(secret, signing_input))
//! ```
//!
//! where `signing_input` is the first two segments joined by `.`, exactly as
//! they appear on the wire. The header is always `{"alg":"HS256","typ":"JWT"}`.
//!
//! The codec never looks inside the payload. Expiry and any other claim checks
//! belong to the caller, after [`TokenCodec::verify`] has succeeded.

use base64ct::{Base64Url, Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use serde::{de::DeserializeOwned, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::error::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// Serialized header shared by every token this codec produces.
pub const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Signs, verifies and decodes compact HS256 tokens.
///
/// Holds nothing but the secret, so one instance can be shared freely
/// across request handlers.
#[derive(Clone)]
pub struct TokenCodec {
    secret: Zeroizing<Vec<u8>>,
}

/// The three segments of a token, still base64url-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenParts<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

impl<'a> TokenParts<'a> {
    /// Split a token into exactly three dot-separated segments.
    pub fn split(token: &'a str) -> Result<Self, TokenError> {
        let mut segments = token.split('.');
        match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(header), Some(payload), Some(signature), None) => Ok(Self {
                header,
                payload,
                signature,
            }),
            _ => Err(TokenError::Malformed("expected three segments")),
        }
    }

    /// The bytes the signature is computed over.
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.header, self.payload)
    }
}

impl TokenCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: Zeroizing::new(secret.as_ref().to_vec()),
        }
    }

    /// Sign `payload` (already serialized by the caller) into a token.
    ///
    /// Deterministic: the same secret and payload always give the same token.
    pub fn encode(&self, payload: &[u8]) -> Result<String, TokenError> {
        let header = encode_segment(HEADER_JSON.as_bytes());
        let payload = encode_segment(payload);
        let signature = encode_segment(&self.sign(&format!("{header}.{payload}"))?);
        Ok(format!("{header}.{payload}.{signature}"))
    }

    /// Serialize `claims` as JSON and sign them.
    pub fn encode_json<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let payload =
            serde_json::to_vec(claims).map_err(|e| TokenError::Encoding(e.to_string()))?;
        self.encode(&payload)
    }

    /// Check the token's signature.
    ///
    /// Returns `Err(Malformed)` only when the token does not have three
    /// segments. A signature segment that does not decode cannot match, so it
    /// yields `Ok(false)` like any other mismatch.
    pub fn verify(&self, token: &str) -> Result<bool, TokenError> {
        let parts = TokenParts::split(token)?;
        let Ok(provided) = decode_segment(parts.signature) else {
            return Ok(false);
        };

        let mut mac = self.mac()?;
        mac.update(parts.signing_input().as_bytes());
        // verify_slice compares in constant time
        Ok(mac.verify_slice(&provided).is_ok())
    }

    /// Return the raw payload bytes.
    ///
    /// Does not check the signature; call [`TokenCodec::verify`] first.
    pub fn decode(&self, token: &str) -> Result<Vec<u8>, TokenError> {
        let parts = TokenParts::split(token)?;
        decode_segment(parts.payload)
    }

    /// [`TokenCodec::decode`] followed by JSON deserialization.
    pub fn decode_json<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let payload = self.decode(token)?;
        serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed("payload is not valid JSON"))
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        <HmacSha256 as Mac>::new_from_slice(&self.secret).map_err(|_| TokenError::InvalidKey)
    }

    fn sign(&self, signing_input: &str) -> Result<Vec<u8>, TokenError> {
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"[redacted]")
            .finish()
    }
}

/// Base64url without padding.
pub fn encode_segment(bytes: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(bytes)
}

/// Base64url decode, restoring `=` padding to a multiple of four first.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    if segment.contains('=') {
        return Err(TokenError::Malformed("segment carries padding"));
    }
    Base64Url::decode_vec(&pad_segment(segment))
        .map_err(|_| TokenError::Malformed("segment is not valid base64url"))
}

fn pad_segment(segment: &str) -> String {
    let mut padded = String::with_capacity(segment.len() + 3);
    padded.push_str(segment);
    while padded.len() % 4 != 0 {
        padded.push('=');
    }
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use proptest::prelude::*;

    const SECRET: &str = "Testing Secret Key";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET)
    }

    /// Builds the token independently of the codec.
    fn reference_token(secret: &[u8], payload: &[u8]) -> String {
        let header = URL_SAFE_NO_PAD.encode(HEADER_JSON);
        let payload = URL_SAFE_NO_PAD.encode(payload);
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(format!("{header}.{payload}").as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{header}.{payload}.{signature}")
    }

    /// Replace the character at `index` with a different base64url character.
    ///
    /// A segment's final character only carries its high bits and is always
    /// canonical here, so swapping in `A`/`Q` changes the decoded bytes too.
    fn mutate(token: &str, index: usize) -> String {
        let mut bytes = token.as_bytes().to_vec();
        bytes[index] = if bytes[index] == b'A' { b'Q' } else { b'A' };
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn header_segment_is_fixed() {
        let token = codec().encode(b"{}").unwrap();
        assert!(token.starts_with("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9."));
    }

    #[test]
    fn matches_reference_construction() {
        let payload = br#"{"user_id":42,"username":"alice","exp":1700003600}"#;
        let token = codec().encode(payload).unwrap();
        assert_eq!(token, reference_token(SECRET.as_bytes(), payload));
    }

    #[test]
    fn segments_carry_no_padding() {
        // 1, 2 and 3 byte payloads exercise every padding length
        for payload in [&b"a"[..], b"ab", b"abc"] {
            let token = codec().encode(payload).unwrap();
            assert!(!token.contains('='));
            assert_eq!(token.split('.').count(), 3);
        }
    }

    #[test]
    fn verify_accepts_own_tokens() {
        let token = codec().encode(b"payload").unwrap();
        assert_eq!(codec().verify(&token), Ok(true));
        assert_eq!(codec().decode(&token).unwrap(), b"payload");
    }

    #[test]
    fn verify_rejects_other_secret() {
        let token = TokenCodec::new("secret-one").encode(b"payload").unwrap();
        assert_eq!(TokenCodec::new("secret-two").verify(&token), Ok(false));
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let codec = codec();
        let token = codec.encode(br#"{"user_id":1}"#).unwrap();
        let parts = TokenParts::split(&token).unwrap();
        let forged = format!(
            "{}.{}.{}",
            parts.header,
            encode_segment(br#"{"user_id":2}"#),
            parts.signature
        );
        assert_eq!(codec.verify(&forged), Ok(false));
    }

    #[test]
    fn verify_rejects_undecodable_signature() {
        let token = codec().encode(b"payload").unwrap();
        let parts = TokenParts::split(&token).unwrap();
        let forged = format!("{}.{}.not*base64", parts.header, parts.payload);
        assert_eq!(codec().verify(&forged), Ok(false));
    }

    #[test]
    fn verify_rejects_wrong_segment_count() {
        assert_eq!(
            codec().verify("onlyonepart"),
            Err(TokenError::Malformed("expected three segments"))
        );
        assert_eq!(
            codec().verify("a.b"),
            Err(TokenError::Malformed("expected three segments"))
        );
        assert!(codec().verify("a.b.c.d").is_err());
        assert!(codec().verify("").is_err());
    }

    #[test]
    fn decode_rejects_wrong_segment_count() {
        assert!(matches!(
            codec().decode("a.b"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        assert!(matches!(
            codec().decode("eyJ9.!!!!.sig"),
            Err(TokenError::Malformed(_))
        ));
        // a single leftover character can never be valid base64
        assert!(matches!(
            codec().decode("eyJ9.abcde.sig"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn decode_does_not_check_signature() {
        let token = codec().encode(b"unverified").unwrap();
        let other = TokenCodec::new("another secret");
        assert_eq!(other.verify(&token), Ok(false));
        assert_eq!(other.decode(&token).unwrap(), b"unverified");
    }

    #[test]
    fn decode_segment_repads() {
        assert_eq!(decode_segment("YQ").unwrap(), b"a");
        assert_eq!(decode_segment("YWI").unwrap(), b"ab");
        assert_eq!(decode_segment("YWJj").unwrap(), b"abc");
        assert_eq!(decode_segment("").unwrap(), b"");
        assert!(decode_segment("YQ==").is_err());
    }

    #[test]
    fn json_helpers_round_trip() {
        let claims = serde_json::json!({"user_id": 7, "username": "bob"});
        let token = codec().encode_json(&claims).unwrap();
        let decoded: serde_json::Value = codec().decode_json(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn decode_json_rejects_non_json_payload() {
        let token = codec().encode(b"not json").unwrap();
        let result: Result<serde_json::Value, _> = codec().decode_json(&token);
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", codec());
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("redacted"));
    }

    proptest! {
        #[test]
        fn encode_is_deterministic_and_round_trips(payload in proptest::collection::vec(any::<u8>(), 0..256)) {
            let codec = codec();
            let token = codec.encode(&payload).unwrap();
            prop_assert_eq!(&token, &codec.encode(&payload).unwrap());
            prop_assert_eq!(codec.verify(&token), Ok(true));
            prop_assert_eq!(codec.decode(&token).unwrap(), payload);
        }

        #[test]
        fn any_single_character_change_fails(
            payload in proptest::collection::vec(any::<u8>(), 1..64),
            position in any::<proptest::sample::Index>(),
        ) {
            let codec = codec();
            let token = codec.encode(&payload).unwrap();
            let index = position.index(token.len());
            let tampered = mutate(&token, index);
            prop_assume!(tampered != token);
            prop_assert_ne!(codec.verify(&tampered), Ok(true));
        }
    }
}
