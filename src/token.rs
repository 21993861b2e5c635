//! Decoder for the signed report token carried by a sighting report.
//!
//! The token is a compact JWT: `header.payload.signature`, each segment base64url encoded.
//! Its payload holds a `reportToken` claim whose value is itself a JSON document as a string.
//!
//! SECURITY: the signature segment is checked for syntax only and is never verified. The
//! issuing platform's signing key is not available here, so the token is treated as an opaque
//! carrier of report identity and must not be used to authenticate anything.

use serde_json::{Map, Value};

use crate::error::TokenDecodeError;

/// Name of the claim holding the embedded report identity
pub const REPORT_TOKEN_CLAIM: &str = "reportToken";

/// Extracts the JSON document embedded in the token's `reportToken` claim
pub fn decode_report_token(token: &str) -> Result<Value, TokenDecodeError> {
    let claims = decode_claims(token)?;
    let embedded = claims
        .get(REPORT_TOKEN_CLAIM)
        .ok_or(TokenDecodeError::MissingReportToken)?
        .as_str()
        .ok_or(TokenDecodeError::ReportTokenNotString)?;

    serde_json::from_str(embedded).map_err(|e| TokenDecodeError::ReportTokenJson(e.to_string()))
}

/// Decodes the payload segment into its claims without touching the signature
pub fn decode_claims(token: &str) -> Result<Map<String, Value>, TokenDecodeError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenDecodeError::Empty);
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenDecodeError::Malformed(segments.len()));
    }

    decode_object(segments[0], "header")?;
    let claims = decode_object(segments[1], "payload")?;
    decode_segment(segments[2], "signature")?;

    Ok(claims)
}

fn decode_segment(segment: &str, name: &'static str) -> Result<Vec<u8>, TokenDecodeError> {
    base64::decode_config(segment.trim_end_matches('='), base64::URL_SAFE_NO_PAD)
        .map_err(|_| TokenDecodeError::Base64(name))
}

fn decode_object(segment: &str, name: &'static str) -> Result<Map<String, Value>, TokenDecodeError> {
    let bytes = decode_segment(segment, name)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenDecodeError::Json(name))
}

// to run just these tests do cargo test -- token
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(value: &Value) -> String {
        base64::encode_config(value.to_string(), base64::URL_SAFE_NO_PAD)
    }

    fn token_with_claims(claims: Value) -> String {
        let header = json!({"alg": "HS256", "typ": "JWT"});
        format!("{}.{}.c2lnbmF0dXJl", encode(&header), encode(&claims))
    }

    #[test]
    fn test_decodes_embedded_report_identity() {
        let token = token_with_claims(json!({"reportToken": "{\"dummy\":\"value\"}"}));
        let identity = decode_report_token(&token).expect("token should decode");
        assert_eq!(identity, json!({"dummy": "value"}));
    }

    #[test]
    fn test_signature_is_not_verified() {
        let token = token_with_claims(json!({"reportToken": "{\"feeder_id\":\"test\"}"}));
        let (unsigned, _) = token.rsplit_once('.').unwrap();
        let tampered = format!("{}.bm90LXRoZS1yZWFsLXNpZ25hdHVyZQ", unsigned);

        let identity = decode_report_token(&tampered).expect("signature is ignored");
        assert_eq!(identity["feeder_id"], "test");
    }

    #[test]
    fn test_rejects_wrong_segment_count() {
        assert_eq!(
            decode_report_token("invalid_token"),
            Err(TokenDecodeError::Malformed(1))
        );
        assert_eq!(decode_report_token("a.b"), Err(TokenDecodeError::Malformed(2)));
        assert_eq!(decode_report_token("   "), Err(TokenDecodeError::Empty));
    }

    #[test]
    fn test_rejects_non_json_payload() {
        let header = encode(&json!({"alg": "none"}));
        let payload = base64::encode_config("not json", base64::URL_SAFE_NO_PAD);
        let token = format!("{}.{}.", header, payload);
        assert_eq!(decode_report_token(&token), Err(TokenDecodeError::Json("payload")));
    }

    #[test]
    fn test_rejects_bad_base64() {
        let header = encode(&json!({"alg": "none"}));
        let token = format!("{}.***.", header);
        assert_eq!(decode_report_token(&token), Err(TokenDecodeError::Base64("payload")));
    }

    #[test]
    fn test_requires_report_token_claim() {
        let token = token_with_claims(json!({"sub": "feeder"}));
        assert_eq!(
            decode_report_token(&token),
            Err(TokenDecodeError::MissingReportToken)
        );

        let token = token_with_claims(json!({"reportToken": {"dummy": "value"}}));
        assert_eq!(
            decode_report_token(&token),
            Err(TokenDecodeError::ReportTokenNotString)
        );

        let token = token_with_claims(json!({"reportToken": "{not json"}));
        assert!(matches!(
            decode_report_token(&token),
            Err(TokenDecodeError::ReportTokenJson(_))
        ));
    }

    #[test]
    fn test_accepts_padded_segments() {
        let header = base64::encode_config(
            json!({"alg": "none"}).to_string(),
            base64::URL_SAFE,
        );
        let payload = base64::encode_config(
            json!({"reportToken": "[1,2]"}).to_string(),
            base64::URL_SAFE,
        );
        let token = format!("{}.{}.", header, payload);
        assert_eq!(decode_report_token(&token), Ok(json!([1, 2])));
    }
}
