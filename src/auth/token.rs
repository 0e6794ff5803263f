use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims carried by the identity provider's access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderClaims {
    pub role_name: Option<String>,
    /// NumericDate; fractional seconds are legal
    pub exp: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read the payload of a provider access token WITHOUT checking its signature.
///
/// SECURITY: this is a trust boundary. The token arrives in the body of the
/// provider's own login response, over a transport we trust, and the provider
/// has already validated it. This service never sees the provider's signing
/// key and only reads claims. Do not use this for tokens received from
/// clients.
///
/// Structural problems and an `exp` in the past are still errors. A token
/// with no `exp` at all is accepted.
pub fn decode_unverified(token: &str) -> Result<ProviderClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.required_spec_claims.clear();
    validation.validate_aud = false;
    // jsonwebtoken only reads integer `exp`; expiry is checked below
    validation.validate_exp = false;

    let claims = decode::<ProviderClaims>(token, &DecodingKey::from_secret(&[]), &validation)?.claims;
    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp_millis() as f64 / 1000.0;
        if exp < now {
            return Err(ErrorKind::ExpiredSignature.into());
        }
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn mint(claims: Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"provider-only-secret")).unwrap()
    }

    #[test]
    fn reads_claims_without_the_signing_key() {
        let exp = Utc::now().timestamp() + 600;
        let token = mint(json!({"role_name": "content_manager", "exp": exp, "user_id": "42"}));

        let claims = decode_unverified(&token).unwrap();
        assert_eq!(claims.role_name.as_deref(), Some("content_manager"));
        assert_eq!(claims.exp, Some(exp as f64));
        assert_eq!(claims.extra["user_id"], "42");
    }

    #[test]
    fn accepts_other_signing_algorithms() {
        let header = Header::new(Algorithm::HS512);
        let token = encode(&header, &json!({"role_name": "admin"}), &EncodingKey::from_secret(b"k")).unwrap();
        assert_eq!(decode_unverified(&token).unwrap().role_name.as_deref(), Some("admin"));
    }

    #[test]
    fn rejects_expired_tokens() {
        let token = mint(json!({"role_name": "admin", "exp": Utc::now().timestamp() - 3600}));
        let err = decode_unverified(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn fractional_exp_is_honoured() {
        let now = Utc::now().timestamp() as f64;

        let token = mint(json!({"role_name": "admin", "exp": now + 3600.5}));
        assert_eq!(decode_unverified(&token).unwrap().exp, Some(now + 3600.5));

        let token = mint(json!({"role_name": "admin", "exp": now - 10.25}));
        let err = decode_unverified(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn non_numeric_exp_is_malformed() {
        let token = mint(json!({"role_name": "admin", "exp": "tomorrow"}));
        assert!(decode_unverified(&token).is_err());
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(decode_unverified("not-a-token").is_err());
        assert!(decode_unverified("a.b.c").is_err());
        assert!(decode_unverified("").is_err());
    }

    #[test]
    fn missing_role_decodes_as_none() {
        let token = mint(json!({"exp": Utc::now().timestamp() + 60}));
        assert!(decode_unverified(&token).unwrap().role_name.is_none());
    }
}
