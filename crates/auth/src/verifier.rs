use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, Validation};

use crate::{extract_bearer, AuthError, Claims, KeyProvider};

/// Verifies bearer tokens against an injected [`KeyProvider`].
#[derive(Clone)]
pub struct TokenVerifier {
    keys: Arc<dyn KeyProvider>,
    audience: String,
}

impl TokenVerifier {
    /// `audience` is the client id tokens must be issued for.
    pub fn new(keys: Arc<dyn KeyProvider>, audience: impl Into<String>) -> Self {
        Self {
            keys,
            audience: audience.into(),
        }
    }

    /// Extract the bearer token from `header` and verify it.
    pub async fn verify_header(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let token = extract_bearer(header)?;
        self.verify(token).await
    }

    /// Check signature, expiry and audience; return the token's claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::invalid_token(e.to_string()))?;
        let key = self.keys.decoding_key(header.kid.as_deref()).await?;

        let mut validation = Validation::new(self.keys.algorithm());
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "aud"]);

        let data = decode::<Claims>(token, &key, &validation)
            .map_err(|e| AuthError::invalid_token(e.to_string()))?;
        Ok(data.claims)
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &self.keys.algorithm())
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticKeyProvider;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-key";
    const CLIENT_ID: &str = "test-client-id";

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(Arc::new(StaticKeyProvider::hs256(SECRET)), CLIENT_ID)
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn mint(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn good_claims() -> serde_json::Value {
        json!({
            "sub": "123",
            "email": "test@example.com",
            "aud": CLIENT_ID,
            "exp": now() + 3600,
            "iss": "https://cognito-idp.us-east-1.amazonaws.com/test-pool",
        })
    }

    #[tokio::test]
    async fn accepts_a_well_formed_token() {
        let token = mint(good_claims(), SECRET);
        let claims = verifier().verify(&token).await.unwrap();
        assert_eq!(claims.sub, "123");
        assert_eq!(claims.email.as_deref(), Some("test@example.com"));
    }

    #[tokio::test]
    async fn verify_header_requires_bearer_scheme() {
        let token = mint(good_claims(), SECRET);
        let v = verifier();
        assert!(v.verify_header(Some(&format!("Bearer {token}"))).await.is_ok());
        assert_eq!(v.verify_header(Some(&token)).await, Err(AuthError::MalformedHeader));
        assert_eq!(v.verify_header(None).await, Err(AuthError::NoAuthHeader));
    }

    #[tokio::test]
    async fn rejects_wrong_audience() {
        let mut claims = good_claims();
        claims["aud"] = json!("someone-else");
        let err = verifier().verify(&mint(claims, SECRET)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn rejects_missing_audience() {
        let mut claims = good_claims();
        claims.as_object_mut().unwrap().remove("aud");
        let err = verifier().verify(&mint(claims, SECRET)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn rejects_expired_tokens() {
        let mut claims = good_claims();
        claims["exp"] = json!(now() - 3600);
        let err = verifier().verify(&mint(claims, SECRET)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn rejects_foreign_signatures() {
        let token = mint(good_claims(), "another-secret");
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn rejects_garbage() {
        let err = verifier().verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn debug_output_names_the_audience_but_not_the_keys() {
        let rendered = format!("{:?}", verifier());
        assert!(rendered.contains("test-client-id"));
        assert!(rendered.contains("HS256"));
        assert!(!rendered.contains(SECRET));
    }
}
