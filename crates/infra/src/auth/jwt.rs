//! HS256 identity token verification
//!
//! Tokens are issued by the external identity provider; this side only
//! checks the signature, expiry and the optional issuer/audience, then maps
//! the claims onto [`IdentityClaims`].

use std::str::FromStr;

use fanevent_domain::{AuthConfig, FanEventError, IdentityClaims, Result, Role};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::errors::InfraError;

/// Raw claim set accepted from the identity provider
#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    role: Option<String>,
}

impl TokenClaims {
    /// Highest recognised role; unknown role names are ignored.
    fn highest_role(&self) -> Role {
        self.roles
            .iter()
            .chain(self.role.iter())
            .filter_map(|name| Role::from_str(name.trim()).ok())
            .max()
            .unwrap_or_default()
    }
}

/// Verifies bearer tokens against a shared secret
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier").field("validation", &self.validation).finish_non_exhaustive()
    }
}

impl JwtVerifier {
    /// Build a verifier from the auth section of the configuration.
    ///
    /// # Errors
    /// Returns `FanEventError::Config` when the secret is empty.
    pub fn new(config: &AuthConfig) -> Result<Self> {
        if config.jwt_secret.is_empty() {
            return Err(FanEventError::Config("jwt_secret must not be empty".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 30;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self { key: DecodingKey::from_secret(config.jwt_secret.as_bytes()), validation })
    }

    /// Verify `token` and extract the identity it asserts.
    ///
    /// # Errors
    /// Returns `FanEventError::Auth` for any signature, expiry, issuer or
    /// audience failure, or when the token carries no e-mail.
    pub fn verify(&self, token: &str) -> Result<IdentityClaims> {
        let data = decode::<TokenClaims>(token, &self.key, &self.validation)
            .map_err(|e| FanEventError::from(InfraError::from(e)))?;
        let claims = data.claims;

        if claims.sub.trim().is_empty() {
            return Err(FanEventError::Auth("token subject is empty".into()));
        }
        let role = claims.highest_role();
        let email = claims
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(|| FanEventError::Auth("token is missing an email claim".into()))?;

        Ok(IdentityClaims {
            subject: claims.sub,
            email,
            name: claims.name.filter(|n| !n.trim().is_empty()),
            picture: claims.picture.filter(|p| !p.trim().is_empty()),
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{json, Value};

    use super::*;

    const SECRET: &str = "test-secret";

    fn config() -> AuthConfig {
        AuthConfig { jwt_secret: SECRET.into(), issuer: None, audience: None }
    }

    fn mint(claims: Value, secret: &str) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .expect("token encodes")
    }

    fn exp_in(minutes: i64) -> i64 {
        (Utc::now() + Duration::minutes(minutes)).timestamp()
    }

    #[test]
    fn verifies_valid_token() {
        let verifier = JwtVerifier::new(&config()).unwrap();
        let token = mint(
            json!({
                "sub": "auth0|42",
                "email": "fan@example.com",
                "name": "Fan",
                "picture": "https://img.example.com/fan.png",
                "exp": exp_in(10),
            }),
            SECRET,
        );

        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.subject, "auth0|42");
        assert_eq!(claims.email, "fan@example.com");
        assert_eq!(claims.name.as_deref(), Some("Fan"));
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn picks_highest_role_from_roles_and_role() {
        let verifier = JwtVerifier::new(&config()).unwrap();
        let token = mint(
            json!({
                "sub": "s1",
                "email": "a@example.com",
                "roles": ["user", "superhero", "Organizer"],
                "role": "user",
                "exp": exp_in(10),
            }),
            SECRET,
        );

        assert_eq!(verifier.verify(&token).unwrap().role, Role::Organizer);
    }

    #[test]
    fn rejects_expired_token() {
        let verifier = JwtVerifier::new(&config()).unwrap();
        let token =
            mint(json!({"sub": "s1", "email": "a@example.com", "exp": exp_in(-10)}), SECRET);

        let err = verifier.verify(&token).unwrap_err();
        assert_eq!(err, FanEventError::Auth("token has expired".into()));
    }

    #[test]
    fn rejects_wrong_secret() {
        let verifier = JwtVerifier::new(&config()).unwrap();
        let token =
            mint(json!({"sub": "s1", "email": "a@example.com", "exp": exp_in(10)}), "other");

        assert!(matches!(verifier.verify(&token), Err(FanEventError::Auth(_))));
    }

    #[test]
    fn enforces_issuer_and_audience_when_configured() {
        let verifier = JwtVerifier::new(&AuthConfig {
            jwt_secret: SECRET.into(),
            issuer: Some("https://id.example.com/".into()),
            audience: Some("fanevent".into()),
        })
        .unwrap();

        let good = mint(
            json!({
                "sub": "s1",
                "email": "a@example.com",
                "iss": "https://id.example.com/",
                "aud": "fanevent",
                "exp": exp_in(10),
            }),
            SECRET,
        );
        assert!(verifier.verify(&good).is_ok());

        let wrong_aud = mint(
            json!({
                "sub": "s1",
                "email": "a@example.com",
                "iss": "https://id.example.com/",
                "aud": "someone-else",
                "exp": exp_in(10),
            }),
            SECRET,
        );
        assert!(matches!(verifier.verify(&wrong_aud), Err(FanEventError::Auth(_))));
    }

    #[test]
    fn rejects_token_without_email() {
        let verifier = JwtVerifier::new(&config()).unwrap();
        let token = mint(json!({"sub": "s1", "exp": exp_in(10)}), SECRET);

        assert!(matches!(verifier.verify(&token), Err(FanEventError::Auth(_))));
    }

    #[test]
    fn rejects_garbage() {
        let verifier = JwtVerifier::new(&config()).unwrap();
        assert!(matches!(verifier.verify("not-a-jwt"), Err(FanEventError::Auth(_))));
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        let err = JwtVerifier::new(&AuthConfig::default()).unwrap_err();
        assert!(matches!(err, FanEventError::Config(_)));
    }
}
