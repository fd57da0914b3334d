use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure identifying the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthClaims {
    pub sub: Uuid, // User id (standard JWT subject claim)
    pub username: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_claims_serialization() {
        let claims = AuthClaims {
            sub: Uuid::new_v4(),
            username: "test-user".to_string(),
            exp: 1234567890,
            iat: 1234567800,
        };

        // Should serialize to JSON
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("test-user"));
        assert!(json.contains(&claims.sub.to_string()));

        // Should deserialize from JSON
        let deserialized: AuthClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, claims);
    }
}
