use serde::{Deserialize, Serialize};

/// The profile CentralAuth returns for a logged in user.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct User {
    pub email: String,
    #[serde(rename = "gravatar")]
    pub avatar_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_provider_userinfo() {
        let json = r#"{
            "email": "ada@example.com",
            "gravatar": "https://www.gravatar.com/avatar/abc",
            "verified": true
        }"#;

        let user: User = serde_json::from_str(json).expect("Deserialization failed");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.avatar_url, "https://www.gravatar.com/avatar/abc");
    }

    #[test]
    fn missing_email_is_an_error() {
        let result: Result<User, _> = serde_json::from_str(r#"{ "gravatar": "x" }"#);
        assert!(result.is_err());
    }
}
