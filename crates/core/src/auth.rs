use serde::{Deserialize, Serialize};

/// Tokens issued for an authenticated session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    access_token: String,
    id_token: Option<String>,
}

impl SessionTokens {
    /// Creates a token pair from the identity provider response.
    #[must_use]
    pub fn new(access_token: impl Into<String>, id_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            id_token,
        }
    }

    /// Returns the bearer access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    /// Returns the OpenID id token, if one was issued.
    #[must_use]
    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref()
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SessionTokens")
            .field("access_token", &"<redacted>")
            .field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// The signed-in actor, as returned by the session retrieval flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    name: String,
    email: String,
    signum: String,
    user_type: String,
    role_names: Vec<String>,
    tokens: SessionTokens,
}

impl UserSession {
    /// Creates a session from profile and token data.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        signum: impl Into<String>,
        user_type: impl Into<String>,
        role_names: Vec<String>,
        tokens: SessionTokens,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            signum: signum.into(),
            user_type: user_type.into(),
            role_names,
            tokens,
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the signum, the stable corporate user identifier.
    #[must_use]
    pub fn signum(&self) -> &str {
        self.signum.as_str()
    }

    /// Returns the user type (e.g. `Ericsson` or `Customer`).
    #[must_use]
    pub fn user_type(&self) -> &str {
        self.user_type.as_str()
    }

    /// Returns the raw role names delivered by the backend.
    #[must_use]
    pub fn role_names(&self) -> &[String] {
        &self.role_names
    }

    /// Returns the session tokens.
    #[must_use]
    pub fn tokens(&self) -> &SessionTokens {
        &self.tokens
    }
}
