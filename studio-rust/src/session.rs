use serde::{Deserialize, Serialize};

const DEFAULT_HEADLINE: &str = "Make Your Next Post Shine";

/// Read-only user record supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl AuthUser {
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .and_then(|name| name.split(' ').next())
            .filter(|first| !first.is_empty())
    }
}

/// Per-session state handed to the turn orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub user: Option<AuthUser>,
}

impl SessionContext {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn signed_in(user: AuthUser) -> Self {
        Self { user: Some(user) }
    }

    /// Headline shown above an empty chat.
    #[must_use]
    pub fn greeting(&self) -> String {
        match self.user.as_ref().and_then(AuthUser::first_name) {
            Some(first) => format!("Hello, {first}"),
            None => DEFAULT_HEADLINE.to_string(),
        }
    }
}
