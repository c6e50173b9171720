use geoitems_auth::Claims;

/// Authenticated caller of a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    subject: String,
    email: Option<String>,
}

impl PrincipalContext {
    pub fn new(subject: impl Into<String>, email: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            email,
        }
    }

    pub fn from_claims(claims: &Claims) -> Self {
        Self::new(claims.sub.clone(), claims.email.clone())
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
