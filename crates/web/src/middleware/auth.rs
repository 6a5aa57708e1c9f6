use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;

use crate::error::WebError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Identity forwarded by the authentication gateway in front of the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
}

impl CurrentUser {
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        Some(Self {
            user_id: header_value(headers, USER_ID_HEADER)?,
            email: header_value(headers, USER_EMAIL_HEADER)?,
            name: header_value(headers, USER_NAME_HEADER),
        })
    }

    /// Profile name, else the local part of the email address
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }

        match self.email.split('@').next() {
            Some(local) if !local.is_empty() => local.to_string(),
            _ => "Anonymous".to_string(),
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers).ok_or(WebError::Unauthorized)
    }
}

/// The single allow-list deciding who may curate fields and suggestions
#[derive(Debug, Clone, Default)]
pub struct AdminPolicy {
    emails: HashSet<String>,
}

impl AdminPolicy {
    pub fn from_comma_separated(emails: &str) -> Self {
        let emails = emails
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect();

        Self { emails }
    }

    pub fn is_admin(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_lowercase())
    }

    pub fn admin_count(&self) -> usize {
        self.emails.len()
    }
}

pub async fn require_admin(
    State(policy): State<AdminPolicy>,
    request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let user = CurrentUser::from_headers(request.headers()).ok_or(WebError::Unauthorized)?;

    if !policy.is_admin(&user.email) {
        tracing::warn!(user_id = %user.user_id, "Rejected admin access");
        return Err(WebError::Forbidden);
    }

    Ok(next.run(request).await)
}
