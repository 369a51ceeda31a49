use roomdesk_security::UserRecord;
use serde::{Deserialize, Serialize};

/// Descriptor of a rendered page.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub page: &'static str,
    /// `true` while the session is still resolving; the page shows a placeholder.
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
}

/// Descriptor of an administrative section.
#[derive(Debug, Clone, Serialize)]
pub struct AdminView {
    pub section: &'static str,
    pub path: String,
    pub user: UserRecord,
}

#[derive(Debug, Deserialize)]
pub struct SsoCallback {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct DateCheck {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct IcsRequest {
    pub summary: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub description: String,
    pub location: Option<String>,
    #[serde(default)]
    pub filename: String,
}
