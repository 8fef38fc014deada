//! Request context carrying the calling actor and request origin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_entity::user::Actor;

/// Context for the current request.
///
/// Built by the HTTP layer and passed into service methods so that audit
/// entries know *who* acted and from *where*.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The identified caller, if any.
    pub actor: Option<Actor>,
    /// Client address as resolved by the HTTP layer.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Opaque session key supplied by the identity collaborator.
    pub session_key: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for an anonymous caller.
    pub fn anonymous() -> Self {
        Self {
            actor: None,
            ip_address: None,
            user_agent: None,
            session_key: None,
            request_time: Utc::now(),
        }
    }

    /// Creates a context for an identified caller.
    pub fn for_actor(actor: Actor) -> Self {
        Self {
            actor: Some(actor),
            ..Self::anonymous()
        }
    }

    /// Sets the client address.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Sets the User-Agent.
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Returns whether the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.actor.as_ref().is_some_and(|a| a.role.is_admin())
    }
}
