// src/gate.rs
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum GateError {
    #[error("gate unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequest {
    pub install_id: String,
    pub api_key: Option<String>,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub plan: String,            // "FREE" | "PRO" | "VIP" | ...
    pub remaining: Option<i64>,  // pair lookups left in the current period
    pub reset_at: Option<String>,
}

/// Payload of a rejected request, surfaced to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDenial {
    pub reason: String,
    pub plan: Option<String>,
    pub remaining: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Approved(AccessGrant),
    Denied(AccessDenial),
}

#[async_trait::async_trait]
pub trait AccessGate: Send + Sync + 'static {
    /// Consume one pair lookup for `req`, or refuse it.
    async fn authorize(&self, req: &AccessRequest) -> Result<AccessDecision, GateError>;
}

/// Approves everything. Used when no external gate is wired in.
pub struct OpenGate;

#[async_trait::async_trait]
impl AccessGate for OpenGate {
    async fn authorize(&self, _req: &AccessRequest) -> Result<AccessDecision, GateError> {
        Ok(AccessDecision::Approved(AccessGrant {
            plan: "FREE".into(),
            remaining: None,
            reset_at: None,
        }))
    }
}
