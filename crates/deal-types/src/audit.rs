//! Tamper-evident audit trail for deal workflow events

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Audit chain broken at event {index}: expected previous hash {expected:?}, found {found:?}")]
    BrokenLink {
        index: usize,
        expected: Option<String>,
        found: Option<String>,
    },

    #[error("Audit chain for deal {expected} contains an event for deal {found}")]
    ForeignEvent { expected: String, found: String },

    #[error("Audit chain serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Types of auditable deal events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    CreateDeal { name: String },
    UploadDocument { filename: String, sha256: String },
    Extract { prompt: String },
    EditTerms { confirmed_fields: Vec<String> },
    Analyze { overall_triage: String },
    Draft { prompt: String },
    Export,
}

impl AuditAction {
    /// Wire name of the action, e.g. `EDIT_TERMS`
    pub fn label(&self) -> &'static str {
        match self {
            AuditAction::CreateDeal { .. } => "CREATE_DEAL",
            AuditAction::UploadDocument { .. } => "UPLOAD_DOCUMENT",
            AuditAction::Extract { .. } => "EXTRACT",
            AuditAction::EditTerms { .. } => "EDIT_TERMS",
            AuditAction::Analyze { .. } => "ANALYZE",
            AuditAction::Draft { .. } => "DRAFT",
            AuditAction::Export => "EXPORT",
        }
    }

    /// Payload rendered as `key=value` pairs, empty for `Export`
    pub fn fields(&self) -> String {
        match self {
            AuditAction::CreateDeal { name } => format!("name={}", name),
            AuditAction::UploadDocument { filename, sha256 } => {
                format!("filename={} sha256={}", filename, sha256)
            }
            AuditAction::Extract { prompt } | AuditAction::Draft { prompt } => {
                format!("prompt={}", prompt)
            }
            AuditAction::EditTerms { confirmed_fields } => {
                format!("confirmed_fields={}", confirmed_fields.join(","))
            }
            AuditAction::Analyze { overall_triage } => format!("overall_triage={}", overall_triage),
            AuditAction::Export => String::new(),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: String,
    pub timestamp: String,
    pub action: AuditAction,
    pub actor: String,
    pub deal_id: String,
    pub previous_hash: Option<String>,
    pub details: Option<String>,
}

impl AuditEvent {
    pub fn new(
        action: AuditAction,
        actor: &str,
        deal_id: &str,
        previous_hash: Option<String>,
        details: Option<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            action,
            actor: actor.to_string(),
            deal_id: deal_id.to_string(),
            previous_hash,
            details,
        }
    }

    /// Compute the hash of this event (for chain linking)
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.event_id.as_bytes());
        hasher.update(self.timestamp.as_bytes());
        hasher.update(self.action.label().as_bytes());
        hasher.update(self.action.fields().as_bytes());
        hasher.update(self.actor.as_bytes());
        hasher.update(self.deal_id.as_bytes());
        if let Some(ref prev) = self.previous_hash {
            hasher.update(prev.as_bytes());
        }
        if let Some(ref details) = self.details {
            hasher.update(details.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Chain of audit events for one deal, linked by hash
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AuditChain {
    pub events: Vec<AuditEvent>,
    pub deal_id: String,
    pub created_at: String,
}

impl AuditChain {
    pub fn new(deal_id: &str) -> Self {
        Self {
            events: Vec::new(),
            deal_id: deal_id.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn last_hash(&self) -> Option<String> {
        self.events.last().map(|e| e.compute_hash())
    }

    /// Append an event, automatically linking to previous hash
    pub fn append(
        &mut self,
        action: AuditAction,
        actor: &str,
        details: Option<String>,
    ) -> &AuditEvent {
        let previous_hash = self.last_hash();
        let event = AuditEvent::new(action, actor, &self.deal_id, previous_hash, details);
        self.events.push(event);
        &self.events[self.events.len() - 1]
    }

    /// Check every link and that all events belong to this deal
    pub fn verify(&self) -> Result<(), AuditError> {
        let mut expected: Option<String> = None;

        for (index, event) in self.events.iter().enumerate() {
            if event.deal_id != self.deal_id {
                return Err(AuditError::ForeignEvent {
                    expected: self.deal_id.clone(),
                    found: event.deal_id.clone(),
                });
            }
            if event.previous_hash != expected {
                return Err(AuditError::BrokenLink {
                    index,
                    expected,
                    found: event.previous_hash.clone(),
                });
            }
            expected = Some(event.compute_hash());
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn to_json(&self) -> Result<String, AuditError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, AuditError> {
        Ok(serde_json::from_str(json)?)
    }

    /// One line per event, for display
    pub fn summary(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|e| {
                let date = e.timestamp.split('T').next().unwrap_or(&e.timestamp);
                let fields = e.action.fields();
                if fields.is_empty() {
                    format!("[{}] {} {}", date, e.actor, e.action.label())
                } else {
                    format!("[{}] {} {} {}", date, e.actor, e.action.label(), fields)
                }
            })
            .collect()
    }
}

/// Hex SHA-256 of raw bytes (document fingerprints)
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Hex SHA-256 of UTF-8 text (prompt and template fingerprints)
pub fn hash_text(text: &str) -> String {
    hash_bytes(text.as_bytes())
}
