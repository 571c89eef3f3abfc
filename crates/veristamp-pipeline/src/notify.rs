//! Completion events.
//!
//! The worker announces each finished issuance on a topic so embedders
//! can react (webhooks, cache invalidation) without polling. Delivery
//! is best effort; a failed publish never rolls back an issued proof.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Topic published once a proof reaches the issued state.
pub const PROOF_CREATED_TOPIC: &str = "veristamp:proof-created";

/// Outbound event hook.
#[async_trait]
pub trait ProofNotifier: Send + Sync {
    async fn publish(&self, topic: &str, payload: Value) -> Result<()>;
}

/// Notifier that drops every event.
#[derive(Debug, Default)]
pub struct NullNotifier;

#[async_trait]
impl ProofNotifier for NullNotifier {
    async fn publish(&self, _topic: &str, _payload: Value) -> Result<()> {
        Ok(())
    }
}

/// Notifier that records events in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    events: Mutex<Vec<(String, Value)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(topic, payload)` published so far, in publish order.
    pub fn events(&self) -> Vec<(String, Value)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProofNotifier for MemoryNotifier {
    async fn publish(&self, topic: &str, payload: Value) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier
            .publish(PROOF_CREATED_TOPIC, json!({"id": "veristamp:aa"}))
            .await
            .unwrap();
        notifier
            .publish(PROOF_CREATED_TOPIC, json!({"id": "veristamp:bb"}))
            .await
            .unwrap();

        let events = notifier.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, PROOF_CREATED_TOPIC);
        assert_eq!(events[0].1["id"], "veristamp:aa");
        assert_eq!(events[1].1["id"], "veristamp:bb");
    }

    #[tokio::test]
    async fn test_null_notifier_accepts_everything() {
        let notifier = NullNotifier;
        notifier
            .publish(PROOF_CREATED_TOPIC, json!({}))
            .await
            .unwrap();
    }
}
