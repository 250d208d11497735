//! Agent cache keyed by API key.
//!
//! A new client is built the first time a key is seen and reused afterwards,
//! so changing the key in the UI never mutates an existing client.

use crate::agent::SummarizerAgent;
use crate::gemini::GeminiBackend;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub struct AgentCache {
    model: String,
    timeout: Duration,
    agents: HashMap<String, Arc<SummarizerAgent>>,
}

impl AgentCache {
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            model: model.into(),
            timeout,
            agents: HashMap::new(),
        }
    }

    /// Return the agent for `key`, creating it on first use.
    ///
    /// A blank key yields an uninitialized agent that is not cached and never
    /// falls back to the environment.
    pub fn get_or_create(&mut self, key: &str) -> Arc<SummarizerAgent> {
        let key = key.trim();
        if key.is_empty() {
            let timeout = self.timeout;
            return Arc::new(SummarizerAgent::from_parts(None, self.model.clone(), |k| {
                GeminiBackend::new(k, timeout)
            }));
        }

        if let Some(agent) = self.agents.get(key) {
            return Arc::clone(agent);
        }

        let agent = Arc::new(SummarizerAgent::new(
            Some(key.to_string()),
            self.model.clone(),
            self.timeout,
        ));
        self.agents.insert(key.to_string(), Arc::clone(&agent));
        agent
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
