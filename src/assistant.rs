//! Assistant: the responder bound to persistent session memory
//!
//! Each turn loads the state from the store, runs the pipeline and writes the
//! state back. A store that cannot be written only costs that turn's changes.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::Result;
use crate::matcher::KnowledgeBase;
use crate::memory::{BlobStore, JsonFileStore, MemoryLimits, SessionMemory, SessionState};
use crate::responder::{Reply, Responder};

pub struct Assistant {
    responder: Responder,
    memory: SessionMemory,
}

impl Assistant {
    pub fn new(responder: Responder, store: Arc<dyn BlobStore>) -> Self {
        let limits = *responder.limits();
        Self {
            responder,
            memory: SessionMemory::new(store, limits),
        }
    }

    /// Assistant persisting to the configured state directory
    pub fn from_config(config: &Config) -> Result<Self> {
        let knowledge = match config.knowledge_file() {
            Some(path) => KnowledgeBase::from_json_file(&path)?,
            None => KnowledgeBase::builtin(),
        };
        let responder = Responder::from_config(config, knowledge)?;
        let store = JsonFileStore::new(config.state_dir())?;
        Ok(Self::new(responder, Arc::new(store)))
    }

    /// Run one turn: load, respond, save
    pub async fn turn(&mut self, input: &str) -> Reply {
        let mut state = self.memory.load_state();
        let reply = self.responder.respond(&mut state, input).await;
        self.memory.save_best_effort(&state);
        reply
    }

    /// Current persisted state
    pub fn state(&self) -> SessionState {
        self.memory.load_state()
    }

    /// Remove one learned correction, returning its answer
    pub fn forget_correction(&self, question: &str) -> Result<Option<String>> {
        let mut state = self.memory.load_state();
        let removed = state.corrections.forget(question);
        if removed.is_some() {
            self.memory.save_state(&state)?;
        }
        Ok(removed)
    }

    /// Forget everything: profile, log, corrections and contexts
    pub fn reset(&self) -> Result<()> {
        self.memory.clear()
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    pub fn limits(&self) -> &MemoryLimits {
        self.memory.limits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::IntentMatcher;
    use crate::memory::MemoryStore;
    use crate::responder::ReplySource;

    fn assistant() -> Assistant {
        let responder = Responder::new(IntentMatcher::default()).with_seed(1);
        Assistant::new(responder, Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_turns_share_state_through_the_store() {
        let mut assistant = assistant();
        assistant.turn("nama saya Budi").await;
        let reply = assistant.turn("siapa nama saya").await;
        assert_eq!(reply.source, ReplySource::NameRecall);
        assert_eq!(assistant.state().log.len(), 2);
    }

    #[tokio::test]
    async fn test_forget_correction() {
        let mut assistant = assistant();
        assistant.turn("ibukota seharusnya: Jakarta").await;
        assert_eq!(assistant.forget_correction("ibukota").unwrap().as_deref(), Some("Jakarta"));
        assert!(assistant.forget_correction("ibukota").unwrap().is_none());
        assert!(assistant.state().corrections.is_empty());
    }

    #[tokio::test]
    async fn test_reset() {
        let mut assistant = assistant();
        assistant.turn("nama saya Budi").await;
        assistant.reset().unwrap();
        assert_eq!(assistant.state(), SessionState::default());
    }
}
