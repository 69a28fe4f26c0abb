//! Dialogue engine - session layer around the interpreter
//!
//! Looks up the caller's [`DialogueState`], resolves the scenario document,
//! runs one pure interpreter transition and persists the result. The transport
//! is expected to serialize events per user; different users are independent.

use crate::domain::errors::EngineError;
use crate::domain::repositories::{AccessPolicy, DialogueStore, ScenarioRepository, ScenarioSummary};
use crate::domain::value_objects::{ScenarioId, UserId};
use crate::infrastructure::access::OpenAccess;
use crate::runtime;
use crate::types::{DialogueState, Event, NoOpReason, Outcome, ScenarioDocument, Transition};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Entry point consumed by transports
pub struct DialogueEngine {
    scenarios: Arc<dyn ScenarioRepository>,
    store: Arc<dyn DialogueStore>,
    access: Arc<dyn AccessPolicy>,
    documents: RwLock<HashMap<ScenarioId, Arc<ScenarioDocument>>>,
}

impl DialogueEngine {
    /// Engine that admits every user
    pub fn new(scenarios: Arc<dyn ScenarioRepository>, store: Arc<dyn DialogueStore>) -> Self {
        Self::with_access_policy(scenarios, store, Arc::new(OpenAccess))
    }

    pub fn with_access_policy(
        scenarios: Arc<dyn ScenarioRepository>,
        store: Arc<dyn DialogueStore>,
        access: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self {
            scenarios,
            store,
            access,
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Start `scenario` for `user`, discarding whatever they were doing before
    pub async fn start_scenario(&self, user: UserId, scenario: &ScenarioId) -> Result<Outcome, EngineError> {
        self.check_access(user).await?;

        let doc = self.document(scenario).await?;
        let transition = runtime::start(&doc);
        info!("User {} started scenario {}", user, scenario);
        self.persist(user, transition).await
    }

    /// Feed one event for `user` into their running scenario
    pub async fn handle_event(&self, user: UserId, event: Event) -> Result<Outcome, EngineError> {
        self.check_access(user).await?;

        let Some(state) = self.store.get(user).await? else {
            debug!("User {} sent {} without an active scenario", user, event.name());
            return Ok(Outcome::NoOp(NoOpReason::NoActiveScenario));
        };

        let doc = self.active_document(user, &state).await?;

        let transition = runtime::step(&state, &doc, &event);
        if transition.state.as_ref() == Some(&state) {
            return Ok(transition.outcome);
        }
        self.persist(user, transition).await
    }

    /// Re-render the step the user is currently on
    pub async fn resume(&self, user: UserId) -> Result<Outcome, EngineError> {
        self.check_access(user).await?;

        let Some(state) = self.store.get(user).await? else {
            return Ok(Outcome::NoOp(NoOpReason::NoActiveScenario));
        };
        let doc = self.active_document(user, &state).await?;
        if state.is_pending() {
            // The pending prompt is not part of the document; start the step over
            let transition = runtime::render(&doc, &state.at_step(state.step_index), None);
            return self.persist(user, transition).await;
        }

        Ok(runtime::render(&doc, &state, None).outcome)
    }

    /// Available scenarios for a menu
    pub async fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>, EngineError> {
        Ok(self.scenarios.list_available().await?)
    }

    /// Abandon the user's running scenario, if any
    pub async fn cancel(&self, user: UserId) -> Result<(), EngineError> {
        self.store.clear(user).await?;
        debug!("User {} cancelled their scenario", user);
        Ok(())
    }

    pub async fn current_state(&self, user: UserId) -> Result<Option<DialogueState>, EngineError> {
        Ok(self.store.get(user).await?)
    }

    /// Forget a cached document so the next use reloads it
    pub async fn reload(&self, scenario: &ScenarioId) {
        self.documents.write().await.remove(scenario);
    }

    pub async fn invalidate_cache(&self) {
        self.documents.write().await.clear();
    }

    async fn check_access(&self, user: UserId) -> Result<(), EngineError> {
        if self.access.is_allowed(user).await {
            Ok(())
        } else {
            info!("Access denied for user {}", user);
            Err(EngineError::AccessDenied { user })
        }
    }

    /// Document behind a saved state, dropping the state when it cannot be used
    ///
    /// Missing or malformed scenarios and cursors that no longer fit an edited
    /// document clear the state. I/O failures leave it for a later retry.
    async fn active_document(
        &self,
        user: UserId,
        state: &DialogueState,
    ) -> Result<Arc<ScenarioDocument>, EngineError> {
        let scenario = ScenarioId::from(state.scenario_id.as_str());
        let doc = match self.document(&scenario).await {
            Ok(doc) => doc,
            Err(e) => {
                if e.is_not_found() || e.is_unavailable() {
                    warn!("Dropping state of user {}: scenario {} unavailable: {}", user, scenario, e);
                    self.store.clear(user).await?;
                }
                return Err(e);
            }
        };

        if !state.fits(doc.len()) {
            warn!(
                "Dropping state of user {}: step {} no longer fits scenario {} of {} steps",
                user,
                state.step_index,
                scenario,
                doc.len()
            );
            self.store.clear(user).await?;
            return Err(EngineError::StaleState {
                scenario,
                step: state.step_index,
            });
        }
        Ok(doc)
    }

    /// Shared read-only document, loaded on first use
    async fn document(&self, scenario: &ScenarioId) -> Result<Arc<ScenarioDocument>, EngineError> {
        if let Some(doc) = self.documents.read().await.get(scenario) {
            return Ok(Arc::clone(doc));
        }

        let doc = Arc::new(self.scenarios.load_scenario(scenario).await?);
        debug!("Loaded scenario {} ({} steps)", scenario, doc.len());
        let mut documents = self.documents.write().await;
        let cached = documents.entry(scenario.clone()).or_insert(doc);
        Ok(Arc::clone(cached))
    }

    async fn persist(&self, user: UserId, transition: Transition) -> Result<Outcome, EngineError> {
        match transition.state {
            Some(state) => self.store.set(user, state).await?,
            None => {
                info!("User {} completed their scenario", user);
                self.store.clear(user).await?
            }
        }
        Ok(transition.outcome)
    }
}
