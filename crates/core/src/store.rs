//! Client-side test case store.
//!
//! All state changes go through [`Mutation`]s applied by [`apply`], one at a
//! time. Mutations are synchronous and total.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::model::{TestCaseUpdate, TestSpecification, TestStatus};

/// Websocket side of the store. `C` is the connection handle type.
#[derive(Debug, Clone, PartialEq)]
pub struct WebSocketState<C> {
    pub connection: Option<C>,
    /// Every message received, in arrival order. Never evicted.
    pub messages: Vec<Value>,
}

impl<C> Default for WebSocketState<C> {
    fn default() -> Self {
        Self {
            connection: None,
            messages: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<C> {
    pub test_cases: Vec<TestSpecification>,
    pub has_run_started: bool,
    pub ws: WebSocketState<C>,
}

impl<C> Default for StoreState<C> {
    fn default() -> Self {
        Self {
            test_cases: vec![],
            has_run_started: false,
            ws: WebSocketState::default(),
        }
    }
}

/// The named store mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<C> {
    SetTestCases(Vec<TestSpecification>),
    SetHasRunStarted(bool),
    SetWebSocketConnection(Option<C>),
    SetWebSocketMessage(Value),
    UpdateTestCase(TestCaseUpdate),
    /// Overwrites every case's status. Clearing a status back to unset is not
    /// expressible; use `SetTestCases` with fresh cases instead.
    SetTestCasesStatus(TestStatus),
}

impl<C> Mutation<C> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetTestCases(_) => "SET_TEST_CASES",
            Self::SetHasRunStarted(_) => "SET_HAS_RUN_STARTED",
            Self::SetWebSocketConnection(_) => "SET_WEBSOCKET_CONNECTION",
            Self::SetWebSocketMessage(_) => "SET_WEBSOCKET_MESSAGE",
            Self::UpdateTestCase(_) => "UPDATE_TEST_CASE",
            Self::SetTestCasesStatus(_) => "SET_TEST_CASES_STATUS",
        }
    }
}

impl<C> StoreState<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&mut self, mutation: Mutation<C>) {
        apply(self, mutation);
    }

    /// Websocket message handler: records the message, then applies it as a
    /// test case update when it has that shape.
    pub fn receive_message(&mut self, message: Value) {
        let update = serde_json::from_value::<TestCaseUpdate>(message.clone()).ok();
        self.commit(Mutation::SetWebSocketMessage(message));
        if let Some(update) = update {
            self.commit(Mutation::UpdateTestCase(update));
        }
    }
}

/// Applies one mutation to `state`.
pub fn apply<C>(state: &mut StoreState<C>, mutation: Mutation<C>) {
    debug!(mutation = mutation.name(), "commit");
    match mutation {
        Mutation::SetTestCases(test_cases) => {
            let dupes = duplicate_test_case_ids(&test_cases);
            if !dupes.is_empty() {
                warn!(?dupes, "test case ids are not unique; updates resolve to the first match");
            }
            state.test_cases = test_cases;
        }
        Mutation::SetHasRunStarted(started) => state.has_run_started = started,
        Mutation::SetWebSocketConnection(connection) => state.ws.connection = connection,
        Mutation::SetWebSocketMessage(message) => state.ws.messages.push(message),
        Mutation::UpdateTestCase(update) => update_test_case(state, &update),
        Mutation::SetTestCasesStatus(status) => {
            // Rebuild rather than patch in place.
            state.test_cases = state
                .test_cases
                .iter()
                .map(|spec| TestSpecification {
                    test_cases: spec
                        .test_cases
                        .iter()
                        .map(|case| {
                            let mut case = case.clone();
                            case.meta.status = Some(status);
                            case
                        })
                        .collect(),
                    extra: spec.extra.clone(),
                })
                .collect();
        }
    }
}

fn update_test_case<C>(state: &mut StoreState<C>, update: &TestCaseUpdate) {
    let id = update.test.id.as_str();
    let found = state
        .test_cases
        .iter_mut()
        .flat_map(|spec| spec.test_cases.iter_mut())
        .find(|case| case.id == id);

    match found {
        Some(case) => case.meta.status = Some(TestStatus::from_pass(update.test.pass)),
        None => {
            let known = state
                .test_cases
                .iter()
                .map(|spec| spec.test_cases.len())
                .sum::<usize>();
            error!(id, known, ?update, "failed to find test case");
        }
    }
}

/// Ids that occur on more than one test case, across all specifications.
pub fn duplicate_test_case_ids(specs: &[TestSpecification]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut dupes = BTreeSet::new();
    for case in specs.iter().flat_map(|spec| &spec.test_cases) {
        if !seen.insert(case.id.as_str()) {
            dupes.insert(case.id.clone());
        }
    }
    dupes.into_iter().collect()
}
