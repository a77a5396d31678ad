//! Transaction flow controllers.
//!
//! A [`TxFlow`] drives one on-chain action from intent to a confirmed,
//! reconciled state:
//!
//! ```text
//!            inputs ready          simulation ok         execute()
//!   Idle ────────────────► Idle ─────────────────► Prepared ─────────► Pending
//! (not ready)          (simulating)                                 │      │
//!      ▲                    │ simulation rejected                   │      │
//!      └────────────────────┘                         receipt ok ◄──┘      └──► failed
//!                                                 (Confirmed outcome)    (Failed outcome)
//! ```
//!
//! Transitions are plain methods that return [`FlowEffect`]s. The app loop
//! executes the effects (spawning provider calls, refetching reads, showing
//! toasts) and feeds results back in as [`FlowEvent`]s through the
//! [`FlowRegistry`].

pub mod action;
pub mod registry;

use alloy_primitives::{Address, TxHash};

use crate::domain::{ContractCall, ReadKey, TxError};

pub use action::{ActionEnv, TxAction};
pub use registry::{FlowEvent, FlowEventKind, FlowRegistry};

// ============================================================================
// Requests, Effects, Notifications
// ============================================================================

/// A write together with the account that sends it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WriteRequest {
    pub from: Address,
    pub call: ContractCall,
}

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Text with the `[+]` / `[x]` prefix the toast renderer colors by.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self.severity {
            Severity::Success => format!("[+] {}", self.message),
            Severity::Error => format!("[x] {}", self.message),
        }
    }
}

/// Work a transition asks the app loop to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEffect {
    /// Validate the write against current chain state.
    Simulate(WriteRequest),
    /// Submit the write.
    Submit(WriteRequest),
    /// Wait for the receipt of a submitted transaction.
    AwaitReceipt(TxHash),
    /// Refetch these reads.
    Refetch(Vec<ReadKey>),
    /// Show a notification.
    Notify(Notification),
}

// ============================================================================
// State
// ============================================================================

/// Why an idle flow cannot be executed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Inputs are missing (no account, unresolved reads, unmet prerequisite).
    NotReady(String),
    /// A simulation of the current inputs is in flight.
    Simulating,
    /// The current inputs would revert.
    Rejected(TxError),
}

/// Live state of a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle(Readiness),
    /// Simulated successfully; `execute()` is enabled.
    Prepared,
    /// Submitted, or being submitted. `None` until the hash is known.
    Pending(Option<TxHash>),
}

/// How the most recent invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Confirmed(TxHash),
    Failed(TxError),
}

// ============================================================================
// Flow Controller
// ============================================================================

/// Controller for one action instance.
#[derive(Debug, Clone)]
pub struct TxFlow {
    action: TxAction,
    request: Option<WriteRequest>,
    /// The request being submitted or confirmed; fixed for the whole invocation.
    in_flight: Option<WriteRequest>,
    state: FlowState,
    outcome: Option<Outcome>,
}

impl TxFlow {
    #[must_use]
    pub fn new(action: TxAction) -> Self {
        Self {
            action,
            request: None,
            in_flight: None,
            state: FlowState::Idle(Readiness::NotReady("Not prepared".to_string())),
            outcome: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &FlowState {
        &self.state
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.state, FlowState::Pending(_))
    }

    #[must_use]
    pub const fn can_execute(&self) -> bool {
        matches!(self.state, FlowState::Prepared)
    }

    /// Hash of the in-flight transaction, or of the last confirmed one.
    #[must_use]
    pub fn latest_hash(&self) -> Option<TxHash> {
        match (&self.state, &self.outcome) {
            (FlowState::Pending(Some(hash)), _) => Some(*hash),
            (_, Some(Outcome::Confirmed(hash))) => Some(*hash),
            _ => None,
        }
    }

    /// Feeds the current inputs in.
    ///
    /// A changed request (or one that was not ready before) starts a new
    /// simulation. While pending, the new inputs are only remembered.
    pub fn set_inputs(&mut self, inputs: Result<WriteRequest, String>) -> Vec<FlowEffect> {
        if self.is_pending() {
            self.request = inputs.ok();
            return Vec::new();
        }

        match inputs {
            Ok(request) => {
                let unchanged = self.request.as_ref() == Some(&request)
                    && !matches!(self.state, FlowState::Idle(Readiness::NotReady(_)));
                if unchanged {
                    return Vec::new();
                }
                self.request = Some(request.clone());
                self.state = FlowState::Idle(Readiness::Simulating);
                vec![FlowEffect::Simulate(request)]
            }
            Err(reason) => {
                self.request = None;
                self.state = FlowState::Idle(Readiness::NotReady(reason));
                Vec::new()
            }
        }
    }

    /// Re-simulates the current request, e.g. after the user asks for a refresh.
    pub fn resimulate(&mut self) -> Vec<FlowEffect> {
        match (&self.state, &self.request) {
            (FlowState::Pending(_), _) | (_, None) => Vec::new(),
            (_, Some(request)) => {
                let request = request.clone();
                self.state = FlowState::Idle(Readiness::Simulating);
                vec![FlowEffect::Simulate(request)]
            }
        }
    }

    /// Applies a simulation result. Results for stale requests are ignored.
    pub fn simulation_finished(
        &mut self,
        request: &WriteRequest,
        result: Result<(), TxError>,
    ) -> Vec<FlowEffect> {
        let current = self.request.as_ref() == Some(request);
        if !current || self.state != FlowState::Idle(Readiness::Simulating) {
            return Vec::new();
        }

        self.state = match result {
            Ok(()) => FlowState::Prepared,
            Err(error) => FlowState::Idle(Readiness::Rejected(error)),
        };
        Vec::new()
    }

    /// Starts a new invocation. A no-op unless the flow is prepared.
    pub fn execute(&mut self) -> Vec<FlowEffect> {
        if !self.can_execute() {
            return Vec::new();
        }
        let Some(request) = self.request.clone() else {
            return Vec::new();
        };

        self.outcome = None;
        self.in_flight = Some(request.clone());
        self.state = FlowState::Pending(None);
        vec![FlowEffect::Submit(request)]
    }

    /// Applies the result of submitting the write.
    pub fn submission_finished(&mut self, result: Result<TxHash, TxError>) -> Vec<FlowEffect> {
        if self.state != FlowState::Pending(None) {
            return Vec::new();
        }

        match result {
            Ok(hash) => {
                self.state = FlowState::Pending(Some(hash));
                vec![FlowEffect::AwaitReceipt(hash)]
            }
            Err(error) => self.settle_failed(error),
        }
    }

    /// Applies the confirmation result for `hash`.
    pub fn confirmation_finished(
        &mut self,
        hash: TxHash,
        result: Result<(), TxError>,
    ) -> Vec<FlowEffect> {
        if self.state != FlowState::Pending(Some(hash)) {
            return Vec::new();
        }

        match result {
            Ok(()) => {
                let from = self.in_flight.as_ref().map(|request| request.from);
                self.outcome = Some(Outcome::Confirmed(hash));
                let mut effects = Vec::with_capacity(3);
                if let Some(from) = from {
                    effects.push(FlowEffect::Refetch(self.action.invalidates(from)));
                }
                effects.push(FlowEffect::Notify(Notification::success(
                    self.action.success_message(),
                )));
                effects.extend(self.rearm());
                effects
            }
            Err(error) => self.settle_failed(error),
        }
    }

    fn settle_failed(&mut self, error: TxError) -> Vec<FlowEffect> {
        let mut effects = vec![FlowEffect::Notify(Notification::error(
            self.action.failure_message(&error),
        ))];
        self.outcome = Some(Outcome::Failed(error));
        effects.extend(self.rearm());
        effects
    }

    /// Returns to idle after an invocation settles, re-preparing if possible.
    fn rearm(&mut self) -> Vec<FlowEffect> {
        self.in_flight = None;
        match self.request.clone() {
            Some(request) => {
                self.state = FlowState::Idle(Readiness::Simulating);
                vec![FlowEffect::Simulate(request)]
            }
            None => {
                self.state = FlowState::Idle(Readiness::NotReady("Not prepared".to_string()));
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContractFunction, TokenId};
    use crate::test_utils::{ACCOUNT, STAKING};

    fn stake_request(id: u64) -> WriteRequest {
        WriteRequest {
            from: ACCOUNT,
            call: ContractCall::new(STAKING, ContractFunction::Stake(TokenId::new(id))),
        }
    }

    fn prepared(action: TxAction, request: &WriteRequest) -> TxFlow {
        let mut flow = TxFlow::new(action);
        let effects = flow.set_inputs(Ok(request.clone()));
        assert_eq!(effects, vec![FlowEffect::Simulate(request.clone())]);
        flow.simulation_finished(request, Ok(()));
        assert_eq!(flow.state(), &FlowState::Prepared);
        flow
    }

    fn count_notifications(effects: &[FlowEffect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, FlowEffect::Notify(_)))
            .count()
    }

    #[test]
    fn test_not_ready_inputs_disable_execute() {
        let mut flow = TxFlow::new(TxAction::Stake(TokenId::new(3)));
        assert!(flow.set_inputs(Err("Checking approval".into())).is_empty());
        assert_eq!(
            flow.state(),
            &FlowState::Idle(Readiness::NotReady("Checking approval".into()))
        );
        assert!(flow.execute().is_empty());
        assert_eq!(flow.outcome(), None);
    }

    #[test]
    fn test_unchanged_inputs_do_not_resimulate() {
        let request = stake_request(3);
        let mut flow = prepared(TxAction::Stake(TokenId::new(3)), &request);
        assert!(flow.set_inputs(Ok(request)).is_empty());
        assert!(flow.can_execute());
    }

    #[test]
    fn test_simulation_rejection_keeps_flow_idle() {
        let request = stake_request(3);
        let mut flow = TxFlow::new(TxAction::Stake(TokenId::new(3)));
        flow.set_inputs(Ok(request.clone()));
        flow.simulation_finished(
            &request,
            Err(TxError::SimulationFailed("not owner".into())),
        );
        assert_eq!(
            flow.state(),
            &FlowState::Idle(Readiness::Rejected(TxError::SimulationFailed(
                "not owner".into()
            )))
        );
        assert!(flow.execute().is_empty());
    }

    #[test]
    fn test_stale_simulation_is_ignored() {
        let old = stake_request(3);
        let new = WriteRequest {
            from: crate::test_utils::OTHER_ACCOUNT,
            ..old.clone()
        };
        let mut flow = TxFlow::new(TxAction::Stake(TokenId::new(3)));
        flow.set_inputs(Ok(old.clone()));
        flow.set_inputs(Ok(new.clone()));
        flow.simulation_finished(&old, Ok(()));
        assert_eq!(flow.state(), &FlowState::Idle(Readiness::Simulating));
        flow.simulation_finished(&new, Ok(()));
        assert!(flow.can_execute());
    }

    #[test]
    fn test_execute_is_not_reentrant_while_pending() {
        let request = stake_request(3);
        let mut flow = prepared(TxAction::Stake(TokenId::new(3)), &request);

        let first = flow.execute();
        let second = flow.execute();
        assert_eq!(first, vec![FlowEffect::Submit(request)]);
        assert!(second.is_empty());

        let hash = TxHash::repeat_byte(0x01);
        assert_eq!(
            flow.submission_finished(Ok(hash)),
            vec![FlowEffect::AwaitReceipt(hash)]
        );
        assert!(flow.execute().is_empty());
        assert_eq!(flow.state(), &FlowState::Pending(Some(hash)));
        assert_eq!(flow.latest_hash(), Some(hash));
    }

    #[test]
    fn test_confirmation_refetches_and_notifies_once() {
        let request = stake_request(3);
        let mut flow = prepared(TxAction::Stake(TokenId::new(3)), &request);
        flow.execute();
        let hash = TxHash::repeat_byte(0x02);
        flow.submission_finished(Ok(hash));

        let effects = flow.confirmation_finished(hash, Ok(()));
        assert_eq!(
            effects[0],
            FlowEffect::Refetch(vec![
                ReadKey::OwnedTokens(ACCOUNT),
                ReadKey::StakedTokens(ACCOUNT)
            ])
        );
        assert_eq!(
            effects[1],
            FlowEffect::Notify(Notification::success("Successfully staked your NFT!"))
        );
        assert_eq!(effects[2], FlowEffect::Simulate(request));
        assert_eq!(flow.outcome(), Some(&Outcome::Confirmed(hash)));

        assert!(flow.confirmation_finished(hash, Ok(())).is_empty());
    }

    #[test]
    fn test_submission_failure_notifies_without_refetch() {
        let request = stake_request(3);
        let mut flow = prepared(TxAction::Stake(TokenId::new(3)), &request);
        flow.execute();

        let effects = flow.submission_finished(Err(TxError::UserRejected));
        assert_eq!(count_notifications(&effects), 1);
        assert!(
            !effects
                .iter()
                .any(|e| matches!(e, FlowEffect::Refetch(_)))
        );
        assert_eq!(flow.outcome(), Some(&Outcome::Failed(TxError::UserRejected)));
        assert_eq!(flow.state(), &FlowState::Idle(Readiness::Simulating));

        flow.simulation_finished(&request, Ok(()));
        assert_eq!(flow.execute(), vec![FlowEffect::Submit(request)]);
        assert!(flow.is_pending());
        assert_eq!(flow.outcome(), None);
    }

    #[test]
    fn test_reverted_confirmation_fails() {
        let request = stake_request(0);
        let mut flow = prepared(TxAction::Stake(TokenId::new(0)), &request);
        flow.execute();
        let hash = TxHash::repeat_byte(0x03);
        flow.submission_finished(Ok(hash));

        let other = TxHash::repeat_byte(0x04);
        assert!(flow.confirmation_finished(other, Ok(())).is_empty());

        let effects = flow.confirmation_finished(
            hash,
            Err(TxError::ConfirmationFailed("reverted".into())),
        );
        assert_eq!(count_notifications(&effects), 1);
        assert!(
            !effects
                .iter()
                .any(|e| matches!(e, FlowEffect::Refetch(_)))
        );
        assert!(matches!(flow.outcome(), Some(Outcome::Failed(_))));
        assert_eq!(flow.latest_hash(), None);
    }

    #[test]
    fn test_inputs_while_pending_are_deferred() {
        let request = stake_request(3);
        let mut flow = prepared(TxAction::Stake(TokenId::new(3)), &request);
        flow.execute();
        assert!(flow.set_inputs(Err("Connect a wallet first".into())).is_empty());
        assert!(flow.is_pending());

        let hash = TxHash::repeat_byte(0x05);
        flow.submission_finished(Ok(hash));
        let effects = flow.confirmation_finished(hash, Ok(()));
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, FlowEffect::Refetch(keys) if keys.contains(&ReadKey::StakedTokens(ACCOUNT))))
        );
        assert!(matches!(
            flow.state(),
            FlowState::Idle(Readiness::NotReady(_))
        ));
    }

    #[test]
    fn test_notification_display_text() {
        assert_eq!(Notification::success("done").display_text(), "[+] done");
        assert_eq!(Notification::error("nope").display_text(), "[x] nope");
    }
}
