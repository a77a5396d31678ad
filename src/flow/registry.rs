//! Registry of the flows owned by the mounted view.
//!
//! The registry routes provider results back to the right controller,
//! guards against settling the same transaction handle twice, and owns the
//! view session: tearing a session down aborts its tasks and makes any result
//! still in the channel stale.

use std::collections::{BTreeMap, HashSet};

use alloy_primitives::TxHash;
use tokio::task::AbortHandle;

use super::{FlowEffect, TxAction, TxFlow, WriteRequest};
use crate::domain::TxError;

// ============================================================================
// Events
// ============================================================================

/// A provider result addressed to one flow of one view session.
#[derive(Debug, Clone)]
pub struct FlowEvent {
    pub session: u64,
    pub action: TxAction,
    pub kind: FlowEventKind,
}

#[derive(Debug, Clone)]
pub enum FlowEventKind {
    Simulated {
        request: WriteRequest,
        result: Result<(), TxError>,
    },
    Submitted(Result<TxHash, TxError>),
    Confirmed {
        hash: TxHash,
        result: Result<(), TxError>,
    },
}

// ============================================================================
// Registry
// ============================================================================

/// The flows of the current view session.
#[derive(Debug, Default)]
pub struct FlowRegistry {
    session: u64,
    tasks: Vec<AbortHandle>,
    flows: BTreeMap<TxAction, TxFlow>,
    settled: HashSet<TxHash>,
}

impl FlowRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the current view session.
    #[must_use]
    pub const fn session(&self) -> u64 {
        self.session
    }

    #[must_use]
    pub fn get(&self, action: &TxAction) -> Option<&TxFlow> {
        self.flows.get(action)
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.flows.values().any(TxFlow::is_pending)
    }

    /// Records a task spawned on behalf of this session.
    pub fn track(&mut self, task: AbortHandle) {
        self.tasks.retain(|t| !t.is_finished());
        self.tasks.push(task);
    }

    /// Ends the current session: aborts its tasks, drops its flows and
    /// forgets the hashes they settled.
    ///
    /// Results that were already queued carry the old session id and are
    /// discarded by [`FlowRegistry::apply`].
    pub fn teardown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if !self.flows.is_empty() {
            tracing::debug!(session = self.session, flows = self.flows.len(), "view session torn down");
        }
        self.flows.clear();
        self.settled.clear();
        self.session = self.session.wrapping_add(1);
    }

    /// Reconciles the registry with the actions the view currently offers.
    ///
    /// New actions get a fresh flow, existing flows receive their current
    /// inputs, and flows whose action disappeared are dropped unless pending.
    pub fn sync(
        &mut self,
        desired: Vec<(TxAction, Result<WriteRequest, String>)>,
    ) -> Vec<(TxAction, FlowEffect)> {
        let wanted: HashSet<TxAction> = desired.iter().map(|(action, _)| *action).collect();
        self.flows
            .retain(|action, flow| wanted.contains(action) || flow.is_pending());

        let mut effects = Vec::new();
        for (action, inputs) in desired {
            let flow = self
                .flows
                .entry(action)
                .or_insert_with(|| TxFlow::new(action));
            effects.extend(flow.set_inputs(inputs).into_iter().map(|e| (action, e)));
        }
        effects
    }

    /// Starts a new invocation of `action`. A no-op unless it is prepared.
    pub fn execute(&mut self, action: TxAction) -> Vec<(TxAction, FlowEffect)> {
        self.flows
            .get_mut(&action)
            .map(|flow| flow.execute().into_iter().map(|e| (action, e)).collect())
            .unwrap_or_default()
    }

    /// Re-simulates every idle or prepared flow.
    pub fn resimulate_all(&mut self) -> Vec<(TxAction, FlowEffect)> {
        self.flows
            .iter_mut()
            .flat_map(|(action, flow)| {
                let action = *action;
                flow.resimulate().into_iter().map(move |e| (action, e))
            })
            .collect()
    }

    /// Routes a provider result to its flow.
    pub fn apply(&mut self, event: FlowEvent) -> Vec<(TxAction, FlowEffect)> {
        if event.session != self.session {
            tracing::debug!(
                stale = event.session,
                current = self.session,
                "dropping result from a torn-down view"
            );
            return Vec::new();
        }
        let Some(flow) = self.flows.get_mut(&event.action) else {
            return Vec::new();
        };

        let effects = match event.kind {
            FlowEventKind::Simulated { request, result } => {
                flow.simulation_finished(&request, result)
            }
            FlowEventKind::Submitted(result) => flow.submission_finished(result),
            FlowEventKind::Confirmed { hash, result } => {
                if !self.settled.insert(hash) {
                    tracing::warn!(%hash, "ignoring duplicate settlement");
                    return Vec::new();
                }
                flow.confirmation_finished(hash, result)
            }
        };

        effects.into_iter().map(|e| (event.action, e)).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContractCall, ContractFunction, TokenId};
    use crate::flow::FlowState;
    use crate::test_utils::{ACCOUNT, STAKING};

    fn unstake(id: u64) -> (TxAction, WriteRequest) {
        let token = TokenId::new(id);
        (
            TxAction::Unstake(token),
            WriteRequest {
                from: ACCOUNT,
                call: ContractCall::new(STAKING, ContractFunction::Unstake(token)),
            },
        )
    }

    fn event(registry: &FlowRegistry, action: TxAction, kind: FlowEventKind) -> FlowEvent {
        FlowEvent {
            session: registry.session(),
            action,
            kind,
        }
    }

    fn prepare(registry: &mut FlowRegistry, action: TxAction, request: &WriteRequest) {
        let sim = event(
            registry,
            action,
            FlowEventKind::Simulated {
                request: request.clone(),
                result: Ok(()),
            },
        );
        registry.apply(sim);
    }

    #[test]
    fn test_sibling_flows_are_independent() {
        let mut registry = FlowRegistry::new();
        let (a, req_a) = unstake(0);
        let (b, req_b) = unstake(1);
        let effects = registry.sync(vec![(a, Ok(req_a.clone())), (b, Ok(req_b.clone()))]);
        assert_eq!(effects.len(), 2);

        prepare(&mut registry, a, &req_a);
        prepare(&mut registry, b, &req_b);
        assert_eq!(registry.execute(a).len(), 1);

        assert!(registry.get(&a).unwrap().is_pending());
        assert_eq!(registry.get(&b).unwrap().state(), &FlowState::Prepared);
    }

    #[test]
    fn test_duplicate_confirmation_is_ignored() {
        let mut registry = FlowRegistry::new();
        let (action, request) = unstake(3);
        registry.sync(vec![(action, Ok(request.clone()))]);
        prepare(&mut registry, action, &request);
        registry.execute(action);

        let hash = TxHash::repeat_byte(0x0a);
        let submitted = event(&registry, action, FlowEventKind::Submitted(Ok(hash)));
        registry.apply(submitted);

        let confirmed = event(
            &registry,
            action,
            FlowEventKind::Confirmed {
                hash,
                result: Ok(()),
            },
        );
        let first = registry.apply(confirmed.clone());
        let second = registry.apply(confirmed);

        let notifications = first
            .iter()
            .filter(|(_, e)| matches!(e, FlowEffect::Notify(_)))
            .count();
        assert_eq!(notifications, 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_teardown_drops_stale_events() {
        let mut registry = FlowRegistry::new();
        let (action, request) = unstake(2);
        registry.sync(vec![(action, Ok(request.clone()))]);
        prepare(&mut registry, action, &request);
        registry.execute(action);

        let hash = TxHash::repeat_byte(0x0b);
        let stale_submit = event(&registry, action, FlowEventKind::Submitted(Ok(hash)));
        registry.teardown();

        assert!(registry.apply(stale_submit).is_empty());
        assert!(registry.get(&action).is_none());
        assert_eq!(registry.session(), 1);
    }

    #[test]
    fn test_teardown_forgets_settled_hashes() {
        let mut registry = FlowRegistry::new();
        let (action, request) = unstake(4);
        registry.sync(vec![(action, Ok(request.clone()))]);
        prepare(&mut registry, action, &request);
        registry.execute(action);

        let hash = TxHash::repeat_byte(0x0c);
        registry.apply(event(&registry, action, FlowEventKind::Submitted(Ok(hash))));
        registry.apply(event(
            &registry,
            action,
            FlowEventKind::Confirmed {
                hash,
                result: Ok(()),
            },
        ));
        assert!(registry.settled.contains(&hash));

        registry.teardown();
        assert!(registry.settled.is_empty());
    }

    #[test]
    fn test_sync_prunes_missing_actions_but_keeps_pending() {
        let mut registry = FlowRegistry::new();
        let (a, req_a) = unstake(0);
        let (b, req_b) = unstake(1);
        registry.sync(vec![(a, Ok(req_a.clone())), (b, Ok(req_b))]);
        prepare(&mut registry, a, &req_a);
        registry.execute(a);

        registry.sync(Vec::new());
        assert!(registry.get(&a).is_some());
        assert!(registry.get(&b).is_none());
        assert!(registry.has_pending());
    }

    #[test]
    fn test_execute_unknown_action_is_noop() {
        let mut registry = FlowRegistry::new();
        assert!(registry.execute(TxAction::Mint).is_empty());
    }

    #[tokio::test]
    async fn test_teardown_aborts_tracked_tasks() {
        let mut registry = FlowRegistry::new();
        let task = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        registry.track(task.abort_handle());
        registry.teardown();
        let result = task.await;
        assert!(result.unwrap_err().is_cancelled());
    }
}
