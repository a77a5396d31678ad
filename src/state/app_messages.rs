//! Message processing, the reconcile pass and effect execution.
//!
//! After every batch of messages or commands the app reconciles:
//!
//! 1. every read the mounted view depends on is requested (at most once),
//! 2. every action the view offers is synced into the flow registry with its
//!    current inputs,
//! 3. the effects the flows asked for are executed.
//!
//! Flow tasks are tracked by the registry so a view teardown aborts them;
//! read tasks are not, since read results are shared by every view.

use crate::domain::{ReadKey, TxError};
use crate::flow::{FlowEffect, FlowEvent, FlowEventKind, TxAction, WriteRequest};

use super::data::FetchTicket;
use super::view::{desired_actions, visible_reads};
use super::{App, AppMessage};

impl App {
    /// Applies every queued message, then reconciles once.
    pub fn process_messages(&mut self) {
        let mut received = false;
        while let Ok(message) = self.message_rx.try_recv() {
            received = true;
            self.handle_message(message);
        }
        if received {
            self.reconcile();
        }
    }

    fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::ReadResolved { ticket, result } => {
                self.data.resolve(ticket, result);
            }
            AppMessage::AccountsLoaded { attempt, result } => {
                match self.wallet.finish_connect(attempt, result) {
                    Ok(Some(account)) => {
                        tracing::info!(%account, "wallet connected");
                        self.ui.show_toast(
                            format!("[+] Connected {}", super::wallet::short_address(&account)),
                            20,
                        );
                    }
                    Ok(None) => {}
                    Err(error) => {
                        tracing::warn!(%error, "wallet connection failed");
                        self.ui.show_message(format!("Could not connect: {error}"));
                    }
                }
            }
            AppMessage::Flow(event) => {
                let effects = self.flows.apply(event);
                self.run_effects(effects);
            }
        }
    }

    /// Brings reads and flows in line with the mounted view.
    pub(crate) fn reconcile(&mut self) {
        let view = self.nav.view();

        let keys = visible_reads(view, &self.view_inputs());
        for key in keys {
            if let Some(ticket) = self.data.request(key) {
                self.spawn_fetch(ticket);
            }
        }

        let desired = desired_actions(view, &self.view_inputs());
        let effects = self.flows.sync(desired);
        self.run_effects(effects);
    }

    /// Refetches the watched reads (rewards, balances) of the mounted view.
    pub(crate) fn poll_watched_reads(&mut self) {
        let watched: Vec<ReadKey> = visible_reads(self.nav.view(), &self.view_inputs())
            .into_iter()
            .filter(ReadKey::is_watched)
            .filter(|key| !self.data.is_loading(key))
            .collect();
        if watched.is_empty() {
            return;
        }
        tracing::debug!(count = watched.len(), "polling watched reads");
        for ticket in self.data.invalidate(watched) {
            self.spawn_fetch(ticket);
        }
    }

    // ========================================================================
    // Effects
    // ========================================================================

    pub(crate) fn run_effects(&mut self, effects: Vec<(TxAction, FlowEffect)>) {
        for (action, effect) in effects {
            match effect {
                FlowEffect::Simulate(request) => self.spawn_simulation(action, request),
                FlowEffect::Submit(request) => self.spawn_submission(action, request),
                FlowEffect::AwaitReceipt(hash) => self.spawn_confirmation(action, hash),
                FlowEffect::Refetch(keys) => {
                    tracing::debug!(?action, ?keys, "refetching invalidated reads");
                    for ticket in self.data.invalidate(keys) {
                        self.spawn_fetch(ticket);
                    }
                }
                FlowEffect::Notify(notification) => self.ui.notify(notification),
            }
        }
    }

    pub(crate) fn spawn_fetch(&self, ticket: FetchTicket) {
        let call = match ticket.key.call(&self.config.contracts()) {
            Ok(call) => call,
            Err(e) => {
                let _ = self.message_tx.send(AppMessage::ReadResolved {
                    ticket,
                    result: Err(e.to_string()),
                });
                return;
            }
        };
        let provider = self.provider.clone();
        let message_tx = self.message_tx.clone();

        tokio::spawn(async move {
            let result = provider
                .read(&call)
                .await
                .and_then(|data| ticket.key.decode(&data))
                .map_err(|e| e.to_string());
            // Receiver may be dropped during shutdown - safe to ignore
            let _ = message_tx.send(AppMessage::ReadResolved { ticket, result });
        });
    }

    fn spawn_flow_task<F>(&mut self, action: TxAction, task: F)
    where
        F: Future<Output = FlowEventKind> + Send + 'static,
    {
        let session = self.flows.session();
        let message_tx = self.message_tx.clone();
        let handle = tokio::spawn(async move {
            let kind = task.await;
            let _ = message_tx.send(AppMessage::Flow(FlowEvent {
                session,
                action,
                kind,
            }));
        });
        self.flows.track(handle.abort_handle());
    }

    fn spawn_simulation(&mut self, action: TxAction, request: WriteRequest) {
        tracing::debug!(?action, "simulating");
        let provider = self.provider.clone();
        self.spawn_flow_task(action, async move {
            let result = provider
                .simulate(request.from, &request.call)
                .await
                .map_err(|e| TxError::from_simulation(&e));
            FlowEventKind::Simulated { request, result }
        });
    }

    fn spawn_submission(&mut self, action: TxAction, request: WriteRequest) {
        tracing::info!(?action, from = %request.from, "submitting transaction");
        let provider = self.provider.clone();
        self.spawn_flow_task(action, async move {
            let result = provider
                .submit(request.from, &request.call)
                .await
                .map_err(|e| TxError::from_submission(&e));
            FlowEventKind::Submitted(result)
        });
    }

    fn spawn_confirmation(&mut self, action: TxAction, hash: alloy_primitives::TxHash) {
        tracing::info!(?action, %hash, "waiting for confirmation");
        let provider = self.provider.clone();
        self.spawn_flow_task(action, async move {
            let result = match provider.wait_for_confirmation(hash).await {
                Ok(receipt) if receipt.success => Ok(()),
                Ok(_) => Err(TxError::ConfirmationFailed("transaction reverted".to_string())),
                Err(e) => Err(TxError::from_confirmation(&e)),
            };
            FlowEventKind::Confirmed { hash, result }
        });
    }
}
