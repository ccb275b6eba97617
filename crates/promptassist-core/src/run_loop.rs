//! Overlay run loop.
//!
//! Owns the page and the [`Overlay`], and serializes everything that touches
//! them: host edits, credential notifications, rewrite completions and timer
//! expiries all arrive on channels and are handled one at a time. Effects the
//! overlay emits are executed here as spawned tasks that report back through
//! the same inbox.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use promptassist_dom::Document;
use promptassist_protocols::{CredentialStore, HostSignal, Rewriter};

use crate::error::OverlayError;
use crate::overlay::{Effect, Overlay, OverlayMessage};

type EditFn = Box<dyn FnOnce(&mut Document) + Send>;
type InspectFn = Box<dyn FnOnce(&Document, &Overlay) + Send>;

enum Command {
    /// Change the page, then let the overlay react.
    Edit(EditFn),
    /// Read the page and overlay without changing them.
    Inspect(InspectFn),
    Shutdown,
}

/// Cloneable handle for driving a running [`OverlayRunLoop`].
#[derive(Clone)]
pub struct OverlayHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl OverlayHandle {
    /// Apply a change to the page, as the page's own scripts or the user
    /// would. Mutations and events it produces are handled before the next
    /// command runs.
    pub async fn edit<F, R>(&self, edit: F) -> Result<R, OverlayError>
    where
        F: FnOnce(&mut Document) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let command = Command::Edit(Box::new(move |doc| {
            let _ = tx.send(edit(doc));
        }));
        self.commands
            .send(command)
            .map_err(|_| OverlayError::Closed)?;
        rx.await.map_err(|_| OverlayError::Closed)
    }

    /// Read the page and overlay state.
    pub async fn inspect<F, R>(&self, inspect: F) -> Result<R, OverlayError>
    where
        F: FnOnce(&Document, &Overlay) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let command = Command::Inspect(Box::new(move |doc, overlay| {
            let _ = tx.send(inspect(doc, overlay));
        }));
        self.commands
            .send(command)
            .map_err(|_| OverlayError::Closed)?;
        rx.await.map_err(|_| OverlayError::Closed)
    }

    /// Ask the run loop to stop. Pending rewrites and timers are abandoned.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

/// Executes overlay effects and feeds outcomes back into the inbox.
struct EffectDriver {
    rewriter: Arc<dyn Rewriter>,
    credentials: Arc<dyn CredentialStore>,
    outbox: mpsc::UnboundedSender<OverlayMessage>,
    signals: mpsc::UnboundedSender<HostSignal>,
}

impl EffectDriver {
    fn execute(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Rewrite {
                    binding,
                    request,
                    prompt,
                } => {
                    let rewriter = self.rewriter.clone();
                    let outbox = self.outbox.clone();
                    debug!("Calling rewriter '{}' for {}", rewriter.id(), binding);
                    tokio::spawn(async move {
                        let outcome = rewriter.improve(&prompt).await;
                        let _ = outbox.send(OverlayMessage::RewriteDone {
                            binding,
                            request,
                            outcome,
                        });
                    });
                }
                Effect::ScheduleRevert {
                    binding,
                    generation,
                    after,
                } => self.send_after(
                    after,
                    OverlayMessage::RevertDue {
                        binding,
                        generation,
                    },
                ),
                Effect::ScheduleSettle {
                    binding,
                    generation,
                    after,
                } => self.send_after(
                    after,
                    OverlayMessage::SettleDue {
                        binding,
                        generation,
                    },
                ),
                Effect::ShowCredentialSurface => {
                    if self.signals.send(HostSignal::ShowCredentialSurface).is_err() {
                        debug!("Nobody is listening for host signals");
                    }
                }
            }
        }
    }

    fn send_after(&self, after: std::time::Duration, message: OverlayMessage) {
        let outbox = self.outbox.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = outbox.send(message);
        });
    }

    async fn read_credential(&self) -> Option<String> {
        match self.credentials.get().await {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read credential from '{}': {}", self.credentials.id(), e);
                None
            }
        }
    }
}

/// The overlay for one page, with its collaborators.
pub struct OverlayRunLoop {
    doc: Document,
    overlay: Overlay,
    commands: mpsc::UnboundedReceiver<Command>,
    inbox: mpsc::UnboundedReceiver<OverlayMessage>,
    driver: EffectDriver,
}

impl OverlayRunLoop {
    /// Build a run loop. Returns the loop, a handle for driving it, and the
    /// stream of signals meant for the host.
    pub fn new(
        doc: Document,
        overlay: Overlay,
        rewriter: Arc<dyn Rewriter>,
        credentials: Arc<dyn CredentialStore>,
    ) -> (Self, OverlayHandle, mpsc::UnboundedReceiver<HostSignal>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (outbox, inbox) = mpsc::unbounded_channel();
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();

        let run_loop = Self {
            doc,
            overlay,
            commands: command_rx,
            inbox,
            driver: EffectDriver {
                rewriter,
                credentials,
                outbox,
                signals: signal_tx,
            },
        };
        let handle = OverlayHandle {
            commands: command_tx,
        };
        (run_loop, handle, signal_rx)
    }

    /// Run until shut down or every handle is dropped. Returns the page.
    pub async fn run(self) -> Result<Document, OverlayError> {
        let Self {
            mut doc,
            mut overlay,
            mut commands,
            mut inbox,
            driver,
        } = self;

        // Subscribe before reading so no change slips between the two.
        let mut changes = driver.credentials.subscribe();
        let credential = driver.read_credential().await;
        driver.execute(overlay.start(&mut doc, credential.as_deref()));

        let mut credentials_open = true;
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Edit(edit)) => {
                        edit(&mut doc);
                        driver.execute(overlay.pump(&mut doc));
                    }
                    Some(Command::Inspect(inspect)) => inspect(&doc, &overlay),
                    Some(Command::Shutdown) | None => break,
                },

                change = changes.recv(), if credentials_open => match change {
                    Ok(change) => {
                        driver.execute(
                            overlay.handle(&mut doc, OverlayMessage::Credential(change)),
                        );
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!("Missed {} credential notifications, re-reading", missed);
                        let value = driver.read_credential().await;
                        driver.execute(
                            overlay.handle(&mut doc, OverlayMessage::CredentialRefreshed(value)),
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Credential store closed its notifications");
                        credentials_open = false;
                    }
                },

                Some(message) = inbox.recv() => {
                    driver.execute(overlay.handle(&mut doc, message));
                }
            }
        }

        info!("Overlay run loop stopped");
        Ok(doc)
    }
}

#[cfg(test)]
#[path = "run_loop_tests.rs"]
mod tests;
