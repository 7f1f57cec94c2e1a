use std::sync::Arc;

use tokio::sync::{Mutex, broadcast, mpsc, oneshot};

use crate::{
    core::ledger::RawTicketRow,
    persist::PersistError,
    session::{LedgerSession, SessionError},
    ticket::{TicketDraft, TicketRecord},
    types::TicketNumber,
};

use super::events::TicketEvent;

#[derive(Debug)]
pub enum RuntimeError {
    Session(SessionError),
    Unauthorized,
    ChannelClosed,
}

impl From<SessionError> for RuntimeError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Shared operator credential gating reset and counter overrides.
    /// `None` disables the gate.
    pub operator_key: Option<String>,
    pub command_queue_bound: usize,
    pub event_buffer: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            operator_key: None,
            command_queue_bound: 256,
            event_buffer: 1024,
        }
    }
}

pub struct TicketLogHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<TicketEvent>,
}

impl Clone for TicketLogHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Issue {
        draft: TicketDraft,
        resp: oneshot::Sender<Result<TicketNumber, RuntimeError>>,
    },
    Reset {
        credential: Option<String>,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    SetNextNumber {
        n: TicketNumber,
        credential: Option<String>,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Records {
        resp: oneshot::Sender<Vec<TicketRecord>>,
    },
    Archive {
        resp: oneshot::Sender<Result<Vec<RawTicketRow>, RuntimeError>>,
    },
    NextNumber {
        resp: oneshot::Sender<TicketNumber>,
    },
    Export {
        delimiter: u8,
        resp: oneshot::Sender<Result<String, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

/// Spawns the single-writer loop over `session` and returns a clone-able
/// handle. Commands apply one at a time; a mutating command responds only
/// after its write is durable (or has failed without mutating anything).
pub fn spawn_ticketlog(session: LedgerSession, config: RuntimeConfig) -> TicketLogHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<TicketEvent>(config.event_buffer);

    let session = Arc::new(Mutex::new(session));
    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            let done = handle_command(cmd, &session, &events_tx_loop, &config).await;
            if done {
                break;
            }
        }
    });

    TicketLogHandle { cmd_tx, events_tx }
}

impl TicketLogHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<TicketEvent> {
        self.events_tx.subscribe()
    }

    pub async fn issue(&self, draft: TicketDraft) -> Result<TicketNumber, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Issue { draft, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn reset(&self, credential: Option<&str>) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Reset {
                credential: credential.map(str::to_string),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn set_next_number(
        &self,
        n: TicketNumber,
        credential: Option<&str>,
    ) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SetNextNumber {
                n,
                credential: credential.map(str::to_string),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn records(&self) -> Result<Vec<TicketRecord>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Records { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn archive(&self) -> Result<Vec<RawTicketRow>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Archive { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn next_number(&self) -> Result<TicketNumber, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::NextNumber { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn export(&self, delimiter: u8) -> Result<String, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Export {
                delimiter,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

async fn handle_command(
    cmd: Command,
    session: &Arc<Mutex<LedgerSession>>,
    events_tx: &broadcast::Sender<TicketEvent>,
    config: &RuntimeConfig,
) -> bool {
    match cmd {
        Command::Issue { draft, resp } => {
            let res = run_blocking(session, move |s| s.issue(draft)).await;
            if let Ok(number) = &res {
                let _ = events_tx.send(TicketEvent::Issued { number: *number });
            }
            let _ = resp.send(res);
        }
        Command::Reset { credential, resp } => {
            let res = match authorize(config, credential.as_deref()) {
                Ok(()) => run_blocking(session, |s| s.reset()).await,
                Err(err) => Err(err),
            };
            if res.is_ok() {
                let _ = events_tx.send(TicketEvent::LogCleared);
            }
            let _ = resp.send(res);
        }
        Command::SetNextNumber {
            n,
            credential,
            resp,
        } => {
            let res = match authorize(config, credential.as_deref()) {
                Ok(()) => session
                    .lock()
                    .await
                    .set_next_number(n)
                    .map_err(RuntimeError::from),
                Err(err) => Err(err),
            };
            if res.is_ok() {
                let _ = events_tx.send(TicketEvent::CounterMoved { next: n });
            }
            let _ = resp.send(res);
        }
        Command::Records { resp } => {
            let records = session.lock().await.records().to_vec();
            let _ = resp.send(records);
        }
        Command::Archive { resp } => {
            let res = run_blocking(session, |s| s.archive()).await;
            let _ = resp.send(res);
        }
        Command::NextNumber { resp } => {
            let _ = resp.send(session.lock().await.next_number());
        }
        Command::Export { delimiter, resp } => {
            let res = session
                .lock()
                .await
                .export_delimited(delimiter)
                .map_err(RuntimeError::from);
            let _ = resp.send(res);
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(Ok(()));
            return true;
        }
    }

    false
}

async fn run_blocking<T, F>(
    session: &Arc<Mutex<LedgerSession>>,
    f: F,
) -> Result<T, RuntimeError>
where
    T: Send + 'static,
    F: FnOnce(&mut LedgerSession) -> Result<T, SessionError> + Send + 'static,
{
    let session = Arc::clone(session);
    tokio::task::spawn_blocking(move || {
        let mut session = session.blocking_lock();
        f(&mut *session)
    })
    .await
    .map_err(|err| {
        RuntimeError::Session(SessionError::Persist(PersistError::Message(format!(
            "join error: {err}"
        ))))
    })?
    .map_err(RuntimeError::from)
}

fn authorize(config: &RuntimeConfig, credential: Option<&str>) -> Result<(), RuntimeError> {
    match &config.operator_key {
        None => Ok(()),
        Some(key) => match credential {
            Some(given) if given == key => Ok(()),
            _ => Err(RuntimeError::Unauthorized),
        },
    }
}
