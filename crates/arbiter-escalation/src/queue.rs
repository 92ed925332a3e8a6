//! EscalationQueue: ticket store, delivery channel, and overflow backlog.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use arbiter_core::config::EscalationConfig;
use arbiter_core::errors::EscalationError;
use arbiter_core::models::{
    ContradictionReport, EscalationTicket, TicketPriority, TicketStatus,
};
use arbiter_core::traits::IEscalationSink;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What `enqueue` did with a report.
#[derive(Debug, Clone, PartialEq)]
pub enum EnqueueOutcome {
    /// A new ticket, handed to the delivery channel.
    Created(EscalationTicket),
    /// A new ticket, parked in the backlog because the channel was full.
    Backlogged(EscalationTicket),
    /// The report already has a ticket; nothing was created.
    Duplicate { ticket_id: String },
}

impl EnqueueOutcome {
    pub fn ticket_id(&self) -> &str {
        match self {
            EnqueueOutcome::Created(t) | EnqueueOutcome::Backlogged(t) => &t.id,
            EnqueueOutcome::Duplicate { ticket_id } => ticket_id,
        }
    }

    pub fn is_new(&self) -> bool {
        !matches!(self, EnqueueOutcome::Duplicate { .. })
    }
}

/// Point-in-time queue health.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EscalationStats {
    /// Tickets not yet resolved or dismissed.
    pub open: usize,
    /// Tickets handed to the sink successfully.
    pub delivered: u64,
    pub delivery_failures: u64,
    /// Tickets waiting for room in the delivery channel.
    pub backlog: usize,
    pub oldest_backlog_age: Option<Duration>,
}

struct Backlogged {
    ticket: EscalationTicket,
    since: Instant,
}

pub struct EscalationQueue {
    tickets: DashMap<String, EscalationTicket>,
    /// report id -> ticket id.
    by_report: DashMap<String, String>,
    sender: mpsc::Sender<EscalationTicket>,
    receiver: Mutex<Option<mpsc::Receiver<EscalationTicket>>>,
    /// Guarded together with every `try_send`, so a ticket never overtakes
    /// an older one waiting here.
    backlog: Mutex<VecDeque<Backlogged>>,
    delivered: AtomicU64,
    delivery_failures: AtomicU64,
}

impl EscalationQueue {
    pub fn new(config: &EscalationConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.channel_capacity.max(1));
        Self {
            tickets: DashMap::new(),
            by_report: DashMap::new(),
            sender,
            receiver: Mutex::new(Some(receiver)),
            backlog: Mutex::new(VecDeque::new()),
            delivered: AtomicU64::new(0),
            delivery_failures: AtomicU64::new(0),
        }
    }

    fn backlog(&self) -> MutexGuard<'_, VecDeque<Backlogged>> {
        self.backlog.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open a ticket for `report`. Idempotent per report id.
    ///
    /// Fails only for an AUTO_APPROVE report. A full channel never fails the
    /// call; the ticket goes to the backlog.
    pub fn enqueue(&self, report: &ContradictionReport) -> Result<EnqueueOutcome, EscalationError> {
        if !report.decision.requires_escalation() {
            return Err(EscalationError::NotEscalatable {
                report_id: report.id.clone(),
            });
        }

        let ticket = match self.by_report.entry(report.id.clone()) {
            Entry::Occupied(existing) => {
                debug!(report_id = %report.id, ticket_id = %existing.get(), "report already escalated");
                return Ok(EnqueueOutcome::Duplicate {
                    ticket_id: existing.get().clone(),
                });
            }
            Entry::Vacant(slot) => {
                let ticket = new_ticket(report);
                self.tickets.insert(ticket.id.clone(), ticket.clone());
                slot.insert(ticket.id.clone());
                ticket
            }
        };

        let mut backlog = self.backlog();
        if backlog.is_empty() {
            match self.sender.try_send(ticket.clone()) {
                Ok(()) => {
                    info!(
                        ticket_id = %ticket.id,
                        report_id = %ticket.report_id,
                        priority = ?ticket.priority,
                        "escalation ticket created"
                    );
                    return Ok(EnqueueOutcome::Created(ticket));
                }
                Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {}
            }
        }

        backlog.push_back(Backlogged {
            ticket: ticket.clone(),
            since: Instant::now(),
        });
        warn!(
            ticket_id = %ticket.id,
            backlog = backlog.len(),
            "escalation channel full, ticket backlogged"
        );
        Ok(EnqueueOutcome::Backlogged(ticket))
    }

    /// Move backlogged tickets into the channel while it has room.
    fn promote_backlog(&self) {
        let mut backlog = self.backlog();
        while let Some(front) = backlog.pop_front() {
            match self.sender.try_send(front.ticket) {
                Ok(()) => {}
                Err(TrySendError::Full(ticket)) | Err(TrySendError::Closed(ticket)) => {
                    backlog.push_front(Backlogged {
                        ticket,
                        since: front.since,
                    });
                    break;
                }
            }
        }
    }

    pub fn get(&self, ticket_id: &str) -> Option<EscalationTicket> {
        self.tickets.get(ticket_id).map(|t| t.clone())
    }

    pub fn get_by_report(&self, report_id: &str) -> Option<EscalationTicket> {
        let ticket_id = self.by_report.get(report_id)?.clone();
        self.get(&ticket_id)
    }

    /// Tickets, optionally filtered by status, oldest first.
    pub fn list(&self, status: Option<TicketStatus>) -> Vec<EscalationTicket> {
        let mut tickets: Vec<EscalationTicket> = self
            .tickets
            .iter()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .map(|t| t.clone())
            .collect();
        tickets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        tickets
    }

    /// Status change from the external review workflow. Resolved and
    /// dismissed tickets are final.
    pub fn resolve(&self, ticket_id: &str, status: TicketStatus) -> Result<EscalationTicket, EscalationError> {
        let mut ticket = self
            .tickets
            .get_mut(ticket_id)
            .ok_or_else(|| EscalationError::TicketNotFound {
                ticket_id: ticket_id.to_string(),
            })?;
        if ticket.status.is_terminal() {
            return Err(EscalationError::TicketClosed {
                ticket_id: ticket_id.to_string(),
                status: ticket.status.name().to_string(),
            });
        }
        ticket.status = status;
        ticket.updated_at = Utc::now();
        info!(ticket_id, status = status.name(), "escalation ticket updated");
        Ok(ticket.clone())
    }

    pub fn stats(&self) -> EscalationStats {
        let backlog = self.backlog();
        EscalationStats {
            open: self
                .tickets
                .iter()
                .filter(|t| !t.status.is_terminal())
                .count(),
            delivered: self.delivered.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            backlog: backlog.len(),
            oldest_backlog_age: backlog.front().map(|b| b.since.elapsed()),
        }
    }

    /// Start delivering tickets to `sink` on a background task.
    ///
    /// Returns `None` if a dispatcher was already started. The task runs
    /// until aborted. A failed delivery is logged and counted; the ticket
    /// stays open in the store.
    pub fn spawn_dispatcher<S: IEscalationSink>(self: &Arc<Self>, sink: Arc<S>) -> Option<JoinHandle<()>> {
        let mut receiver = self
            .receiver
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()?;
        let queue = Arc::clone(self);

        Some(tokio::spawn(async move {
            while let Some(ticket) = receiver.recv().await {
                match sink.deliver(&ticket).await {
                    Ok(()) => {
                        queue.delivered.fetch_add(1, Ordering::Relaxed);
                        debug!(ticket_id = %ticket.id, "escalation ticket delivered");
                    }
                    Err(e) => {
                        queue.delivery_failures.fetch_add(1, Ordering::Relaxed);
                        warn!(ticket_id = %ticket.id, error = %e, "escalation delivery failed");
                    }
                }
                queue.promote_backlog();
            }
        }))
    }
}

impl std::fmt::Debug for EscalationQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscalationQueue")
            .field("tickets", &self.tickets.len())
            .field("stats", &self.stats())
            .finish()
    }
}

fn new_ticket(report: &ContradictionReport) -> EscalationTicket {
    let mut conflicting_options = report.conflicting_options();
    conflicting_options.extend(report.reasons.iter().map(|r| format!("[gate] {}", r.describe())));
    let now = Utc::now();
    EscalationTicket {
        id: uuid::Uuid::new_v4().to_string(),
        report_id: report.id.clone(),
        priority: TicketPriority::from(report.max_severity),
        conflicting_options,
        status: TicketStatus::Open,
        created_at: now,
        updated_at: now,
    }
}
