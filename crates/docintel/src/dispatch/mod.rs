//! Routes classified documents to the workflow matching their priority.
//!
//! HIGH priority documents raise one alert each, MEDIUM priority documents
//! are gathered into a single digest, and LOW priority documents are appended
//! to the automation log as one entry. IRRELEVANT documents are counted and
//! otherwise ignored. A failing channel never stops the other channels.

mod channels;
mod messages;

pub use channels::{
    AlertChannel, ChannelError, DigestChannel, JsonFileLog, LogChannel, MemoryAlertChannel,
    MemoryDigestChannel, MemoryLog, TracingAlertChannel, TracingDigestChannel,
};
pub use messages::{AlertField, AlertMessage, DigestMessage, LogEntry, LoggedDocument};

use crate::scoring::{ClassificationResult, Priority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Delivery status of one channel for one dispatch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChannelOutcome {
    /// Nothing in the batch was routed to this channel.
    Skipped,
    Delivered {
        documents: usize,
    },
    Failed {
        documents: usize,
        delivered: usize,
        error: String,
    },
}

impl ChannelOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ChannelOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub timestamp: DateTime<Utc>,
    pub total_documents: usize,
    pub alerts: ChannelOutcome,
    pub digest: ChannelOutcome,
    pub log: ChannelOutcome,
    pub ignored: usize,
}

impl DispatchReport {
    pub fn has_failures(&self) -> bool {
        self.alerts.is_failed() || self.digest.is_failed() || self.log.is_failed()
    }
}

pub struct NotificationDispatcher<A, D, L> {
    alerts: Arc<A>,
    digests: Arc<D>,
    log: Arc<L>,
    recipients: Vec<String>,
}

impl<A, D, L> NotificationDispatcher<A, D, L>
where
    A: AlertChannel,
    D: DigestChannel,
    L: LogChannel,
{
    pub fn new(alerts: Arc<A>, digests: Arc<D>, log: Arc<L>, recipients: Vec<String>) -> Self {
        Self {
            alerts,
            digests,
            log,
            recipients,
        }
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    pub fn log_target(&self) -> String {
        self.log.target()
    }

    pub fn dispatch(&self, results: &[ClassificationResult], now: DateTime<Utc>) -> DispatchReport {
        let by_priority = |priority: Priority| -> Vec<&ClassificationResult> {
            results
                .iter()
                .filter(|result| result.classification == priority)
                .collect()
        };

        let high = by_priority(Priority::HighPriority);
        let medium = by_priority(Priority::MediumPriority);
        let low = by_priority(Priority::LowPriority);
        let ignored = results.len() - high.len() - medium.len() - low.len();

        let report = DispatchReport {
            timestamp: now,
            total_documents: results.len(),
            alerts: self.send_alerts(&high),
            digest: self.send_digest(&medium, now),
            log: self.append_log(&low, now),
            ignored,
        };

        info!(
            total = report.total_documents,
            high = high.len(),
            medium = medium.len(),
            low = low.len(),
            ignored,
            failures = report.has_failures(),
            "dispatch complete"
        );
        report
    }

    /// Dispatches a single classification as a batch of one.
    pub fn dispatch_one(&self, result: &ClassificationResult, now: DateTime<Utc>) -> DispatchReport {
        self.dispatch(std::slice::from_ref(result), now)
    }

    fn send_alerts(&self, results: &[&ClassificationResult]) -> ChannelOutcome {
        if results.is_empty() {
            return ChannelOutcome::Skipped;
        }

        let mut delivered = 0;
        let mut last_error = None;
        for result in results {
            match self.alerts.send_alert(&AlertMessage::for_result(result)) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    warn!(
                        document = %result.document_name,
                        error = %err,
                        "alert delivery failed"
                    );
                    last_error = Some(err.to_string());
                }
            }
        }

        match last_error {
            None => ChannelOutcome::Delivered {
                documents: delivered,
            },
            Some(error) => ChannelOutcome::Failed {
                documents: results.len(),
                delivered,
                error,
            },
        }
    }

    fn send_digest(&self, results: &[&ClassificationResult], now: DateTime<Utc>) -> ChannelOutcome {
        if results.is_empty() {
            return ChannelOutcome::Skipped;
        }

        let digest = DigestMessage::for_results(results, &self.recipients, now);
        match self.digests.send_digest(&digest) {
            Ok(()) => ChannelOutcome::Delivered {
                documents: results.len(),
            },
            Err(err) => {
                warn!(subject = %digest.subject, error = %err, "digest delivery failed");
                ChannelOutcome::Failed {
                    documents: results.len(),
                    delivered: 0,
                    error: err.to_string(),
                }
            }
        }
    }

    fn append_log(&self, results: &[&ClassificationResult], now: DateTime<Utc>) -> ChannelOutcome {
        if results.is_empty() {
            return ChannelOutcome::Skipped;
        }

        match self.log.append(&LogEntry::for_results(results, now)) {
            Ok(()) => ChannelOutcome::Delivered {
                documents: results.len(),
            },
            Err(err) => {
                warn!(log_target = %self.log.target(), error = %err, "automation log append failed");
                ChannelOutcome::Failed {
                    documents: results.len(),
                    delivered: 0,
                    error: err.to_string(),
                }
            }
        }
    }
}

impl<A, D, L> Clone for NotificationDispatcher<A, D, L> {
    fn clone(&self) -> Self {
        Self {
            alerts: Arc::clone(&self.alerts),
            digests: Arc::clone(&self.digests),
            log: Arc::clone(&self.log),
            recipients: self.recipients.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoreBreakdown;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0)
            .single()
            .expect("valid time")
    }

    fn result(name: &str, classification: Priority) -> ClassificationResult {
        ClassificationResult {
            document_name: name.to_string(),
            score: 0,
            classification,
            key_phrases: Vec::new(),
            reasoning: "Limited cannabis relevance".to_string(),
            recommended_action: classification.recommended_action(),
            breakdown: ScoreBreakdown::default(),
            processed_at: now(),
        }
    }

    struct RejectingAlerts;

    impl AlertChannel for RejectingAlerts {
        fn send_alert(&self, _message: &AlertMessage) -> Result<(), ChannelError> {
            Err(ChannelError::Transport("webhook offline".to_string()))
        }
    }

    fn memory_dispatcher() -> (
        NotificationDispatcher<MemoryAlertChannel, MemoryDigestChannel, MemoryLog>,
        Arc<MemoryAlertChannel>,
        Arc<MemoryDigestChannel>,
        Arc<MemoryLog>,
    ) {
        let alerts = Arc::new(MemoryAlertChannel::default());
        let digests = Arc::new(MemoryDigestChannel::default());
        let log = Arc::new(MemoryLog::default());
        let dispatcher = NotificationDispatcher::new(
            alerts.clone(),
            digests.clone(),
            log.clone(),
            vec!["stakeholders@yourcompany.com".to_string()],
        );
        (dispatcher, alerts, digests, log)
    }

    #[test]
    fn routes_each_priority_to_its_channel() {
        let (dispatcher, alerts, digests, log) = memory_dispatcher();
        let results = vec![
            result("ordinance.txt", Priority::HighPriority),
            result("moratorium.txt", Priority::HighPriority),
            result("hearing.txt", Priority::MediumPriority),
            result("budget.txt", Priority::LowPriority),
            result("parks.txt", Priority::Irrelevant),
        ];

        let report = dispatcher.dispatch(&results, now());

        assert_eq!(alerts.messages().len(), 2);
        assert_eq!(digests.digests().len(), 1);
        assert_eq!(digests.digests()[0].document_names, vec!["hearing.txt"]);
        assert_eq!(log.entries().len(), 1);
        assert_eq!(report.alerts, ChannelOutcome::Delivered { documents: 2 });
        assert_eq!(report.ignored, 1);
        assert!(!report.has_failures());
    }

    #[test]
    fn empty_priorities_skip_their_channels() {
        let (dispatcher, alerts, digests, log) = memory_dispatcher();

        let report = dispatcher.dispatch(&[result("parks.txt", Priority::Irrelevant)], now());

        assert_eq!(report.alerts, ChannelOutcome::Skipped);
        assert_eq!(report.digest, ChannelOutcome::Skipped);
        assert_eq!(report.log, ChannelOutcome::Skipped);
        assert!(alerts.messages().is_empty());
        assert!(digests.digests().is_empty());
        assert!(log.entries().is_empty());
    }

    #[test]
    fn failing_channel_does_not_block_others() {
        let digests = Arc::new(MemoryDigestChannel::default());
        let log = Arc::new(MemoryLog::default());
        let dispatcher = NotificationDispatcher::new(
            Arc::new(RejectingAlerts),
            digests.clone(),
            log.clone(),
            Vec::new(),
        );

        let report = dispatcher.dispatch(
            &[
                result("ordinance.txt", Priority::HighPriority),
                result("hearing.txt", Priority::MediumPriority),
                result("budget.txt", Priority::LowPriority),
            ],
            now(),
        );

        assert!(report.has_failures());
        assert_eq!(
            report.alerts,
            ChannelOutcome::Failed {
                documents: 1,
                delivered: 0,
                error: "channel transport unavailable: webhook offline".to_string(),
            }
        );
        assert_eq!(digests.digests().len(), 1);
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn dispatch_one_treats_result_as_batch() {
        let (dispatcher, alerts, _, _) = memory_dispatcher();

        let report = dispatcher.dispatch_one(&result("ordinance.txt", Priority::HighPriority), now());

        assert_eq!(report.total_documents, 1);
        assert_eq!(alerts.messages()[0].document_name, "ordinance.txt");
    }
}
