use chrono::{DateTime, NaiveDate, Utc};
use docintel::config::AppConfig;
use docintel::dispatch::{
    AlertChannel, DigestChannel, DispatchReport, JsonFileLog, LogChannel, NotificationDispatcher,
    TracingAlertChannel, TracingDigestChannel,
};
use docintel::scoring::{Clock, FixedClock, ScoringEngine};
use docintel::{AppError, ClassificationResult};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Dispatcher wired to the production channels: log-backed alerts and
/// digests plus the on-disk automation log.
pub(crate) type LiveDispatcher =
    NotificationDispatcher<TracingAlertChannel, TracingDigestChannel, JsonFileLog>;

pub(crate) fn live_dispatcher(config: &AppConfig) -> LiveDispatcher {
    NotificationDispatcher::new(
        Arc::new(TracingAlertChannel),
        Arc::new(TracingDigestChannel),
        Arc::new(JsonFileLog::new(config.automation.log_file.clone())),
        config.automation.digest_recipients.clone(),
    )
}

pub(crate) fn build_engine(config: &AppConfig) -> Result<ScoringEngine, AppError> {
    Ok(ScoringEngine::new(config.scoring.clone())?)
}

/// Engine plus dispatcher shared by the document routes.
pub(crate) struct DocumentService<A, D, L> {
    engine: ScoringEngine,
    dispatcher: NotificationDispatcher<A, D, L>,
}

impl<A, D, L> DocumentService<A, D, L>
where
    A: AlertChannel,
    D: DigestChannel,
    L: LogChannel,
{
    pub(crate) fn new(engine: ScoringEngine, dispatcher: NotificationDispatcher<A, D, L>) -> Self {
        Self { engine, dispatcher }
    }

    pub(crate) fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub(crate) fn reference_time(&self, reference_date: Option<NaiveDate>) -> DateTime<Utc> {
        reference_time(&self.engine, reference_date)
    }

    pub(crate) fn classify_batch(
        &self,
        documents: Vec<(String, String)>,
        now: DateTime<Utc>,
    ) -> Vec<ClassificationResult> {
        self.engine.classify_all_at(documents, now)
    }
}

impl<A, D, L> DocumentService<A, D, L>
where
    A: AlertChannel + 'static,
    D: DigestChannel + 'static,
    L: LogChannel + 'static,
{
    /// Classifies and dispatches a batch on the blocking pool; the rayon batch and
    /// the log append both block.
    pub(crate) async fn process_batch(
        self: Arc<Self>,
        documents: Vec<(String, String)>,
        now: DateTime<Utc>,
    ) -> Result<(Vec<ClassificationResult>, DispatchReport), AppError> {
        tokio::task::spawn_blocking(move || {
            let results = self.classify_batch(documents, now);
            let report = self.dispatcher.dispatch(&results, now);
            (results, report)
        })
        .await
        .map_err(|err| AppError::Server(axum::Error::new(err)))
    }
}

/// Midnight UTC on `reference_date` when given, otherwise the engine clock.
pub(crate) fn reference_time(
    engine: &ScoringEngine,
    reference_date: Option<NaiveDate>,
) -> DateTime<Utc> {
    match reference_date {
        Some(date) => FixedClock::on_date(date).now(),
        None => engine.now(),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

/// Reads a `{ name: text }` object into pairs, keeping the payload order.
pub(crate) fn deserialize_ordered_documents<'de, D>(
    deserializer: D,
) -> Result<Vec<(String, String)>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct DocumentsVisitor;

    impl<'de> Visitor<'de> for DocumentsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an object mapping document names to text")
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut documents = Vec::with_capacity(map.size_hint().unwrap_or(0));
            let mut seen = HashSet::new();
            while let Some((name, text)) = map.next_entry::<String, String>()? {
                if !seen.insert(name.clone()) {
                    return Err(serde::de::Error::custom(format!(
                        "duplicate document name '{name}'"
                    )));
                }
                documents.push((name, text));
            }
            Ok(documents)
        }
    }

    deserializer.deserialize_map(DocumentsVisitor)
}

/// Serializes `(name, text)` pairs back into an object without reordering.
pub(crate) fn serialize_ordered_documents<S, N, T>(
    documents: &[(N, T)],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    N: Serialize,
    T: Serialize,
{
    serializer.collect_map(documents.iter().map(|(name, text)| (name, text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    struct Payload {
        #[serde(
            deserialize_with = "deserialize_ordered_documents",
            serialize_with = "serialize_ordered_documents"
        )]
        documents: Vec<(String, String)>,
    }

    #[test]
    fn ordered_documents_keep_payload_order() {
        let raw = r#"{"documents": {"zoning.txt": "z", "agenda.txt": "a", "minutes.txt": "m"}}"#;
        let payload: Payload = serde_json::from_str(raw).expect("payload parses");

        let names: Vec<&str> = payload.documents.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["zoning.txt", "agenda.txt", "minutes.txt"]);

        let encoded = serde_json::to_string(&payload).expect("payload encodes");
        assert_eq!(
            encoded,
            r#"{"documents":{"zoning.txt":"z","agenda.txt":"a","minutes.txt":"m"}}"#
        );
    }

    #[test]
    fn duplicate_document_names_are_rejected() {
        let raw = r#"{"documents": {"a.txt": "one", "a.txt": "two"}}"#;
        let err = serde_json::from_str::<Payload>(raw).expect_err("duplicate rejected");
        assert!(err.to_string().contains("duplicate document name 'a.txt'"));
    }

    #[test]
    fn parse_date_reports_the_bad_value() {
        assert_eq!(
            parse_date(" 2025-01-15 "),
            Ok(NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid"))
        );
        assert!(parse_date("01/15/2025")
            .expect_err("wrong layout")
            .contains("01/15/2025"));
    }
}
