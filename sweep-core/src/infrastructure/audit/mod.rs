use log::{debug, info, trace, warn};
use std::sync::{Arc, Mutex, OnceLock};

pub use crate::domain::audit::AuditEvent;

pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

pub struct StructuredAuditLogger;

impl AuditLogger for StructuredAuditLogger {
    fn log(&self, event: AuditEvent) {
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(err) => {
                warn!("audit: failed to serialize audit event error={}", err);
                "{\"type\":\"serialize_failed\"}".to_string()
            }
        };
        debug!(target: "sweep::audit::json", "audit event audit_event={}", json);
        info!(target: "sweep::audit::human", "audit summary={}", human_summary(&event));
    }
}

pub struct FileAuditLogger {
    file: Arc<Mutex<std::fs::File>>,
}

impl FileAuditLogger {
    pub fn new(path: &std::path::Path) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file: Arc::new(Mutex::new(file)) })
    }
}

impl AuditLogger for FileAuditLogger {
    fn log(&self, event: AuditEvent) {
        use std::io::Write;

        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(err) => {
                warn!("audit: failed to serialize audit event for file logger error={}", err);
                "{\"type\":\"serialize_failed\"}".to_string()
            }
        };
        match self.file.lock() {
            Ok(mut file) => {
                if let Err(err) = writeln!(file, "{}", json) {
                    warn!("audit: failed to write audit event to file error={}", err);
                    return;
                }
                if let Err(err) = file.flush() {
                    warn!("audit: failed to flush audit event to file error={}", err);
                }
            }
            Err(err) => {
                warn!("audit: failed to lock audit file mutex error={}", err);
            }
        }
    }
}

pub struct MultiAuditLogger {
    loggers: Vec<Box<dyn AuditLogger>>,
}

impl MultiAuditLogger {
    pub fn new() -> Self {
        Self { loggers: vec![] }
    }

    pub fn add_logger(&mut self, logger: Box<dyn AuditLogger>) {
        self.loggers.push(logger);
    }
}

impl Default for MultiAuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLogger for MultiAuditLogger {
    fn log(&self, event: AuditEvent) {
        for logger in &self.loggers {
            logger.log(event.clone());
        }
    }
}

static AUDIT_LOGGER: OnceLock<Box<dyn AuditLogger>> = OnceLock::new();

const SHORT_ID_DISPLAY_LENGTH: usize = 16;

pub fn init_audit_logger(logger: Box<dyn AuditLogger>) {
    if AUDIT_LOGGER.set(logger).is_err() {
        warn!("init_audit_logger called more than once; ignoring");
    }
}

pub fn audit(event: AuditEvent) {
    match AUDIT_LOGGER.get() {
        Some(logger) => logger.log(event),
        None => trace!("audit event dropped: no logger configured event={:?}", event),
    }
}

fn short_id(value: &str) -> String {
    let trimmed = value.trim_start_matches("0x").trim_start_matches("0X");
    if trimmed.len() <= SHORT_ID_DISPLAY_LENGTH {
        trimmed.to_string()
    } else {
        format!("{}..", &trimmed[..SHORT_ID_DISPLAY_LENGTH])
    }
}

fn human_summary(event: &AuditEvent) -> String {
    match event {
        AuditEvent::SweepPrepared { account, candidate_count, total_fee_sats, total_transferred_sats, destination, .. } => {
            format!(
                "sweep prepared account={} candidates={} fee_sats={} transferred_sats={} destination={}",
                account, candidate_count, total_fee_sats, total_transferred_sats, destination
            )
        }
        AuditEvent::SweepEmpty { account, prior_attempt, .. } => {
            format!("nothing to sweep account={} prior_attempt={}", account, prior_attempt)
        }
        AuditEvent::AttemptRecorded { account, .. } => {
            format!("sweep attempt recorded account={}", account)
        }
        AuditEvent::CandidateSigned { candidate_id, keyset, phase, .. } => {
            format!("candidate signed candidate_id={} keyset={} phase={}", short_id(candidate_id), keyset, phase)
        }
        AuditEvent::TransactionBroadcast { candidate_id, fee_sats, amount_sats, .. } => {
            format!("transaction broadcast candidate_id={} fee_sats={} amount_sats={}", short_id(candidate_id), fee_sats, amount_sats)
        }
        AuditEvent::SweepCompleted { account, candidate_count, total_transferred_sats, .. } => {
            format!(
                "sweep completed account={} candidates={} transferred_sats={}",
                account, candidate_count, total_transferred_sats
            )
        }
        AuditEvent::SweepFailed { account, code, reason, .. } => {
            format!("sweep failed account={} code={} reason={}", account, code, reason)
        }
        AuditEvent::OwedFlagCleared { account, .. } => {
            format!("sweep owed flag cleared account={}", account)
        }
    }
}
