//! Per-item and per-run results.

use pricewatch_core::Decimal;
use serde::Serialize;

/// What happened to the alert step of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertStatus {
    /// Price at or above target.
    NotTriggered,
    Published,
    PublishFailed(String),
}

impl AlertStatus {
    pub fn is_published(&self) -> bool {
        matches!(self, AlertStatus::Published)
    }
}

/// Result of checking one tracked item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Price fetched, evaluated and stored.
    Checked { price: Decimal, alert: AlertStatus },
    /// No quote this run. Nothing was published or stored.
    Skipped { reason: String },
    /// Price fetched and evaluated, but storing it failed.
    Failed {
        price: Decimal,
        alert: AlertStatus,
        error: String,
    },
}

impl ItemOutcome {
    /// Alert step status, if the item got that far.
    pub fn alert(&self) -> Option<&AlertStatus> {
        match self {
            ItemOutcome::Checked { alert, .. } | ItemOutcome::Failed { alert, .. } => Some(alert),
            ItemOutcome::Skipped { .. } => None,
        }
    }

    /// Fetched price, if the lookup succeeded.
    pub fn price(&self) -> Option<Decimal> {
        match self {
            ItemOutcome::Checked { price, .. } | ItemOutcome::Failed { price, .. } => Some(*price),
            ItemOutcome::Skipped { .. } => None,
        }
    }
}

/// Outcomes of one run, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub items: Vec<(String, ItemOutcome)>,
}

impl RunReport {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, identifier: impl Into<String>, outcome: ItemOutcome) {
        self.items.push((identifier.into(), outcome));
    }

    pub fn outcome(&self, identifier: &str) -> Option<&ItemOutcome> {
        self.items
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, outcome)| outcome)
    }

    pub fn checked_count(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Checked { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }

    pub fn alerts_published(&self) -> usize {
        self.count(|o| o.alert().is_some_and(AlertStatus::is_published))
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Coarse status returned to whoever invoked the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatus {
    pub status_code: u16,
    pub body: String,
}

impl RunStatus {
    pub fn complete() -> Self {
        Self {
            status_code: 200,
            body: "Check Complete".to_string(),
        }
    }

    pub fn database_error() -> Self {
        Self::failure("Database Error")
    }

    pub fn failure(body: impl Into<String>) -> Self {
        Self {
            status_code: 500,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}
