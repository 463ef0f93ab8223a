//! Structured results of a generation run.

/// What happened to one asset (audio or image) of one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    /// Produced by the vendor and saved; carries the public URL.
    Generated(String),
    /// A file already existed under the deterministic name; no vendor call.
    Reused(String),
    /// The vendor call or the write failed. The asset stays absent.
    Failed(String),
    /// No client is configured for this asset kind.
    Skipped,
}

impl AssetOutcome {
    /// The URL to record on the card, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Generated(url) | Self::Reused(url) => Some(url),
            Self::Failed(_) | Self::Skipped => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Per-card result of a fill-in pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardOutcome {
    pub card_id: String,
    /// 1-based position of the card in its deck.
    pub index: usize,
    pub audio: AssetOutcome,
    pub image: AssetOutcome,
}

/// Summary of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub deck_id: String,
    pub run_id: u64,
    pub cards: Vec<CardOutcome>,
    /// A newer run replaced this run's status record before it finished.
    pub superseded: bool,
    /// The deck JSON was written to storage at the end of the run.
    pub persisted: bool,
    /// Version stamped on the deck at completion, if the deck still existed.
    pub version: Option<i64>,
}

impl RunReport {
    fn count(&self, pred: impl Fn(&AssetOutcome) -> bool) -> usize {
        self.cards
            .iter()
            .map(|c| usize::from(pred(&c.audio)) + usize::from(pred(&c.image)))
            .sum()
    }

    pub fn generated(&self) -> usize {
        self.count(|a| matches!(a, AssetOutcome::Generated(_)))
    }

    pub fn reused(&self) -> usize {
        self.count(|a| matches!(a, AssetOutcome::Reused(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(AssetOutcome::is_failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(|a| *a == AssetOutcome::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_only_for_successful_assets() {
        assert_eq!(AssetOutcome::Generated("a".into()).url(), Some("a"));
        assert_eq!(AssetOutcome::Reused("b".into()).url(), Some("b"));
        assert_eq!(AssetOutcome::Failed("boom".into()).url(), None);
        assert_eq!(AssetOutcome::Skipped.url(), None);
    }

    #[test]
    fn report_counts_both_assets() {
        let report = RunReport {
            deck_id: "d".into(),
            run_id: 1,
            cards: vec![
                CardOutcome {
                    card_id: "1".into(),
                    index: 1,
                    audio: AssetOutcome::Generated("u1".into()),
                    image: AssetOutcome::Failed("quota".into()),
                },
                CardOutcome {
                    card_id: "2".into(),
                    index: 2,
                    audio: AssetOutcome::Reused("u2".into()),
                    image: AssetOutcome::Skipped,
                },
            ],
            superseded: false,
            persisted: true,
            version: Some(1),
        };

        assert_eq!(report.generated(), 1);
        assert_eq!(report.reused(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
    }
}
