use std::collections::BTreeMap;

use caselink_model::{LinkageDecision, SourceKind};
use serde::Serialize;

/// Default number of unmatched labels kept in a report.
pub const DEFAULT_TOP_UNMATCHED: usize = 20;

/// Label used for unmatched records that produced no label at all.
pub const NO_LABEL: &str = "(no label)";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceCounts {
    pub matched: usize,
    pub unmatched: usize,
}

/// An unmatched label and how many records carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Aggregated outcome of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub by_source: BTreeMap<SourceKind, SourceCounts>,
    /// Matched records per winning strategy.
    pub by_strategy: BTreeMap<String, usize>,
    /// Most frequent unmatched labels, by count descending then label.
    pub top_unmatched: Vec<LabelCount>,
}

impl RunReport {
    /// Aggregates `decisions`, keeping at most `top_n` unmatched labels.
    pub fn from_decisions(decisions: &[LinkageDecision], top_n: usize) -> Self {
        let mut report = Self::default();
        let mut unmatched_labels: BTreeMap<&str, usize> = BTreeMap::new();

        for decision in decisions {
            report.total += 1;
            let counts = report
                .by_source
                .entry(decision.natural_key.source())
                .or_default();
            if decision.is_matched() {
                report.matched += 1;
                counts.matched += 1;
                let strategy = decision.strategy.as_deref().unwrap_or("unknown");
                *report.by_strategy.entry(strategy.to_string()).or_default() += 1;
            } else {
                report.unmatched += 1;
                counts.unmatched += 1;
                let label = decision
                    .label
                    .as_deref()
                    .filter(|label| !label.trim().is_empty())
                    .unwrap_or(NO_LABEL);
                *unmatched_labels.entry(label).or_default() += 1;
            }
        }

        // Map order is by label; the stable sort keeps it within equal counts.
        let mut labels: Vec<LabelCount> = unmatched_labels
            .into_iter()
            .map(|(label, count)| LabelCount {
                label: label.to_string(),
                count,
            })
            .collect();
        labels.sort_by(|a, b| b.count.cmp(&a.count));
        labels.truncate(top_n);
        report.top_unmatched = labels;
        report
    }

    /// Share of matched records in percent, `None` for an empty run.
    pub fn match_rate(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.matched as f64 * 100.0 / self.total as f64)
    }
}

#[cfg(test)]
mod tests {
    use caselink_model::{CaseId, MatchCandidate, NaturalKey};

    use super::*;

    fn unmatched(id: &str, label: Option<&str>) -> LinkageDecision {
        LinkageDecision::unmatched(
            NaturalKey::new(SourceKind::Document, id).unwrap(),
            label.map(str::to_string),
        )
    }

    #[test]
    fn counts_and_ranks_unmatched_labels() {
        let decisions = vec![
            unmatched("a", Some("johnson")),
            unmatched("b", Some("acme")),
            unmatched("c", Some("johnson")),
            unmatched("d", None),
            unmatched("e", Some("  ")),
            LinkageDecision::matched(
                NaturalKey::new(SourceKind::Call, "c1").unwrap(),
                MatchCandidate {
                    case_id: CaseId::new("case-1").unwrap(),
                    strategy: "identity",
                },
                None,
            ),
        ];

        let report = RunReport::from_decisions(&decisions, 2);
        assert_eq!(report.total, 6);
        assert_eq!(report.matched, 1);
        assert_eq!(report.unmatched, 5);
        assert_eq!(report.by_strategy.get("identity"), Some(&1));
        assert_eq!(
            report.by_source.get(&SourceKind::Document),
            Some(&SourceCounts {
                matched: 0,
                unmatched: 5
            })
        );
        assert_eq!(
            report.top_unmatched,
            vec![
                LabelCount {
                    label: NO_LABEL.to_string(),
                    count: 2
                },
                LabelCount {
                    label: "johnson".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn empty_run_has_no_match_rate() {
        let report = RunReport::from_decisions(&[], DEFAULT_TOP_UNMATCHED);
        assert_eq!(report.total, 0);
        assert!(report.match_rate().is_none());
        assert!(report.top_unmatched.is_empty());
    }
}
