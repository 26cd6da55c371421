//! Plain-text rendering.

use crate::report::RunReport;

impl RunReport {
    /// Renders the report as plain text, one fact per line.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("records: {}\n", self.total));
        out.push_str(&format!("matched: {}\n", self.matched));
        out.push_str(&format!("unmatched: {}\n", self.unmatched));
        if let Some(rate) = self.match_rate() {
            out.push_str(&format!("match rate: {rate:.1}%\n"));
        }

        if !self.by_source.is_empty() {
            out.push_str("\nby source:\n");
            for (source, counts) in &self.by_source {
                out.push_str(&format!(
                    "  {source}: {} matched, {} unmatched\n",
                    counts.matched, counts.unmatched
                ));
            }
        }

        if !self.by_strategy.is_empty() {
            out.push_str("\nby strategy:\n");
            for (strategy, count) in &self.by_strategy {
                out.push_str(&format!("  {strategy}: {count}\n"));
            }
        }

        if !self.top_unmatched.is_empty() {
            out.push_str("\ntop unmatched labels:\n");
            for entry in &self.top_unmatched {
                out.push_str(&format!("  {} x {}\n", entry.count, entry.label));
            }
        }
        out
    }
}
