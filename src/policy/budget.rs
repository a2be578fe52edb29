//! Per-path fetch budgets
//!
//! A budget maps path patterns to maximum fetch counts. Patterns are split
//! into `/`-separated segments where `*` matches any single segment; the
//! rule with the most literal segments wins, and the bare `*` pattern is
//! the global fallback. Counters are monotonic and never exceed their cap.

use std::collections::HashMap;

#[derive(Debug)]
struct BudgetRule {
    segments: Vec<String>,
    cap: u32,
    spent: u32,
}

impl BudgetRule {
    fn matches(&self, path_segments: &[&str]) -> bool {
        if self.segments.len() > path_segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(path_segments)
            .all(|(pat, seg)| pat == "*" || pat == seg)
    }

    fn literal_count(&self) -> usize {
        self.segments.iter().filter(|s| *s != "*").count()
    }
}

/// Compiled budget rules with consumption counters
#[derive(Debug, Default)]
pub struct BudgetTable {
    rules: Vec<BudgetRule>,
    /// Cap for the bare `*` pattern, if configured
    wildcard: Option<BudgetRule>,
}

impl BudgetTable {
    /// Compile a pattern→cap map into a match table
    #[must_use]
    pub fn new(budget: &HashMap<String, u32>) -> Self {
        let mut table = Self::default();
        for (pattern, cap) in budget {
            let rule = BudgetRule {
                segments: pattern
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
                cap: *cap,
                spent: 0,
            };
            if pattern == "*" {
                table.wildcard = Some(rule);
            } else {
                table.rules.push(rule);
            }
        }
        // most-specific first so the first match wins
        table
            .rules
            .sort_by(|a, b| {
                b.literal_count()
                    .cmp(&a.literal_count())
                    .then(b.segments.len().cmp(&a.segments.len()))
            });
        table
    }

    /// Whether any budget is configured at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.wildcard.is_none()
    }

    /// Consume one unit from the rule matching `path`.
    ///
    /// Returns `false` when the matching counter is exhausted; the counter
    /// is left at its cap. A path matching no rule (and no `*` fallback) is
    /// unconstrained and always succeeds.
    pub fn consume(&mut self, path: &str) -> bool {
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.matches(&path_segments))
            .or(self.wildcard.as_mut());

        match rule {
            Some(rule) => {
                if rule.spent >= rule.cap {
                    false
                } else {
                    rule.spent += 1;
                    true
                }
            }
            None => true,
        }
    }
}
