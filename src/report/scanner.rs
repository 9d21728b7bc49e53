//! Single-pass line scanner turning raw plan output into action records.

use crate::error::ReportError;
use crate::runner::GroupKind;
use regex::Regex;

/// Phrase opening a terraform change summary.
const ACTIONS_HEADER: &str = "Terraform will perform the following actions:";
/// Phrases closing a change summary when found together with "Plan:".
const PLAN_SUMMARY: &str = "Plan:";
const CHANGE_COUNTS: [&str; 3] = ["to add", "to change", "to destroy"];

/// One change summary attributed to the environment and region most
/// recently seen in the surrounding output.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    pub environment: String,
    pub region: String,
    pub block: String,
}

/// Stateful scanner over one group's captured output. Environment and
/// region are latched from marker lines and persist across blocks; a block
/// whose context is incomplete when it closes is dropped without error.
pub struct PlanScanner {
    env_marker: Regex,
    region_marker: Regex,
    environment: Option<String>,
    region: Option<String>,
    block: Option<String>,
}

impl PlanScanner {
    pub fn new(kind: GroupKind) -> Result<Self, ReportError> {
        let (env_pattern, region_pattern) = match kind {
            GroupKind::Commercial => (r"/organizations/([^/]+)/", r"/([a-z]{2}-[a-z]+-[0-9])/"),
            GroupKind::Govcloud => (r"(govcloud-[^/]+)", r"(us-gov-[a-z]+-[0-9])"),
        };

        Ok(Self {
            env_marker: Regex::new(env_pattern)?,
            region_marker: Regex::new(region_pattern)?,
            environment: None,
            region: None,
            block: None,
        })
    }

    /// Scan a whole buffer, returning records in emission order.
    pub fn scan(&mut self, text: &str) -> Vec<ActionRecord> {
        text.lines().filter_map(|line| self.feed(line)).collect()
    }

    /// Advance the state machine by one line, emitting at most one record
    /// (when the line closes an action block with full context latched).
    pub fn feed(&mut self, line: &str) -> Option<ActionRecord> {
        if let Some(caps) = self.env_marker.captures(line) {
            self.environment = caps.get(1).map(|m| m.as_str().to_string());
        }
        if let Some(caps) = self.region_marker.captures(line) {
            self.region = caps.get(1).map(|m| m.as_str().to_string());
        }

        if self.block.is_none() {
            if line.contains(ACTIONS_HEADER) {
                self.block = Some(line.to_string());
            }
            return None;
        }

        if let Some(block) = self.block.as_mut() {
            block.push('\n');
            block.push_str(line);
        }

        if !closes_block(line) {
            return None;
        }

        let block = self.block.take()?;
        match (&self.environment, &self.region) {
            (Some(environment), Some(region)) => Some(ActionRecord {
                environment: environment.clone(),
                region: region.clone(),
                block,
            }),
            // Missing context: drop the block, keep scanning
            _ => None,
        }
    }
}

fn closes_block(line: &str) -> bool {
    line.contains(PLAN_SUMMARY) && CHANGE_COUNTS.iter().any(|phrase| line.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(kind: GroupKind, text: &str) -> Vec<ActionRecord> {
        PlanScanner::new(kind).unwrap().scan(text)
    }

    #[test]
    fn test_commercial_end_to_end() {
        let raw = "\
Planning /organizations/staging/ accounts
Working in /staging/eu-west-1/s3_buckets
Terraform will perform the following actions:
  + aws_s3_bucket.quarantine
Plan: 9 to add, 0 to change, 0 to destroy.
";
        let records = scan(GroupKind::Commercial, raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].environment, "staging");
        assert_eq!(records[0].region, "eu-west-1");
        assert_eq!(
            records[0].block,
            "Terraform will perform the following actions:\n  + aws_s3_bucket.quarantine\nPlan: 9 to add, 0 to change, 0 to destroy."
        );
    }

    #[test]
    fn test_context_is_sticky_across_blocks() {
        let raw = "\
/organizations/production/us-east-1/first
Terraform will perform the following actions:
  + first
Plan: 1 to add, 0 to change, 0 to destroy.
Terraform will perform the following actions:
  + second
Plan: 0 to add, 1 to change, 0 to destroy.
";
        let records = scan(GroupKind::Commercial, raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].environment, "production");
        assert_eq!(records[1].region, "us-east-1");
        assert!(records[1].block.contains("+ second"));
    }

    #[test]
    fn test_block_without_region_is_dropped() {
        let raw = "\
/organizations/staging/ but no region path here
Terraform will perform the following actions:
  + something
Plan: 1 to add, 0 to change, 0 to destroy.
";
        assert!(scan(GroupKind::Commercial, raw).is_empty());
    }

    #[test]
    fn test_empty_and_sentinel_buffers_yield_nothing() {
        assert!(scan(GroupKind::Commercial, "").is_empty());
        assert!(scan(GroupKind::Commercial, "No commercial plans needed\n").is_empty());
        assert!(scan(GroupKind::Govcloud, "No GovCloud plans needed\n").is_empty());
    }

    #[test]
    fn test_govcloud_markers() {
        let raw = "\
govcloud-production/us-gov-west-1/s3_buckets
Terraform will perform the following actions:
  ~ aws_iam_role.audit
Plan: 0 to add, 1 to change, 0 to destroy.
";
        let records = scan(GroupKind::Govcloud, raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].environment, "govcloud-production");
        assert_eq!(records[0].region, "us-gov-west-1");
    }

    #[test]
    fn test_plan_line_outside_block_does_not_emit() {
        let raw = "\
/organizations/staging/eu-west-1/x
Plan: 1 to add, 0 to change, 0 to destroy.
";
        assert!(scan(GroupKind::Commercial, raw).is_empty());
    }

    #[test]
    fn test_unterminated_block_is_dropped() {
        let raw = "\
/organizations/staging/eu-west-1/x
Terraform will perform the following actions:
  + dangling
";
        assert!(scan(GroupKind::Commercial, raw).is_empty());
    }

    #[test]
    fn test_nested_header_keeps_accumulating() {
        let raw = "\
/organizations/staging/eu-west-1/x
Terraform will perform the following actions:
  + first
Terraform will perform the following actions:
  + second
Plan: 2 to add, 0 to change, 0 to destroy.
";
        let records = scan(GroupKind::Commercial, raw);
        assert_eq!(records.len(), 1);
        // Both headers land in the one grown block
        assert!(records[0].block.contains("+ first"));
        assert!(records[0].block.contains("+ second"));
    }

    #[test]
    fn test_header_line_is_not_treated_as_footer() {
        // A header line that also mentions Plan: must still open, not close
        let raw = "\
/organizations/staging/eu-west-1/x
Terraform will perform the following actions: Plan: 1 to add
Plan: 1 to add, 0 to change, 0 to destroy.
";
        let records = scan(GroupKind::Commercial, raw);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let raw = "\
/organizations/staging/eu-west-1/x
Terraform will perform the following actions:
  + thing
Plan: 1 to add, 0 to change, 0 to destroy.
";
        let first = scan(GroupKind::Commercial, raw);
        let second = scan(GroupKind::Commercial, raw);
        assert_eq!(first, second);
    }
}
