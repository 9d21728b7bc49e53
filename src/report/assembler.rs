use std::collections::BTreeMap;

use super::scanner::ActionRecord;

/// Folds action records into environment -> region -> block and renders
/// the PR report body. BTreeMap keys give the sorted, deterministic section
/// order; a repeated (environment, region) pair keeps the later block.
pub struct ReportAssembler {
    module: String,
    environments: BTreeMap<String, BTreeMap<String, String>>,
}

impl ReportAssembler {
    pub fn new(module: &str) -> Self {
        Self {
            module: module.to_string(),
            environments: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, record: ActionRecord) {
        self.environments
            .entry(record.environment)
            .or_default()
            .insert(record.region, record.block);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = ActionRecord>) {
        for record in records {
            self.add(record);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    /// Render the full report. Byte-identical for identical record sets.
    pub fn render(&self) -> String {
        let mut out = String::from("**Terraform plan**\n\n");

        for (environment, regions) in &self.environments {
            out.push_str(&format!(
                "## [environment: {}] - [command: kitman tg plan_all] - [module: {}]\n\n",
                environment, self.module
            ));

            for (region, block) in regions {
                out.push_str(&format!(
                    "<details>\n<summary>{}</summary>\n\n```bash\n",
                    region
                ));
                out.push_str(block);
                out.push_str("\n```\n\n</details>\n\n");
            }
        }

        out
    }
}
