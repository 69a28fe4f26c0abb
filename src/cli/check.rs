//! Validate a scenario file and summarize its steps

use crate::parser;
use crate::types::ScenarioDocument;
use std::collections::BTreeMap;
use std::path::Path;

/// Validate the file at `path`, returning a printable report
pub fn run_check(path: &Path) -> anyhow::Result<Result<String, String>> {
    let content = std::fs::read_to_string(path)?;
    let id = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("scenario");

    Ok(match parser::parse(id, &content) {
        Ok(doc) => Ok(summarize(&doc)),
        Err(e) => Err(format!("{}: {}", path.display(), e)),
    })
}

fn summarize(doc: &ScenarioDocument) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for step in &doc.steps {
        *counts.entry(step.kind.tag()).or_default() += 1;
    }
    let kinds = counts
        .iter()
        .map(|(tag, count)| format!("{tag}={count}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("'{}' ({}): {} steps [{}]", doc.display_name, doc.id, doc.len(), kinds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Step, StepKind};

    #[test]
    fn summary_counts_kinds() {
        let doc = ScenarioDocument::new(
            "intro",
            "Intro",
            vec![
                Step::new("a", StepKind::Theory),
                Step::new("b", StepKind::Theory),
                Step::new("c", StepKind::TextAnswer { placeholder: None }),
            ],
        );
        assert_eq!(
            summarize(&doc),
            "'Intro' (intro): 3 steps [text_answer=1, theory=2]"
        );
    }
}
