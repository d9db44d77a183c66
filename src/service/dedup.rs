use crate::models::{Finding, Report};
use indexmap::IndexMap;

/// 去重结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dedup {
    /// 每个不同的值一条 (首次出现顺序)
    pub unique: Vec<String>,
    /// 出现次数 >= 2 的值及其次数
    pub duplicates: IndexMap<String, usize>,
}

impl Dedup {
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    /// 每个重复项写一条报告
    pub fn report_into(&self, report: &mut Report) {
        for (key, &count) in &self.duplicates {
            report.push(Finding::DuplicateKey {
                key: key.clone(),
                count,
            });
        }
    }
}

/// 统计每个值的出现次数并去重
pub fn dedupe<S: AsRef<str>>(keys: &[S]) -> Dedup {
    let mut freq: IndexMap<String, usize> = IndexMap::new();
    for k in keys {
        *freq.entry(k.as_ref().to_string()).or_insert(0) += 1;
    }

    let unique = freq.keys().cloned().collect();
    freq.retain(|_, count| *count >= 2);

    Dedup {
        unique,
        duplicates: freq,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn unique_and_duplicates() {
        let d = dedupe(&["a", "b", "a", "c", "c", "c"]);

        let unique: HashSet<&str> = d.unique.iter().map(String::as_str).collect();
        assert_eq!(unique, HashSet::from(["a", "b", "c"]));
        assert_eq!(d.unique.len(), 3);

        assert_eq!(d.duplicates.len(), 2);
        assert_eq!(d.duplicates.get("a"), Some(&2));
        assert_eq!(d.duplicates.get("c"), Some(&3));
        assert!(d.duplicates.get("b").is_none());
    }

    #[test]
    fn no_duplicates() {
        let d = dedupe(&["1001".to_string(), "1002".to_string()]);
        assert!(!d.has_duplicates());
        assert_eq!(d.unique.len(), 2);
    }

    #[test]
    fn duplicates_are_reported_once_each() {
        let d = dedupe(&["x", "x", "y", "y", "z"]);
        let mut report = Report::new();
        d.report_into(&mut report);
        assert_eq!(report.len(), 2);
        assert!(report.findings().contains(&Finding::DuplicateKey {
            key: "x".into(),
            count: 2
        }));
    }
}
