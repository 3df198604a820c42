use super::golden::GoldenIssue;
use super::normalize::normalize;
use super::similarity::similarity;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_THRESHOLD: u32 = 80;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 最佳预测得分达到阈值的基准问题 id
    pub matched: Vec<String>,
    pub missed: Vec<String>,
    /// 没有任何基准标题达到阈值的预测，记为 `pred-<位置>`
    pub extras: Vec<String>,
}

pub fn extra_label(position: usize) -> String {
    format!("pred-{}", position)
}

/// 基准匹配器：两次独立扫描分别判定命中/遗漏与多余预测
///
/// 一条预测可以同时满足多个基准问题；是否算多余只看它自身的最佳得分，
/// 两侧之间不做一对一分配。
pub struct GoldenMatcher<'a> {
    golden: &'a [GoldenIssue],
    golden_titles: Vec<String>,
    threshold: u32,
}

impl<'a> GoldenMatcher<'a> {
    pub fn new(golden: &'a [GoldenIssue], threshold: u32) -> Self {
        Self {
            golden,
            golden_titles: golden.iter().map(|g| normalize(&g.title)).collect(),
            threshold,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn match_titles<S: AsRef<str> + Sync>(&self, predicted: &[S]) -> MatchResult {
        let predicted: Vec<String> = predicted.iter().map(|p| normalize(p.as_ref())).collect();

        let golden_best: Vec<u32> = self
            .golden_titles
            .par_iter()
            .map(|golden| best_score(golden, &predicted))
            .collect();

        let mut result = MatchResult::default();
        for (issue, score) in self.golden.iter().zip(golden_best) {
            if score >= self.threshold {
                result.matched.push(issue.id.clone());
            } else {
                result.missed.push(issue.id.clone());
            }
        }

        result.extras = predicted
            .par_iter()
            .enumerate()
            .filter(|(_, title)| best_score(title, &self.golden_titles) < self.threshold)
            .map(|(position, _)| extra_label(position))
            .collect();

        result
    }
}

/// `title` 与 `others` 的最高相似度，`others` 为空时为 0
fn best_score(title: &str, others: &[String]) -> u32 {
    others
        .iter()
        .map(|other| similarity(title, other))
        .max()
        .unwrap_or(0)
}
