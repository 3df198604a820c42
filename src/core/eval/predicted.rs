use super::error::EvalError;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_BUCKETS: [&str; 3] = ["bugs", "bugs_strong", "bugs_minor"];

/// 预测问题记录，打分只用 `title`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictedIssue {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// 将预测结果中指定的分桶展平成一个标题列表：先按分桶顺序，再按桶内顺序。
/// 缺失或为 `null` 的分桶不贡献标题。
pub fn collect_titles<S: AsRef<str>>(result: &Value, buckets: &[S]) -> Result<Vec<String>, EvalError> {
    let mut titles = Vec::new();
    for bucket in buckets {
        let bucket = bucket.as_ref();
        let issues = match result.get(bucket) {
            None | Some(Value::Null) => continue,
            Some(value) => Vec::<PredictedIssue>::deserialize(value).map_err(|e| {
                EvalError::InvalidBucket {
                    bucket: bucket.to_string(),
                    reason: e.to_string(),
                }
            })?,
        };

        for (position, issue) in issues.into_iter().enumerate() {
            match issue.title {
                Some(title) => titles.push(title),
                None => {
                    warn!("⚠️ {}[{}] has no title, scoring it as empty", bucket, position);
                    titles.push(String::new());
                }
            }
        }
    }
    Ok(titles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_buckets_flatten_in_order() {
        let result = json!({
            "bugs_minor": [{"title": "minor one"}],
            "bugs": [{"title": "first"}, {"title": "second"}],
            "bugs_strong": [{"title": "strong", "severity": "high"}],
            "steps": [],
        });

        let titles = collect_titles(&result, &DEFAULT_BUCKETS).unwrap();
        assert_eq!(titles, vec!["first", "second", "strong", "minor one"]);
    }

    #[test]
    fn test_missing_and_null_buckets() {
        let result = json!({"bugs": null, "bugs_minor": [{"title": "only"}]});
        let titles = collect_titles(&result, &DEFAULT_BUCKETS).unwrap();
        assert_eq!(titles, vec!["only"]);

        assert!(collect_titles(&json!({}), &DEFAULT_BUCKETS).unwrap().is_empty());
    }

    #[test]
    fn test_missing_title_keeps_position() {
        let result = json!({"bugs": [{"id": "B1"}, {"title": "second"}]});
        let titles = collect_titles(&result, &DEFAULT_BUCKETS).unwrap();
        assert_eq!(titles, vec!["", "second"]);
    }

    #[test]
    fn test_non_list_bucket_is_error() {
        let result = json!({"bugs": "nothing found"});
        match collect_titles(&result, &DEFAULT_BUCKETS) {
            Err(EvalError::InvalidBucket { bucket, .. }) => assert_eq!(bucket, "bugs"),
            other => panic!("expected invalid bucket, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_buckets() {
        let result = json!({"issues": [{"title": "a"}], "bugs": [{"title": "b"}]});
        let titles = collect_titles(&result, &["issues".to_string()]).unwrap();
        assert_eq!(titles, vec!["a"]);
    }
}
