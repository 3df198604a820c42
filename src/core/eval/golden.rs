use super::error::EvalError;
use log::info;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// 参考问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenIssue {
    pub id: String,
    pub title: String,
}

/// 基准问题集：加载后不可变，可放进 `Arc` 供多个评估并发共享
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoldenSet {
    issues: Vec<GoldenIssue>,
}

impl GoldenSet {
    pub fn new(issues: Vec<GoldenIssue>) -> Self {
        Self { issues }
    }

    /// 加载 `id,title` 格式的 CSV，文件不存在时返回空集而不是错误
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        if !path.exists() {
            info!("📭 golden set {:?} not found, using empty set", path);
            return Ok(Self::default());
        }
        let file = std::fs::File::open(path)?;
        let set = Self::from_reader(file)?;
        info!("📚 loaded {} golden issues from {:?}", set.len(), path);
        Ok(set)
    }

    /// 每行都必须有 `id` 和 `title`，缺列的行会中止加载
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, EvalError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| -> Result<usize, EvalError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| EvalError::DataFormat {
                    row: 1,
                    field: name.to_string(),
                })
        };
        let id_col = column("id")?;
        let title_col = column("title")?;

        let mut issues = Vec::new();
        for (offset, record) in reader.records().enumerate() {
            let record = record?;
            // 表头是第 1 行
            let row = offset as u64 + 2;
            let field = |col: usize, name: &str| -> Result<String, EvalError> {
                record
                    .get(col)
                    .map(str::to_string)
                    .ok_or_else(|| EvalError::DataFormat {
                        row,
                        field: name.to_string(),
                    })
            };
            issues.push(GoldenIssue {
                id: field(id_col, "id")?,
                title: field(title_col, "title")?,
            });
        }

        Ok(Self { issues })
    }

    pub fn issues(&self) -> &[GoldenIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl From<Vec<GoldenIssue>> for GoldenSet {
    fn from(issues: Vec<GoldenIssue>) -> Self {
        Self::new(issues)
    }
}
