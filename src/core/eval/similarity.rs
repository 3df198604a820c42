use std::collections::HashSet;

/// 按空白切词后的 Jaccard 相似度 `floor(100 * |A ∩ B| / |A ∪ B|)`，
/// 任一侧没有词时为 0。输入应已归一化。
pub fn similarity(a: &str, b: &str) -> u32 {
    let a_tokens: HashSet<&str> = a.split_whitespace().collect();
    let b_tokens: HashSet<&str> = b.split_whitespace().collect();
    if a_tokens.is_empty() || b_tokens.is_empty() {
        return 0;
    }

    let intersection = a_tokens.intersection(&b_tokens).count();
    let union = a_tokens.union(&b_tokens).count();
    (100 * intersection / union) as u32
}
