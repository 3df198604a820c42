use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9 ]+").expect("static pattern compiles"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static pattern compiles"));

/// 标题归一化：转小写，`[a-z0-9 ]` 以外的字符替换为空格，合并空白并去掉首尾空白。
/// `normalize("Password Prompt!!") == "password prompt"`
pub fn normalize(title: &str) -> String {
    let lowered = title.to_lowercase();
    let spaced = NON_ALNUM.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&spaced, " ").trim().to_string()
}
