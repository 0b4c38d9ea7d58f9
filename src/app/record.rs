//! 输入记录的列名归一化
//!
//! 上游（n8n + LLM 抽取）产出的表头命名非常随意：大小写混用、空格/点号
//! 分隔、同义列名（answer/answers/type）等。这里统一折叠到固定的规范字段，
//! 并在边界处把「空串 / nan / None」这类占位值收敛为 `None`，下游不再做
//! 哨兵值判断。

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static HINT_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*hint\s*:\s*").expect("hint 正则编译失败"));

/// 规范化后的单条输入记录，所有字段均为显式可空
#[derive(Debug, Clone, Default)]
pub struct NormalizedRecord {
    pub question: Option<String>,
    pub options: Option<String>,
    pub correct_options: Option<String>,
    pub explanation: Option<String>,
    pub hints: Option<String>,
    pub scenario: Option<String>,
    pub question_type: Option<String>,
    pub category: Option<String>,
    pub collection: Option<String>,
    pub quiz: Option<String>,
    pub difficulty: Option<String>,
    pub has_image: Option<String>,
}

/// 把任意表头折叠为规范字段名
///
/// 规则：忽略大小写，空格和点号视同下划线；同义列名归并
/// （answer/answers -> Correct_Options，type -> Question_Type）。
fn canonical_header(raw: &str) -> Option<&'static str> {
    let folded: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '.' { '_' } else { c })
        .collect();

    match folded.as_str() {
        "question" => Some("Question"),
        "options" => Some("Options"),
        "correct_options" | "answer" | "answers" => Some("Correct_Options"),
        "explanation" => Some("Explanation"),
        "hints" => Some("Hints"),
        "scenario" => Some("Scenario"),
        "question_type" | "type" => Some("Question_Type"),
        "category" => Some("Category"),
        "collection" => Some("Collection"),
        "quiz" => Some("Quiz"),
        "difficulty" => Some("difficulty"),
        "has_image" => Some("has_image"),
        _ => None,
    }
}

/// 单元格取值：trim 后为空或为占位标记（nan/none/null）的一律视为无值
fn clean_cell(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    if text.is_empty() {
        return None;
    }
    match text.to_lowercase().as_str() {
        "nan" | "none" | "null" => None,
        _ => Some(text),
    }
}

impl NormalizedRecord {
    /// 从原始 JSON 对象（列名 -> 原始值）构建规范记录
    ///
    /// 同一个规范字段被多个原始列命中时，保留先出现的那一列。
    pub fn from_raw(raw: &Map<String, Value>) -> Self {
        let mut rec = NormalizedRecord::default();

        for (header, value) in raw {
            let Some(canonical) = canonical_header(header) else {
                continue;
            };
            let Some(cleaned) = clean_cell(value) else {
                continue;
            };

            let slot = match canonical {
                "Question" => &mut rec.question,
                "Options" => &mut rec.options,
                "Correct_Options" => &mut rec.correct_options,
                "Explanation" => &mut rec.explanation,
                "Hints" => &mut rec.hints,
                "Scenario" => &mut rec.scenario,
                "Question_Type" => &mut rec.question_type,
                "Category" => &mut rec.category,
                "Collection" => &mut rec.collection,
                "Quiz" => &mut rec.quiz,
                "difficulty" => &mut rec.difficulty,
                "has_image" => &mut rec.has_image,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(cleaned);
            }
        }

        rec
    }

    /// has_image 列的布尔语义（"true"/"1"/"yes" 视为有图）
    pub fn has_image_flag(&self) -> bool {
        match &self.has_image {
            Some(v) => matches!(v.to_lowercase().as_str(), "true" | "1" | "yes" | "y"),
            None => false,
        }
    }

    /// 清洗 hint 文本：去掉行首的 "Hint:" 标签
    pub fn cleaned_hint(&self) -> Option<String> {
        let raw = self.hints.as_deref()?;
        let cleaned = HINT_LABEL_RE.replace(raw, "").trim().to_string();
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> NormalizedRecord {
        let mut map = Map::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.clone());
        }
        NormalizedRecord::from_raw(&map)
    }

    #[test]
    fn test_header_synonyms_and_case() {
        let rec = record(&[
            ("QUESTION", json!("什么是 RBAC?")),
            ("Answer", json!("A")),
            ("type", json!("multiple_choice")),
        ]);
        assert_eq!(rec.question.as_deref(), Some("什么是 RBAC?"));
        assert_eq!(rec.correct_options.as_deref(), Some("A"));
        assert_eq!(rec.question_type.as_deref(), Some("multiple_choice"));
    }

    #[test]
    fn test_duplicate_canonical_first_wins() {
        // answer / answers 归并到同一字段时保留先出现的列（Map 按键序遍历）
        let rec = record(&[("answer", json!("A")), ("answers", json!("B"))]);
        assert_eq!(rec.correct_options.as_deref(), Some("A"));
    }

    #[test]
    fn test_dotted_and_spaced_headers() {
        let rec = record(&[
            ("correct.options", json!("B")),
            ("has image", json!("true")),
        ]);
        assert_eq!(rec.correct_options.as_deref(), Some("B"));
        assert!(rec.has_image_flag());
    }

    #[test]
    fn test_placeholder_values_become_none() {
        let rec = record(&[
            ("Question", json!("nan")),
            ("Options", json!("   ")),
            ("Scenario", Value::Null),
            ("difficulty", json!("None")),
        ]);
        assert!(rec.question.is_none());
        assert!(rec.options.is_none());
        assert!(rec.scenario.is_none());
        assert!(rec.difficulty.is_none());
    }

    #[test]
    fn test_unknown_headers_ignored() {
        let rec = record(&[("随便一列", json!("x")), ("Question", json!("Q1"))]);
        assert_eq!(rec.question.as_deref(), Some("Q1"));
    }

    #[test]
    fn test_cleaned_hint_strips_label() {
        let rec = record(&[("Hints", json!("  Hint:  think about identity  "))]);
        assert_eq!(rec.cleaned_hint().as_deref(), Some("think about identity"));

        let rec = record(&[("Hints", json!("hint:"))]);
        assert!(rec.cleaned_hint().is_none());
    }

    #[test]
    fn test_numeric_cell_kept_as_text() {
        let rec = record(&[("difficulty", json!(3))]);
        assert_eq!(rec.difficulty.as_deref(), Some("3"));
    }
}
