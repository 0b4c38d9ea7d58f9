//! 选项串解析与正确性匹配
//!
//! 输入是两段自由文本：选项串（"A) xxx; B) yyy" 或裸分号/换行列表）和
//! 正确答案串（格式不受约束）。输出按输入顺序编号的 Option 行，并按题型
//! 分支打正确标记；hotspot 题按子类型附加元数据。
//!
//! 匹配是启发式的：子串误判在验收范围内（见导出后的人工复查约定）。

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use crate::app::models::{HotspotVariant, OptionRow, QuestionType};

/// 字母编号标记，如 "A)"
static LETTER_MARK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z]\)").expect("编号标记正则编译失败"));

/// 分号 + 紧随的字母编号，作为带编号列表的切分边界
static SPLIT_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r";\s*[A-Za-z]\)").expect("切分边界正则编译失败"));

/// 选项行首的字母编号前缀
static LETTER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([A-Za-z])\)\s*(.*)$").expect("编号前缀正则编译失败"));

/// 正确答案串里的带括号字母，如 "A) ..." 中的 A
static CORRECT_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z])\)").expect("正确字母正则编译失败"));

/// 正确答案串里的裸单字母（"B" / "A, C"），仅在没有带括号字母时启用
static BARE_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z])\b").expect("裸字母正则编译失败"));

/// 解析选项串为有序的 Option 行
///
/// 选项串为空（trim 后）时返回空列表；编号缺失时按位置补 A、B、C…；
/// 没有其他失败路径。
pub fn parse_options(
    question_key: &str,
    q_type: QuestionType,
    variant: Option<HotspotVariant>,
    options_str: &str,
    correct_str: &str,
) -> Vec<OptionRow> {
    let options_str = options_str.trim();
    let correct_str = correct_str.trim();

    if options_str.is_empty() {
        return Vec::new();
    }

    // 1. 切分：带字母编号的列表按 "; + 编号" 切，避免把选项内部的分号切碎；
    //    否则序列类按分号/换行切，其余按分号切
    let raw_fragments: Vec<&str> = if LETTER_MARK_RE.is_match(options_str) {
        split_before_letter_markers(options_str)
    } else if q_type.is_sequence() {
        options_str.split([';', '\n']).collect()
    } else {
        options_str.split(';').collect()
    };

    let fragments: Vec<&str> = raw_fragments
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect();

    // 2. 提取正确答案串中的字母集合
    let correct_letters = extract_correct_letters(correct_str);

    // 3. 逐个成行
    let mut rows = Vec::with_capacity(fragments.len());
    for (pos, fragment) in fragments.iter().enumerate() {
        let idx = (pos + 1) as u32;

        let (letter, body) = match LETTER_PREFIX_RE.captures(fragment) {
            Some(caps) => (
                caps[1].chars().next().unwrap().to_ascii_uppercase(),
                caps[2].trim().to_string(),
            ),
            // 上游没给编号时按 1-based 位置顺延 A、B、C…
            None => (sequential_letter(idx), fragment.to_string()),
        };

        let mut is_correct = false;
        let mut correct_order = None;

        if q_type.is_sequence() {
            // 序列类：文本命中即视为序列成员；CorrectOrder 取解析位置
            // （不按正确答案串自身的顺序重排，上游顺序不可靠）
            if !body.is_empty() && correct_str.contains(&body) {
                is_correct = true;
                correct_order = Some(idx);
            }
        } else {
            // 常规：字母命中，或文本体（长度 > 1，防单字符误中）是正确串的子串
            is_correct = correct_letters.contains(&letter)
                || (body.chars().count() > 1 && correct_str.contains(&body));
        }

        let mut hotspot_meta = None;
        if q_type == QuestionType::Hotspot {
            let variant = variant.unwrap_or(HotspotVariant::ClickRegion);
            match variant {
                HotspotVariant::YesNoMatrix => {
                    // 陈述行的存在本身就要保留，真值记入元数据后强制标记为正确
                    hotspot_meta = Some(json!({
                        "variant": "yes_no_matrix",
                        "answer": if is_correct { "yes" } else { "no" },
                    }));
                    is_correct = true;
                }
                HotspotVariant::Dropdown => {
                    hotspot_meta = Some(json!({
                        "variant": "dropdown",
                        "slot": format!("SLOT{}", idx),
                        "label": "Selection",
                        "choices": [body.clone()],
                        "correct": body.clone(),
                    }));
                    is_correct = true;
                }
                HotspotVariant::ClickRegion => {
                    // 占位矩形，纵向按选项序号错开；坐标待人工标注
                    hotspot_meta = Some(json!({
                        "variant": "click_region",
                        "shape": "rect",
                        "x": 10,
                        "y": 15 * idx,
                        "width": 20,
                        "height": 10,
                        "needs_review": true,
                    }));
                }
            }
        }

        rows.push(OptionRow {
            question_key: question_key.to_string(),
            text: body,
            is_correct,
            order_index: idx,
            correct_order,
            hotspot_meta,
        });
    }

    rows
}

/// 在每个 "; + 字母编号" 边界前切开，编号留在下一段
fn split_before_letter_markers(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for m in SPLIT_BOUNDARY_RE.find_iter(s) {
        parts.push(&s[start..m.start()]);
        start = m.start() + 1; // 跳过分号本身
    }
    parts.push(&s[start..]);
    parts
}

/// 从正确答案串提取字母集合
///
/// 优先认 "A)" 式带括号编号；一个都没有时退化为裸单字母
/// （覆盖 "B" / "A, C" 这类写法，普通单词不会命中）。
fn extract_correct_letters(correct_str: &str) -> HashSet<char> {
    let mut letters: HashSet<char> = CORRECT_LETTER_RE
        .captures_iter(correct_str)
        .map(|c| c[1].chars().next().unwrap().to_ascii_uppercase())
        .collect();

    if letters.is_empty() {
        letters = BARE_LETTER_RE
            .captures_iter(correct_str)
            .map(|c| c[1].chars().next().unwrap().to_ascii_uppercase())
            .collect();
    }

    letters
}

fn sequential_letter(idx: u32) -> char {
    char::from_u32(64 + idx).unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(
        q_type: QuestionType,
        variant: Option<HotspotVariant>,
        options: &str,
        correct: &str,
    ) -> Vec<OptionRow> {
        parse_options("Q_TEST", q_type, variant, options, correct)
    }

    #[test]
    fn test_lettered_split_with_bare_letter_answer() {
        let rows = parse(
            QuestionType::MultipleChoice,
            None,
            "A) Alpha; B) Beta; C) Gamma",
            "B",
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].text, "Alpha");
        assert_eq!(rows[1].text, "Beta");
        assert_eq!(rows[2].text, "Gamma");
        assert_eq!(
            rows.iter().map(|r| r.order_index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(!rows[0].is_correct);
        assert!(rows[1].is_correct);
        assert!(!rows[2].is_correct);
    }

    #[test]
    fn test_internal_semicolon_not_split() {
        // 选项内部的分号不在 "; + 编号" 边界上，不能切碎
        let rows = parse(
            QuestionType::MultipleChoice,
            None,
            "A) Run cmd; then reboot; B) Do nothing",
            "A)",
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text, "Run cmd; then reboot");
        assert_eq!(rows[1].text, "Do nothing");
        assert!(rows[0].is_correct);
    }

    #[test]
    fn test_unlettered_sequential_letters() {
        let rows = parse(
            QuestionType::MultipleAnswer,
            None,
            "Enable MFA; Disable SSPR; Create a group",
            "A, C",
        );
        assert_eq!(rows.len(), 3);
        // 未带编号时按位置补 A、B、C，再按字母匹配
        assert!(rows[0].is_correct);
        assert!(!rows[1].is_correct);
        assert!(rows[2].is_correct);
    }

    #[test]
    fn test_text_substring_match() {
        let rows = parse(
            QuestionType::MultipleChoice,
            None,
            "A) Enable soft delete; B) Purge protection",
            "The correct approach is Purge protection",
        );
        assert!(!rows[0].is_correct);
        assert!(rows[1].is_correct);
    }

    #[test]
    fn test_single_char_body_not_substring_matched() {
        // 单字符文本体不参与子串匹配，防止误中
        let rows = parse(QuestionType::MultipleChoice, None, "A) 1; B) 2", "value 12");
        assert!(!rows[0].is_correct);
        assert!(!rows[1].is_correct);
    }

    #[test]
    fn test_sequence_correct_order_is_input_order() {
        let rows = parse(
            QuestionType::DragDrop,
            None,
            "Step One; Step Two; Step Three",
            "Step Two; Step One; Step Three",
        );
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.is_correct));
        // 接受的简化：CorrectOrder 取解析位置，不按正确串自身顺序重排
        assert_eq!(
            rows.iter().map(|r| r.correct_order).collect::<Vec<_>>(),
            vec![Some(1), Some(2), Some(3)]
        );
    }

    #[test]
    fn test_sequence_newline_split() {
        let rows = parse(
            QuestionType::DragDrop,
            None,
            "Step One\nStep Two\nStep Three",
            "Step One; Step Two",
        );
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_correct);
        assert!(rows[1].is_correct);
        assert!(!rows[2].is_correct);
        assert_eq!(rows[2].correct_order, None);
    }

    #[test]
    fn test_empty_options() {
        assert!(parse(QuestionType::MultipleChoice, None, "", "A").is_empty());
        assert!(parse(QuestionType::DragDrop, None, "   ", "whatever").is_empty());
    }

    #[test]
    fn test_trailing_semicolon_dropped() {
        let rows = parse(QuestionType::MultipleChoice, None, "A) Yes; B) No; ", "A");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_hotspot_yes_no_matrix() {
        let rows = parse(
            QuestionType::Hotspot,
            Some(HotspotVariant::YesNoMatrix),
            "A) VM1 can access the vault; B) VM2 can access the vault",
            "A",
        );
        assert_eq!(rows.len(), 2);
        // 陈述行全部保留为 "正确"，真值落在元数据里
        assert!(rows.iter().all(|r| r.is_correct));
        let meta0 = rows[0].hotspot_meta.as_ref().unwrap();
        let meta1 = rows[1].hotspot_meta.as_ref().unwrap();
        assert_eq!(meta0["answer"], "yes");
        assert_eq!(meta1["answer"], "no");
    }

    #[test]
    fn test_hotspot_dropdown() {
        let rows = parse(
            QuestionType::Hotspot,
            Some(HotspotVariant::Dropdown),
            "az vm create; az vm start",
            "",
        );
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.is_correct));
        let meta = rows[1].hotspot_meta.as_ref().unwrap();
        assert_eq!(meta["slot"], "SLOT2");
        assert_eq!(meta["correct"], "az vm start");
        assert_eq!(meta["choices"][0], "az vm start");
    }

    #[test]
    fn test_hotspot_click_region_placeholder() {
        let rows = parse(
            QuestionType::Hotspot,
            Some(HotspotVariant::ClickRegion),
            "A) Networking blade; B) Access control blade",
            "B",
        );
        // click_region 不强制正确，沿用常规匹配
        assert!(!rows[0].is_correct);
        assert!(rows[1].is_correct);
        let m0 = rows[0].hotspot_meta.as_ref().unwrap();
        let m1 = rows[1].hotspot_meta.as_ref().unwrap();
        assert_eq!(m0["shape"], "rect");
        assert_eq!(m0["needs_review"], true);
        // 占位坐标按序号纵向错开
        assert_ne!(m0["y"], m1["y"]);
    }

    #[test]
    fn test_correct_letters_prefer_parenthesized() {
        // 有带括号编号时裸字母不启用："B) Beta" 只认 B
        let letters = extract_correct_letters("B) Beta is right");
        assert_eq!(letters.len(), 1);
        assert!(letters.contains(&'B'));

        let letters = extract_correct_letters("A and C");
        assert!(letters.contains(&'A'));
        assert!(letters.contains(&'C'));
    }
}
