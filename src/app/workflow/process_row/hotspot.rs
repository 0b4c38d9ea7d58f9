//! hotspot 题的结构子类型判定
//!
//! 纯函数：只看题面与选项文本中的结构标记，无副作用。

use std::sync::LazyLock;

use regex::Regex;

use crate::app::models::HotspotVariant;

/// 下拉槽位占位符，如 [SLOT1] / [slot_2] / [SLOT]
static SLOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[slot[ _-]?\d*\]").expect("槽位正则编译失败"));

/// 是/否（或 true/false）选择句式
static YES_NO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\byes\s*(?:or|/)\s*no\b|\btrue\s*(?:or|/)\s*false\b").expect("是否句式正则编译失败")
});

/// 判定 hotspot 子类型（仅对 hotspot 题调用）
///
/// 槽位占位符 -> dropdown；是/否选择句式 -> yes_no_matrix；
/// 两者都没有 -> click_region（图片点击，默认）。
pub fn classify_hotspot_variant(question_text: &str, options_text: &str) -> HotspotVariant {
    let combined = format!("{} {}", question_text, options_text).to_lowercase();

    if SLOT_RE.is_match(&combined) {
        return HotspotVariant::Dropdown;
    }
    if YES_NO_RE.is_match(&combined) {
        return HotspotVariant::YesNoMatrix;
    }
    HotspotVariant::ClickRegion
}
