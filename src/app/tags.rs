//! 按关键词规则从题面内容推断 Quiz 标签
//!
//! 每个 Quiz 只在首次出现时推断一次，输入为标题 + 首行题目/解析文本。

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config;

/// 标题中的考试代号模式，如 az-104 / dp-900 / pl-300
static EXAM_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-z]{1,3}-\d{2,4})\b").expect("考试代号正则编译失败"));

/// 关键词 -> 领域标签 对照表
///
/// 模式命中零次或多次都只贡献一次标签（集合语义）。
static KEYWORD_TAG_MAP: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    let table: &[(&str, &str)] = &[
        (r"\b(azure\s*ad|entra)\b", "identity"),
        (r"\bconditional access\b", "conditional-access"),
        (r"\bmfa\b", "mfa"),
        (r"\brbac\b", "rbac"),
        (r"\bkey vault\b", "key-vault"),
        (r"\bmanaged identity\b", "managed-identity"),
        (r"\bpolicy\b", "policy"),
        (r"\bblob\b|\bstorage account\b", "storage"),
        (r"\bcosmos db\b", "cosmosdb"),
        (r"\bsql\b", "sql"),
        (r"\bvirtual machine\b|\bvm\b", "compute"),
        (r"\baks\b|\bkubernetes\b", "containers"),
        (r"\bvnet\b|\bnsg\b", "networking"),
        (r"\bmonitor\b", "monitoring"),
        (r"\bsentinel\b", "sentinel"),
        (r"\bpower bi\b", "power-bi"),
        (r"\bdax\b", "dax"),
        (r"\bdata modeling\b", "data-modeling"),
        (r"\bvisualization\b", "visualization"),
        (r"\bpower query\b", "power-query"),
    ];
    table
        .iter()
        .map(|(pat, tag)| (Regex::new(pat).expect("标签正则编译失败"), *tag))
        .collect()
});

/// 推断标签集合，逗号拼接，数量受配置上限约束（默认 8）
pub fn infer_tags(content: &str, title: &str) -> String {
    let mut tags: BTreeSet<String> = BTreeSet::new();

    // 1. 标题中的考试代号，大写后作为标签
    if let Some(caps) = EXAM_CODE_RE.captures(&title.to_lowercase()) {
        tags.insert(caps[1].to_uppercase());
    }

    // 2. 正文关键词扫描
    let content = content.to_lowercase();
    for (re, tag) in KEYWORD_TAG_MAP.iter() {
        if re.is_match(&content) {
            tags.insert((*tag).to_string());
        }
    }

    tags.into_iter()
        .take(config::get().max_tags)
        .collect::<Vec<_>>()
        .join(",")
}
