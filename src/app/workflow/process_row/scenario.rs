//! 案例场景（Case Study）按内容哈希去重
//!
//! 同一段场景文本会被多道题重复携带，必须折叠为同一个 Scenario 行；
//! 过短的文本（如 "Topic 1" 这类占位）不建行。

use tracing::debug;

use crate::app::keys::{content_hash, make_key};
use crate::app::models::ScenarioRow;
use crate::app::record::NormalizedRecord;
use crate::app::workflow::process_row::MiningContext;

/// 解析当前行的场景归属，返回 Scenario 键（无有效场景时为 None）
///
/// 去重只看文本内容本身，与行位置无关；序号标题按首见顺序分配。
pub fn resolve_scenario(
    rec: &NormalizedRecord,
    quiz_key: &str,
    prefix: &str,
    ctx: &mut MiningContext,
) -> Option<String> {
    let text = rec.scenario.as_deref()?.trim();

    // 有效性检查：不超过阈值长度的视为占位标签
    if text.chars().count() <= ctx.scenario_min_len {
        debug!(
            target: "row_diagnostics",
            "{} 场景文本过短（{} 字符），不建 Scenario 行", prefix, text.chars().count()
        );
        return None;
    }

    let hash = content_hash(text);
    if let Some(key) = ctx.seen_scenarios.get(&hash) {
        return Some(key.clone());
    }

    let key = make_key("SCN", &hash);
    ctx.seen_scenarios.insert(hash, key.clone());

    let seq = ctx.seen_scenarios.len() as u32;
    ctx.scenarios.push(ScenarioRow {
        scenario_key: key.clone(),
        quiz_key: quiz_key.to_string(),
        title: format!("Case Study {}", seq),
        context: text.to_string(),
        media_url: String::new(),
        media_type: "text".to_string(),
        time_duration: 600,
        order: seq,
    });

    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_record(text: &str) -> NormalizedRecord {
        NormalizedRecord {
            scenario: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_dedup_identical_text() {
        let mut ctx = MiningContext::new();
        let rec = scenario_record("Contoso has a hybrid environment with 500 users.");

        let k1 = resolve_scenario(&rec, "QUIZ_X", "[行#1]", &mut ctx);
        let k2 = resolve_scenario(&rec, "QUIZ_X", "[行#5]", &mut ctx);

        assert!(k1.is_some());
        assert_eq!(k1, k2);
        assert_eq!(ctx.scenarios.len(), 1);
        assert_eq!(ctx.scenarios[0].title, "Case Study 1");
        assert_eq!(ctx.scenarios[0].order, 1);
    }

    #[test]
    fn test_distinct_text_new_row() {
        let mut ctx = MiningContext::new();
        let a = scenario_record("Contoso has a hybrid environment with 500 users.");
        let b = scenario_record("Fabrikam plans to migrate 40 databases to the cloud.");

        let ka = resolve_scenario(&a, "QUIZ_X", "[行#1]", &mut ctx);
        let kb = resolve_scenario(&b, "QUIZ_X", "[行#2]", &mut ctx);

        assert_ne!(ka, kb);
        assert_eq!(ctx.scenarios.len(), 2);
        assert_eq!(ctx.scenarios[1].title, "Case Study 2");
        assert_eq!(ctx.scenarios[1].order, 2);
    }

    #[test]
    fn test_short_text_below_threshold() {
        let mut ctx = MiningContext::new();
        // 默认阈值 15：恰好等于阈值也不建行
        let rec = scenario_record("Topic 1 Part AB");
        assert_eq!(rec.scenario.as_deref().unwrap().chars().count(), 15);

        let key = resolve_scenario(&rec, "QUIZ_X", "[行#1]", &mut ctx);
        assert!(key.is_none());
        assert!(ctx.scenarios.is_empty());
    }

    #[test]
    fn test_missing_scenario() {
        let mut ctx = MiningContext::new();
        let rec = NormalizedRecord::default();
        assert!(resolve_scenario(&rec, "QUIZ_X", "[行#1]", &mut ctx).is_none());
    }
}
