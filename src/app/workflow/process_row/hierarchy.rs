//! Category -> Collection -> Quiz 三级层级的解析与去重
//!
//! 三级都用内容派生键做幂等插入：首见建行，复见复用，后续行永不改写已建的行。

use crate::app::keys::make_key;
use crate::app::models::{CategoryRow, CollectionRow, QuizRow};
use crate::app::record::NormalizedRecord;
use crate::app::tags::infer_tags;
use crate::app::workflow::process_row::MiningContext;
use crate::config;

/// 解析当前行的层级归属，返回 Quiz 键
///
/// Collection 名的取值优先级：记录值 > 命令行覆盖 > 配置默认值。
/// Quiz 首见时做一次性标签推断（标题 + 当前行的题目/解析文本）。
pub fn resolve_hierarchy(
    rec: &NormalizedRecord,
    collection_override: Option<&str>,
    ctx: &mut MiningContext,
) -> String {
    let cfg = config::get();

    let cat_name = rec
        .category
        .clone()
        .unwrap_or_else(|| cfg.default_category.clone());
    let col_name = rec
        .collection
        .clone()
        .or_else(|| collection_override.map(str::to_string))
        .unwrap_or_else(|| cfg.default_collection.clone());
    let quiz_title = rec
        .quiz
        .clone()
        .unwrap_or_else(|| format!("{} Batch 1", col_name));

    let cat_key = make_key("CAT", &cat_name);
    let col_key = make_key("COL", &col_name);
    let quiz_key = make_key("QUIZ", &quiz_title);

    ctx.categories
        .entry(cat_key.clone())
        .or_insert_with(|| CategoryRow {
            category_key: cat_key.clone(),
            name: cat_name.clone(),
            description: format!("{} Certification", cat_name),
            icon: "server".to_string(),
            color: "#3B82F6".to_string(),
            is_active: true,
        });

    ctx.collections
        .entry(col_key.clone())
        .or_insert_with(|| CollectionRow {
            collection_key: col_key.clone(),
            name: col_name.clone(),
            description: format!("Preparation for {}", col_name),
            category_key: cat_key.clone(),
            difficulty: "medium".to_string(),
            is_public: true,
            instructor_name: cfg.instructor_name.clone(),
        });

    if !ctx.quizzes.contains_key(&quiz_key) {
        // 标签只在 Quiz 首见时推断一次，取首行内容作为样本
        let sample = format!(
            "{} {}",
            rec.question.as_deref().unwrap_or(""),
            rec.explanation.as_deref().unwrap_or("")
        );
        let tags = infer_tags(&sample, &quiz_title);

        ctx.quizzes.insert(
            quiz_key.clone(),
            QuizRow {
                quiz_key: quiz_key.clone(),
                title: quiz_title.clone(),
                description: format!("Practice questions for {}", quiz_title),
                collection_key: col_key,
                difficulty: rec
                    .difficulty
                    .clone()
                    .unwrap_or_else(|| "medium".to_string()),
                pass_mark: cfg.default_passmark,
                time_limit_seconds: 3600,
                is_public: true,
                tags,
            },
        );
    }

    quiz_key
}
