//! 单行处理流程
//!
//! 完整流程：层级解析 → 场景去重 → 题目建行（媒体解析）→ 选项解析 → 提示建行。
//! 行内异常一律降级为诊断日志，不丢行。

pub mod hierarchy;
pub mod hotspot;
pub mod options;
pub mod scenario;

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::app::keys::make_key;
use crate::app::models::{
    CategoryRow, CollectionRow, HintRow, MiningTables, OptionRow, QuestionRow, QuestionType,
    QuizRow, ScenarioRow,
};
use crate::app::record::NormalizedRecord;
use crate::app::workflow::RowCtx;
use crate::config::{self, OrderPolicy};

/// 题干中的图片引用占位符
static IMAGE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<<IMAGE_REF_\d+>>").expect("图片引用正则编译失败"));

/// has_image 为真但图片协作方尚未给出 URL 时的哨兵值
pub const MEDIA_PENDING: &str = "PENDING_UPLOAD";

/// 整个运行期间的共享可变状态：三级层级映射、场景哈希映射、四张有序表
///
/// 显式传入每一步，而不是做成环境全局量；去重映射可以脱离流水线单测。
pub struct MiningContext {
    /// 键 -> 行 的去重映射（导出顺序与插入顺序无关，按键序即可）
    pub categories: BTreeMap<String, CategoryRow>,
    pub collections: BTreeMap<String, CollectionRow>,
    pub quizzes: BTreeMap<String, QuizRow>,
    /// 场景内容哈希 -> 场景键
    pub(crate) seen_scenarios: HashMap<String, String>,
    /// 有序表：插入顺序即导出行序
    pub scenarios: Vec<ScenarioRow>,
    pub questions: Vec<QuestionRow>,
    pub options: Vec<OptionRow>,
    pub hints: Vec<HintRow>,
    /// 每个 Quiz 的题目序号计数（per_quiz 策略用）
    quiz_order: HashMap<String, u32>,
    pub(crate) order_policy: OrderPolicy,
    pub(crate) scenario_min_len: usize,
}

impl MiningContext {
    pub fn new() -> Self {
        let cfg = config::get();
        Self {
            categories: BTreeMap::new(),
            collections: BTreeMap::new(),
            quizzes: BTreeMap::new(),
            seen_scenarios: HashMap::new(),
            scenarios: Vec::new(),
            questions: Vec::new(),
            options: Vec::new(),
            hints: Vec::new(),
            quiz_order: HashMap::new(),
            order_policy: cfg.order_policy,
            scenario_min_len: cfg.scenario_min_len,
        }
    }

    #[cfg(test)]
    pub fn with_order_policy(policy: OrderPolicy) -> Self {
        let mut ctx = Self::new();
        ctx.order_policy = policy;
        ctx
    }

    /// 收尾：导出七表快照，跨表键已保证可解析
    pub fn into_tables(self) -> MiningTables {
        MiningTables {
            categories: self.categories.into_values().collect(),
            collections: self.collections.into_values().collect(),
            quizzes: self.quizzes.into_values().collect(),
            scenarios: self.scenarios,
            questions: self.questions,
            options: self.options,
            hints: self.hints,
        }
    }
}

/// 处理单条输入记录（row_index 为 0-based 全局行号）
pub fn process_row(
    row_index: usize,
    rec: &NormalizedRecord,
    lookup: &HashMap<String, String>,
    collection_override: Option<&str>,
    ctx: &mut MiningContext,
) {
    let cfg = config::get();

    // === 1. 层级解析 ===
    let quiz_key = hierarchy::resolve_hierarchy(rec, collection_override, ctx);
    let quiz_title = ctx
        .quizzes
        .get(&quiz_key)
        .map(|q| q.title.clone())
        .unwrap_or_default();
    let row_ctx = RowCtx {
        row_index: row_index + 1,
        quiz_title,
    };
    let prefix = row_ctx.log_prefix();

    // === 2. 场景去重 ===
    let scenario_key = scenario::resolve_scenario(rec, &quiz_key, &prefix, ctx);

    // === 3. 题目建行 ===
    let q_text = rec.question.clone().unwrap_or_default();
    let q_type = QuestionType::from_raw(rec.question_type.as_deref());

    let seed_head: String = q_text.chars().take(10).collect();
    let question_key = make_key("Q", &format!("{}_{}_{}", quiz_key, row_index, seed_head));

    let order = match ctx.order_policy {
        OrderPolicy::PerQuiz => {
            let counter = ctx.quiz_order.entry(quiz_key.clone()).or_insert(0);
            *counter += 1;
            *counter
        }
        OrderPolicy::Global => (row_index + 1) as u32,
    };

    let media_url = resolve_media_url(rec, &q_text, lookup, &prefix);

    // 选项串：空缺时尝试图片协作方的 OCR 抢救文本
    let options_str = rec.options.clone().or_else(|| {
        let rescued = lookup.get(&format!("{}_OCR", q_text)).cloned();
        if rescued.is_some() {
            debug!("{} 选项为空，采用 OCR 抢救文本", prefix);
        }
        rescued
    });

    // hotspot 题先判定子类型，其余题型无子类型
    let variant = (q_type == QuestionType::Hotspot).then(|| {
        hotspot::classify_hotspot_variant(&q_text, options_str.as_deref().unwrap_or(""))
    });

    let correct_str = rec.correct_options.clone().unwrap_or_default();

    ctx.questions.push(QuestionRow {
        question_key: question_key.clone(),
        quiz_key: quiz_key.clone(),
        question_type: q_type.as_str().to_string(),
        variant: variant.map(|v| v.as_str().to_string()),
        text: q_text,
        explanation: rec.explanation.clone().unwrap_or_default(),
        points: cfg.default_points,
        order,
        scenario_key: scenario_key.clone(),
        scenario_order: scenario_key.is_some().then_some(1),
        correct_answer: correct_str.clone(),
        fuzzy_match: false,
        partial_scoring: q_type.partial_scoring(),
        media_url,
    });

    // === 4. 选项解析 ===
    let opt_rows = options::parse_options(
        &question_key,
        q_type,
        variant,
        options_str.as_deref().unwrap_or(""),
        &correct_str,
    );

    if opt_rows.is_empty() && q_type != QuestionType::ShortAnswer {
        warn!(
            target: "row_diagnostics",
            "{} 选项为空（题型 {}），仅保留题目行", prefix, q_type.as_str()
        );
    } else if !opt_rows.is_empty() && !opt_rows.iter().any(|o| o.is_correct) {
        warn!(
            target: "row_diagnostics",
            "{} 正确答案串未匹配到任何选项: {:?}", prefix, correct_str
        );
    }
    ctx.options.extend(opt_rows);

    // === 5. 提示建行（当前范围内每题至多一条） ===
    if let Some(hint_text) = rec.cleaned_hint() {
        ctx.hints.push(HintRow {
            question_key,
            hint_text,
            hint_order: 1,
            points_deduction: 0,
        });
    }
}

/// 题目媒体 URL 解析：外部映射精确命中（原文/去占位符）优先，
/// 其次 has_image 标记落哨兵值，否则留空
fn resolve_media_url(
    rec: &NormalizedRecord,
    q_text: &str,
    lookup: &HashMap<String, String>,
    prefix: &str,
) -> Option<String> {
    if let Some(url) = lookup.get(q_text) {
        return Some(url.clone());
    }

    let stripped = IMAGE_REF_RE.replace_all(q_text, "");
    let stripped = stripped.trim();
    if stripped != q_text {
        if let Some(url) = lookup.get(stripped) {
            return Some(url.clone());
        }
    }

    if rec.has_image_flag() {
        debug!(
            target: "row_diagnostics",
            "{} has_image 为真但映射未命中，媒体字段置 {}", prefix, MEDIA_PENDING
        );
        return Some(MEDIA_PENDING.to_string());
    }

    None
}
