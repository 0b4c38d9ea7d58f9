//! 七张导出表的行结构与题型枚举
//!
//! 字段名与下游导入模板的列名保持一致（PascalCase），序列化时直接作为列名。

use serde::Serialize;
use serde_json::Value;

/// 题型枚举（未识别的类型一律回落为单选）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    MultipleChoice,
    MultipleAnswer,
    TrueFalse,
    ShortAnswer,
    DragDrop,
    Hotspot,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::MultipleAnswer => "multiple_answer",
            QuestionType::TrueFalse => "true_false",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::DragDrop => "drag_drop",
            QuestionType::Hotspot => "hotspot",
        }
    }

    /// 从原始字符串解析题型
    ///
    /// `sequence` / `ordering` 是 drag_drop 的历史别名，统一归并；
    /// 其余未知值回落为 multiple_choice。
    pub fn from_raw(raw: Option<&str>) -> Self {
        let raw = raw.unwrap_or("").trim().to_lowercase();
        match raw.as_str() {
            "multiple_choice" => QuestionType::MultipleChoice,
            "multiple_answer" => QuestionType::MultipleAnswer,
            "true_false" => QuestionType::TrueFalse,
            "short_answer" => QuestionType::ShortAnswer,
            "drag_drop" | "sequence" | "ordering" => QuestionType::DragDrop,
            "hotspot" => QuestionType::Hotspot,
            _ => QuestionType::MultipleChoice,
        }
    }

    /// 序列类题型：选项整体构成一个有序答案
    pub fn is_sequence(&self) -> bool {
        matches!(self, QuestionType::DragDrop)
    }

    /// 是否支持部分给分
    pub fn partial_scoring(&self) -> bool {
        matches!(self, QuestionType::MultipleAnswer | QuestionType::DragDrop)
    }
}

/// hotspot 题的结构子类型（按题面文本在入库时判定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotspotVariant {
    /// 下拉槽位填空（题面含 [SLOT...] 占位符）
    Dropdown,
    /// 是/否 陈述矩阵
    YesNoMatrix,
    /// 图片点击区域（默认）
    ClickRegion,
}

impl HotspotVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            HotspotVariant::Dropdown => "dropdown",
            HotspotVariant::YesNoMatrix => "yes_no_matrix",
            HotspotVariant::ClickRegion => "click_region",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRow {
    #[serde(rename = "CategoryKey")]
    pub category_key: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Icon")]
    pub icon: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "IsActive")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionRow {
    #[serde(rename = "CollectionKey")]
    pub collection_key: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "CategoryKey")]
    pub category_key: String,
    #[serde(rename = "Difficulty")]
    pub difficulty: String,
    #[serde(rename = "IsPublic")]
    pub is_public: bool,
    #[serde(rename = "InstructorName")]
    pub instructor_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizRow {
    #[serde(rename = "QuizKey")]
    pub quiz_key: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "CollectionKey")]
    pub collection_key: String,
    #[serde(rename = "Difficulty")]
    pub difficulty: String,
    #[serde(rename = "PassMark")]
    pub pass_mark: u32,
    #[serde(rename = "TimeLimitSeconds")]
    pub time_limit_seconds: u32,
    #[serde(rename = "IsPublic")]
    pub is_public: bool,
    #[serde(rename = "Tags")]
    pub tags: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRow {
    #[serde(rename = "ScenarioKey")]
    pub scenario_key: String,
    #[serde(rename = "QuizKey")]
    pub quiz_key: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Context")]
    pub context: String,
    #[serde(rename = "MediaUrl")]
    pub media_url: String,
    #[serde(rename = "MediaType")]
    pub media_type: String,
    #[serde(rename = "TimeDuration")]
    pub time_duration: u32,
    #[serde(rename = "Order")]
    pub order: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionRow {
    #[serde(rename = "QuestionKey")]
    pub question_key: String,
    #[serde(rename = "QuizKey")]
    pub quiz_key: String,
    #[serde(rename = "Type")]
    pub question_type: String,
    /// 仅 hotspot 题有值
    #[serde(rename = "Variant")]
    pub variant: Option<String>,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Explanation")]
    pub explanation: String,
    #[serde(rename = "Points")]
    pub points: u32,
    #[serde(rename = "Order")]
    pub order: u32,
    #[serde(rename = "ScenarioKey")]
    pub scenario_key: Option<String>,
    #[serde(rename = "ScenarioOrder")]
    pub scenario_order: Option<u32>,
    /// 原始正确答案文本，作为下游兜底展示
    #[serde(rename = "CorrectAnswer")]
    pub correct_answer: String,
    #[serde(rename = "FuzzyMatch")]
    pub fuzzy_match: bool,
    #[serde(rename = "PartialScoring")]
    pub partial_scoring: bool,
    #[serde(rename = "MediaUrl")]
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionRow {
    #[serde(rename = "QuestionKey")]
    pub question_key: String,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "IsCorrect")]
    pub is_correct: bool,
    /// 1-based，按输入顺序
    #[serde(rename = "OrderIndex")]
    pub order_index: u32,
    /// 仅序列类题型有值
    #[serde(rename = "CorrectOrder")]
    pub correct_order: Option<u32>,
    /// hotspot 题的子类型元数据（坐标/槽位/是否矩阵）
    #[serde(rename = "HotspotMeta")]
    pub hotspot_meta: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HintRow {
    #[serde(rename = "QuestionKey")]
    pub question_key: String,
    #[serde(rename = "HintText")]
    pub hint_text: String,
    #[serde(rename = "HintOrder")]
    pub hint_order: u32,
    #[serde(rename = "PointsDeduction")]
    pub points_deduction: u32,
}

/// 一次完整运行产出的七表快照，顶层键即导出工作表名
#[derive(Debug, Serialize)]
pub struct MiningTables {
    #[serde(rename = "Categories")]
    pub categories: Vec<CategoryRow>,
    #[serde(rename = "Collections")]
    pub collections: Vec<CollectionRow>,
    #[serde(rename = "Quizzes")]
    pub quizzes: Vec<QuizRow>,
    #[serde(rename = "Scenarios")]
    pub scenarios: Vec<ScenarioRow>,
    #[serde(rename = "Questions")]
    pub questions: Vec<QuestionRow>,
    #[serde(rename = "Options")]
    pub options: Vec<OptionRow>,
    #[serde(rename = "Hints")]
    pub hints: Vec<HintRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_from_raw() {
        assert_eq!(
            QuestionType::from_raw(Some("Drag_Drop")),
            QuestionType::DragDrop
        );
        assert_eq!(
            QuestionType::from_raw(Some("ordering")),
            QuestionType::DragDrop
        );
        assert_eq!(
            QuestionType::from_raw(Some("图文混排")),
            QuestionType::MultipleChoice
        );
        assert_eq!(QuestionType::from_raw(None), QuestionType::MultipleChoice);
    }

    #[test]
    fn test_partial_scoring() {
        assert!(QuestionType::MultipleAnswer.partial_scoring());
        assert!(QuestionType::DragDrop.partial_scoring());
        assert!(!QuestionType::Hotspot.partial_scoring());
    }
}
