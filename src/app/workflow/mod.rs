pub mod pipeline;
pub mod process_row;

/// 行级上下文，贯穿单行处理全程（仅用于日志定位）
pub struct RowCtx {
    /// 输入中的行号（从 1 开始）
    pub row_index: usize,
    /// 归属的 Quiz 标题（已解析后填入）
    pub quiz_title: String,
}

impl RowCtx {
    /// 生成日志前缀
    pub fn log_prefix(&self) -> String {
        format!("[行#{} {}]", self.row_index, self.quiz_title)
    }
}
