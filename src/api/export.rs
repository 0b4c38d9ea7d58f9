//! 七表快照导出
//!
//! 写为单个 JSON 文档，顶层键即工作表名；转回 XLSX 由外部步骤完成。

use std::path::Path;

use anyhow::{Context, Result};

use crate::app::models::MiningTables;

/// 将七表快照写到目标路径（整体一次写出，保证内部一致）
pub fn write_tables(path: &Path, tables: &MiningTables) -> Result<()> {
    let json = serde_json::to_string_pretty(tables).context("七表快照序列化失败")?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("创建输出目录失败: {:?}", parent))?;
        }
    }
    std::fs::write(path, json).with_context(|| format!("写出文件失败: {:?}", path))?;

    Ok(())
}
