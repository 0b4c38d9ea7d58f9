//! 输入文件加载：记录数组、图片 URL 映射、图片清单
//!
//! 电子表格与 JSON 之间的转换由上游协作方负责，这里只认 JSON。

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

/// 加载输入记录（JSON 数组，每个元素是 列名 -> 原始值 的对象）
pub fn load_records(path: &Path) -> Result<Vec<Map<String, Value>>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取文件: {:?}", path))?;
    let value: Value =
        serde_json::from_str(&content).with_context(|| format!("JSON 解析失败: {:?}", path))?;

    let Value::Array(items) = value else {
        bail!("输入文件顶层必须是 JSON 数组: {:?}", path);
    };

    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) => records.push(map),
            other => bail!("第 {} 条记录不是 JSON 对象: {}", i + 1, other),
        }
    }
    Ok(records)
}

/// 加载图片 URL 映射（题干原文 -> URL），非字符串值忽略
pub fn load_lookup(path: &Path) -> Result<HashMap<String, String>> {
    load_string_map(path)
}

/// 加载图片清单（题干原文 -> 本地图片路径）
pub fn load_manifest(path: &Path) -> Result<HashMap<String, String>> {
    load_string_map(path)
}

fn load_string_map(path: &Path) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取文件: {:?}", path))?;
    let value: Value =
        serde_json::from_str(&content).with_context(|| format!("JSON 解析失败: {:?}", path))?;

    // 协作方偶尔会把 JSON 再包一层字符串，解开一次
    let value = match value {
        Value::String(inner) => serde_json::from_str(&inner)
            .with_context(|| format!("内层 JSON 解析失败: {:?}", path))?,
        other => other,
    };

    let Value::Object(map) = value else {
        bail!("映射文件顶层必须是 JSON 对象: {:?}", path);
    };

    Ok(map
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect())
}
