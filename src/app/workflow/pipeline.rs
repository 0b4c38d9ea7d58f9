use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::export::write_tables;
use crate::api::loaders::{load_lookup, load_manifest, load_records};
use crate::api::upload::UploadClient;
use crate::app::record::NormalizedRecord;
use crate::app::workflow::process_row::{process_row, MiningContext};
use crate::Args;

/// 主流程：加载 → 逐行挖掘 → 导出
///
/// 只有输入文件加载失败是致命的；行内异常全部降级为诊断日志，不丢行。
pub async fn run(args: &Args) -> Result<()> {
    // === 1. 加载输入（致命路径） ===
    let records = load_records(&args.input)
        .with_context(|| format!("加载输入文件失败: {:?}", args.input))?;
    info!("已加载 {} 条输入记录", records.len());

    // === 2. 组装图片 URL 映射（协作方失败不阻断归一化） ===
    let mut lookup: HashMap<String, String> = match &args.lookup {
        Some(path) => load_lookup(path).with_context(|| format!("加载图片映射失败: {:?}", path))?,
        None => HashMap::new(),
    };

    if let Some(manifest_path) = &args.image_manifest {
        match resolve_manifest_uploads(manifest_path).await {
            Ok(uploaded) => {
                info!("图片清单上传完成，新增 {} 条映射", uploaded.len());
                lookup.extend(uploaded);
            }
            Err(e) => {
                warn!("图片清单上传失败，相关题目的媒体字段将留空: {:?}", e);
            }
        }
    }

    // === 3. 逐行挖掘（严格输入序，单线程） ===
    let mut ctx = MiningContext::new();
    for (index, raw) in records.iter().enumerate() {
        let rec = NormalizedRecord::from_raw(raw);
        process_row(index, &rec, &lookup, args.collection.as_deref(), &mut ctx);
    }

    info!(
        "挖掘完成 - Categories: {}, Collections: {}, Quizzes: {}, Scenarios: {}, Questions: {}, Options: {}, Hints: {}",
        ctx.categories.len(),
        ctx.collections.len(),
        ctx.quizzes.len(),
        ctx.scenarios.len(),
        ctx.questions.len(),
        ctx.options.len(),
        ctx.hints.len()
    );

    // === 4. 导出七表快照 ===
    let tables = ctx.into_tables();
    write_tables(&args.output, &tables)
        .with_context(|| format!("写出导出文件失败: {:?}", args.output))?;
    info!("导出完成: {:?}", args.output);

    Ok(())
}

/// 上传清单里的本地图片，返回 题干原文 -> URL 的新增映射
///
/// 单张失败只记诊断并跳过；登录失败整体放弃（由调用方降级）。
async fn resolve_manifest_uploads(
    manifest_path: &std::path::Path,
) -> Result<HashMap<String, String>> {
    let manifest = load_manifest(manifest_path)
        .with_context(|| format!("加载图片清单失败: {:?}", manifest_path))?;

    let client = UploadClient::login().await.context("题库后端登录失败")?;

    let mut uploaded = HashMap::new();
    for (question_text, local_path) in manifest {
        let bytes = match std::fs::read(&local_path) {
            Ok(b) => b,
            Err(e) => {
                warn!(
                    target: "row_diagnostics",
                    "图片文件读取失败，跳过: {} ({:?})", local_path, e
                );
                continue;
            }
        };

        let filename = std::path::Path::new(&local_path)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("upload.jpg");

        match client.upload_image(bytes, filename).await {
            Ok(url) => {
                info!("图片已上传: {} -> {}", local_path, url);
                uploaded.insert(question_text, url);
            }
            Err(e) => {
                warn!(
                    target: "row_diagnostics",
                    "图片上传失败，跳过: {} ({:?})", local_path, e
                );
            }
        }
    }

    Ok(uploaded)
}
