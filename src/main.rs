mod api;
mod app;
mod config;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

/// 命令行参数：输入/输出文件 + 可选的集合名覆盖与图片映射
#[derive(Parser, Debug)]
#[command(name = "universal_miner")]
#[command(about = "将 LLM 抽取的考题记录归一化为七张关系表并导出")]
#[command(version)]
pub struct Args {
    /// 输入记录文件（JSON 数组，列名 -> 原始值）
    #[arg(short, long)]
    pub input: PathBuf,

    /// 导出文件路径（七张表的 JSON 快照）
    #[arg(short, long)]
    pub output: PathBuf,

    /// Collection 名称覆盖（记录中缺失时使用，否则回落到配置默认值）
    #[arg(short, long)]
    pub collection: Option<String>,

    /// 图片 URL 映射文件（题干原文 -> 已上传的 URL）
    #[arg(long)]
    pub lookup: Option<PathBuf>,

    /// 待上传图片清单（题干原文 -> 本地图片路径），上传成功后并入 lookup
    #[arg(long)]
    pub image_manifest: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = app::logger::init("logs", "universal_miner");

    let args = Args::parse();

    if let Err(e) = app::workflow::pipeline::run(&args).await {
        tracing::error!("Pipeline 执行失败: {:?}", e);
        return Err(e);
    }
    info!("========== 挖掘导出完成 ==========");

    Ok(())
}
