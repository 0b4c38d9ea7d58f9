//! 内容派生键生成
//!
//! 同一内容在任何一次运行中都得到同一个键，保证重复导入幂等；
//! 空内容没有去重意义，退化为随机键。

use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

/// 内容摘要保留的十六进制位数
const DIGEST_LEN: usize = 4;
/// 清洗后内容前缀保留的字符数
const SEED_PREFIX_LEN: usize = 15;

/// 生成短键：`PREFIX_清洗后前缀_摘要`，整体大写
///
/// seed 为空时返回 `PREFIX_随机8位`（无内容可去重，刻意不确定）。
/// 不同 seed 理论上可能撞键，概率可接受，不做额外防护。
pub fn make_key(prefix: &str, seed: &str) -> String {
    let seed = seed.trim();
    if seed.is_empty() {
        return format!("{}_{}", prefix, random_token(8)).to_uppercase();
    }

    let clean: String = seed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(SEED_PREFIX_LEN)
        .collect();

    let digest = Sha256::digest(seed.as_bytes());
    let digest_hex = format!("{:x}", digest);

    format!("{}_{}_{}", prefix, clean, &digest_hex[..DIGEST_LEN]).to_uppercase()
}

/// 内容哈希（Scenario 去重用的完整摘要）
pub fn content_hash(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
