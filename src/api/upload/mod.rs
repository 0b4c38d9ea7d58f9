//! 题库后端的图片上传客户端（协作方）
//!
//! 登录换取 Bearer Token，再走 multipart 上传，返回可直接落表的 URL。
//! 不做重试/退避，失败直接上抛，由流水线降级处理。

use anyhow::{anyhow, Context, Result};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, info};

use crate::config;

pub struct UploadClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl UploadClient {
    /// 用配置里的账号登录后端，换取访问令牌
    pub async fn login() -> Result<Self> {
        let cfg = config::get();
        let email = cfg
            .backend_email
            .as_deref()
            .context("缺少后端账号配置 backend_email")?;
        let password = cfg
            .backend_password
            .as_deref()
            .context("缺少后端密码配置 backend_password")?;

        let http = reqwest::Client::new();
        let url = format!("{}/api/v1/auth/login", cfg.backend_base_url);
        info!("登录题库后端: {}", url);

        let resp = http
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .context("登录请求发送失败")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("登录失败，状态码: {}", status));
        }

        let body: Value = resp.json().await.context("登录响应解析失败")?;
        let token = body
            .pointer("/data/accessToken")
            .and_then(|v| v.as_str())
            .context("登录响应缺少 accessToken")?
            .to_string();

        Ok(Self {
            http,
            base_url: cfg.backend_base_url.clone(),
            token,
        })
    }

    /// 上传单张图片，返回最终 URL
    ///
    /// 响应里的 URL 位置有三种历史形态（data.files[0].url / url / secure_url），
    /// 按序探测。
    pub async fn upload_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String> {
        let filename = if filename.contains('.') {
            filename.to_string()
        } else {
            format!("{}.jpg", filename)
        };

        let part = Part::bytes(bytes)
            .file_name(filename.clone())
            .mime_str("image/jpeg")
            .context("构建 multipart 失败")?;
        let form = Form::new().part("file", part);

        let url = format!("{}/api/v1/upload", self.base_url);
        debug!("上传图片: {} -> {}", filename, url);

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await
            .context("上传请求发送失败")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("上传失败，状态码: {}", status));
        }

        let body: Value = resp.json().await.context("上传响应解析失败")?;
        extract_upload_url(&body).ok_or_else(|| anyhow!("上传响应中找不到 URL: {}", body))
    }
}

fn extract_upload_url(body: &Value) -> Option<String> {
    for pointer in ["/data/files/0/url", "/url", "/secure_url"] {
        if let Some(url) = body.pointer(pointer).and_then(|v| v.as_str()) {
            return Some(url.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::logger;
    use serde_json::json;

    #[test]
    fn test_extract_upload_url_variants() {
        let body = json!({"data": {"files": [{"url": "https://cdn/x.jpg"}]}});
        assert_eq!(extract_upload_url(&body).as_deref(), Some("https://cdn/x.jpg"));

        let body = json!({"url": "https://cdn/y.jpg"});
        assert_eq!(extract_upload_url(&body).as_deref(), Some("https://cdn/y.jpg"));

        let body = json!({"secure_url": "https://cdn/z.jpg"});
        assert_eq!(extract_upload_url(&body).as_deref(), Some("https://cdn/z.jpg"));

        let body = json!({"data": {}});
        assert!(extract_upload_url(&body).is_none());
    }

    #[tokio::test]
    #[ignore] // 需要真实账号配置才能运行
    async fn test_login_and_upload() {
        logger::init_test();

        let client = UploadClient::login().await.expect("登录失败");
        let url = client
            .upload_image(vec![0xFF, 0xD8, 0xFF, 0xE0], "probe")
            .await
            .expect("上传失败");
        println!("上传成功: {}", url);
    }
}
