use std::time::Duration;

use crate::models::ChatRequest;

/// 上游 AI 服务的 HTTP 客户端封装。
/// 单个共享 reqwest::Client，超时覆盖整个请求（含流式读取）。
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        })
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    /// 把 ChatRequest 原样 POST 给上游 /api/chat，不做任何改写。
    /// 连接失败由调用方决定如何上报，这里不重试。
    pub async fn post_chat(&self, request: &ChatRequest) -> Result<reqwest::Response, reqwest::Error> {
        self.http.post(self.chat_url()).json(request).send().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_normalizes_trailing_slash() {
        let client = UpstreamClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.chat_url(), "http://localhost:8000/api/chat");
    }
}
