pub mod stream;
pub mod transcript;

pub use stream::{parse_line, LineScanner, StreamMessage};
pub use transcript::Transcript;

use anyhow::Context;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::models::{ChatRequest, ChatResponse};

/// 聊天视图的 HTTP 驱动：POST /api/chat 并把响应翻译成 StreamMessage。
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: impl AsRef<str>) -> anyhow::Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    /// 非流式路径：等完整 JSON 响应
    pub async fn send_blocking(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse> {
        let response = self
            .http
            .post(self.chat_url())
            .json(request)
            .send()
            .await
            .context("请求中继服务失败")?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("中继返回 {status}: {body}");
        }
        response.json().await.context("解析聊天响应失败")
    }

    /// 流式路径：后台任务逐块读响应体、按行解析，事件推给返回的接收端。
    /// 取消令牌触发后立即停止读取，通道关闭即视为会话结束。
    pub fn stream(
        &self,
        request: ChatRequest,
        cancel_token: CancellationToken,
    ) -> mpsc::UnboundedReceiver<StreamMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        let http = self.http.clone();
        let url = self.chat_url();

        tokio::spawn(async move {
            tokio::select! {
                _ = run_stream(http, url, request, tx.clone()) => {}
                _ = cancel_token.cancelled() => {}
            }
        });

        rx
    }
}

async fn run_stream(
    http: reqwest::Client,
    url: String,
    request: ChatRequest,
    tx: mpsc::UnboundedSender<StreamMessage>,
) {
    let response = match http.post(url).json(&request).send().await {
        Ok(response) => response,
        Err(e) => {
            let _ = tx.send(StreamMessage::Error(e.to_string()));
            let _ = tx.send(StreamMessage::End);
            return;
        }
    };

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let _ = tx.send(StreamMessage::Error(format!("{status}: {body}")));
        let _ = tx.send(StreamMessage::End);
        return;
    }

    let mut bytes = response.bytes_stream();
    let mut scanner = LineScanner::new();
    while let Some(chunk) = bytes.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                let _ = tx.send(StreamMessage::Error(e.to_string()));
                let _ = tx.send(StreamMessage::End);
                return;
            }
        };
        for line in scanner.push(&chunk) {
            if let Some(event) = parse_line(&line) {
                let is_end = matches!(event, StreamMessage::End);
                let is_error = matches!(event, StreamMessage::Error(_));
                let _ = tx.send(event);
                if is_error {
                    let _ = tx.send(StreamMessage::End);
                }
                if is_end || is_error {
                    return;
                }
            }
        }
    }

    // 上游自然断流也算结束
    let _ = tx.send(StreamMessage::End);
}
