use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use futures_util::TryStreamExt;
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::io::StreamReader;

use crate::infra::error::ApiError;
use crate::models::{ChatRequest, ChatResponse};
use crate::state::AppState;

/// POST /api/chat —— 把请求原样转发给上游 AI 服务，流式或整体中继响应。
pub async fn relay_chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::InvalidRequest("Message is required"));
    }

    tracing::info!("转发聊天请求到上游: {}", payload.message);

    let upstream_response = state
        .upstream
        .post_chat(&payload)
        .await
        .map_err(ApiError::UpstreamUnavailable)?;

    let status = upstream_response.status();
    if !status.is_success() {
        // 上游错误状态与响应体原样透传，不做解释
        let body = upstream_response
            .bytes()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        tracing::error!("上游返回错误状态: {}", status);
        return Ok((status, body).into_response());
    }

    if payload.stream {
        Ok(stream_response(upstream_response))
    } else {
        let chat_response: ChatResponse = upstream_response
            .json()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        Ok(Json(chat_response).into_response())
    }
}

/// 按行中继上游响应体：读到完整一行立即下发，空行丢弃，
/// 半行留在解码器缓冲区等待下一次读取。客户端断开时
/// 响应体流被 drop，上游连接随之释放。
fn stream_response(upstream_response: reqwest::Response) -> Response {
    let reader = StreamReader::new(
        upstream_response
            .bytes_stream()
            .map_err(std::io::Error::other),
    );
    let lines = FramedRead::new(reader, LinesCodec::new());
    let body = Body::from_stream(lines.try_filter_map(|line| async move {
        if line.is_empty() {
            Ok(None)
        } else {
            Ok(Some(format!("{line}\n")))
        }
    }));

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        body,
    )
        .into_response()
}
