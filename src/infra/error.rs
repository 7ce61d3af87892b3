use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// 中继接口的错误分类：校验失败 / 上游不可达 / 其它内部错误。
/// 上游返回的非 2xx 状态不算错误，由 handler 原样转发。
#[derive(Debug)]
pub enum ApiError {
    InvalidRequest(&'static str),
    UpstreamUnavailable(reqwest::Error),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UpstreamUnavailable(e) => {
                tracing::error!("上游 AI 服务连接失败: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "Failed to connect to AI service")
            }
            ApiError::Internal(e) => {
                // 具体原因只进日志，不暴露给客户端
                tracing::error!("处理聊天请求出错: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_maps_to_400() {
        let resp = ApiError::InvalidRequest("Message is required").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_maps_to_500() {
        let resp = ApiError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
