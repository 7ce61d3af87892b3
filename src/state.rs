use std::sync::Arc;

use crate::core::UpstreamClient;
use crate::infra::config::Config;

/// 请求间共享的应用状态：配置 + 上游客户端。
/// 中继本身无会话状态，所有请求彼此独立。
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let upstream = UpstreamClient::new(&config.upstream_url, config.upstream_timeout)?;
        Ok(Arc::new(Self { config, upstream }))
    }
}
