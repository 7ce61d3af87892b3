use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// 服务配置，全部来自环境变量（配合 dotenvy 读取 .env）
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// 上游 AI 服务地址，例如 http://localhost:8000
    pub upstream_url: String,
    /// 上游请求总超时（流式生成耗时较长，默认 5 分钟）
    pub upstream_timeout: Duration,
    /// 前端静态文件目录
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            upstream_url: env::var("UPSTREAM_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            upstream_timeout: Duration::from_secs(
                env::var("UPSTREAM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()?,
            ),
            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "static".to_string())
                .into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_env_unset() {
        // 仅本测试触碰这些变量
        for key in [
            "HOST",
            "PORT",
            "UPSTREAM_API_URL",
            "UPSTREAM_TIMEOUT_SECS",
            "STATIC_DIR",
        ] {
            env::remove_var(key);
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.upstream_url, "http://localhost:8000");
        assert_eq!(config.upstream_timeout, Duration::from_secs(300));
        assert_eq!(config.static_dir, PathBuf::from("static"));
    }
}
