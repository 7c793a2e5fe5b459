use serde::Deserialize;
use super::SettingsError;

/// 게이트웨이 리스너 설정
#[derive(Clone, Debug, Deserialize)]
pub struct ServerSettings {
    /// HTTP 포트 (기본값: 8080)
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 { 8080 }

impl ServerSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.port == 0 {
            return Err(SettingsError::InvalidValue {
                field: "server.port".to_string(),
                value: self.port.to_string(),
                reason: "포트는 0이 될 수 없습니다".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

/// 백엔드 전달 설정
#[derive(Clone, Debug, Deserialize)]
pub struct ForwardingSettings {
    /// 백엔드 호출 한 번에 허용되는 최대 시간 (밀리초)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// hop-by-hop 헤더와 Host 헤더 제거 여부.
    /// 기본값은 false 이며, 이 경우 모든 헤더를 그대로 전달합니다.
    #[serde(default)]
    pub strip_hop_by_hop_headers: bool,
}

fn default_timeout_ms() -> u64 { 30_000 }

impl ForwardingSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.timeout_ms == 0 {
            return Err(SettingsError::InvalidValue {
                field: "forwarding.timeout_ms".to_string(),
                value: self.timeout_ms.to_string(),
                reason: "타임아웃은 0보다 커야 합니다".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ForwardingSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            strip_hop_by_hop_headers: false,
        }
    }
}
