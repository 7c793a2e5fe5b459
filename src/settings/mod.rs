use std::{env, path::Path};
use serde::Deserialize;
use tracing::{debug, info};

mod server;
pub mod logging;
mod gateway;
mod error;
pub mod validator;

pub use server::{ServerSettings, ForwardingSettings};
pub use logging::{LogSettings, LogFormat, LogOutput};
pub use gateway::{Route, TargetServer};
pub use error::SettingsError;
pub use validator::JsonConfigValidator;

pub type Result<T> = std::result::Result<T, SettingsError>;

/// 설정 파일 위치를 지정하는 환경 변수
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// `CONFIG_PATH`가 없을 때 사용하는 기본 설정 파일 경로
pub const DEFAULT_CONFIG_PATH: &str = "/app/config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    // 리스너 설정
    #[serde(default)]
    pub server: ServerSettings,

    // 백엔드 전달 설정
    #[serde(default)]
    pub forwarding: ForwardingSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    /// 백엔드 서버 목록
    #[serde(default)]
    pub target_servers: Vec<TargetServer>,

    /// 라우트 목록
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl Settings {
    /// `CONFIG_PATH` 환경 변수가 가리키는 설정 파일을 읽습니다.
    /// 변수가 없으면 기본 경로를 사용합니다.
    pub async fn load() -> Result<Self> {
        let config_path = match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => path,
            _ => {
                info!(
                    default = DEFAULT_CONFIG_PATH,
                    "CONFIG_PATH가 설정되지 않아 기본 경로 사용"
                );
                DEFAULT_CONFIG_PATH.to_string()
            }
        };
        Self::from_file(&config_path).await
    }

    /// 확장자가 `.json`이면 JSON으로, 그 외에는 TOML로 읽습니다.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let path_str = path_ref.to_string_lossy().to_string();
        debug!(path = %path_str, "설정 파일 로드");

        let content = tokio::fs::read_to_string(path_ref).await.map_err(|e| SettingsError::FileError {
            path: path_str.clone(),
            error: e,
        })?;

        let is_json = path_ref.extension().map_or(false, |ext| ext == "json");
        let settings = if is_json {
            Self::parse_json(&content, &path_str)?
        } else {
            Self::from_toml_str(&content)?
        };

        info!(
            path = %path_str,
            target_servers = settings.target_servers.len(),
            routes = settings.routes.len(),
            "설정 파일 로드 완료"
        );
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| SettingsError::ParseError { source: e })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::parse_json(content, "<inline>")
    }

    fn parse_json(content: &str, file: &str) -> Result<Self> {
        let validator = JsonConfigValidator::new()?;
        let value = validator
            .validate(content)
            .map_err(|errors| validator::into_settings_error(file, errors))?;

        let settings: Self = serde_json::from_value(value)
            .map_err(|e| SettingsError::JsonParseError { source: e })?;
        settings.validate()?;
        Ok(settings)
    }

    /// 설정 유효성 검증.
    /// 라우트와 대상 서버의 참조 관계는 라우팅 테이블 생성 시점에 검사합니다.
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.forwarding.validate()?;
        Ok(())
    }
}
