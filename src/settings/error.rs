use std::fmt;

#[derive(Debug)]
pub enum SettingsError {
    FileError {
        path: String,
        error: std::io::Error,
    },
    ParseError {
        source: toml::de::Error,
    },
    JsonParseError {
        source: serde_json::Error,
    },
    SchemaCompileError {
        reason: String,
    },
    ValidationErrors {
        file: String,
        errors: Vec<String>,
    },
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileError { path, error } =>
                write!(f, "설정 파일 {} 오류: {}", path, error),
            Self::ParseError { source } =>
                write!(f, "설정 파싱 오류: {}", source),
            Self::JsonParseError { source } =>
                write!(f, "JSON 설정 파싱 오류: {}", source),
            Self::SchemaCompileError { reason } =>
                write!(f, "설정 스키마 오류: {}", reason),
            Self::ValidationErrors { file, errors } =>
                write!(f, "설정 파일 {} 검증 실패: {}", file, errors.join("; ")),
            Self::InvalidValue { field, value, reason } =>
                write!(f, "설정 값 {} = {} 오류: {}", field, value, reason),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ParseError { source } => Some(source),
            Self::JsonParseError { source } => Some(source),
            Self::FileError { error, .. } => Some(error),
            _ => None,
        }
    }
}
