use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use tracing::debug;

use super::error::SettingsError;
use super::Result;

/// JSON 설정 검증을 위한 구조체
pub struct JsonConfigValidator {
    schema: JSONSchema,
}

/// 검증 오류 타입
#[derive(Debug, PartialEq)]
pub enum ValidationError {
    ParseError(String),
    SchemaError { path: String, message: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::ParseError(msg) => write!(f, "파싱 오류: {}", msg),
            ValidationError::SchemaError { path, message } =>
                write!(f, "스키마 오류 (경로: {}): {}", path, message),
        }
    }
}

const SCHEMA: &str = r#"{
    "$schema": "http://json-schema.org/draft-07/schema#",
    "type": "object",
    "properties": {
        "server": {
            "type": "object",
            "properties": {
                "port": {"type": "integer", "minimum": 1, "maximum": 65535}
            }
        },
        "forwarding": {
            "type": "object",
            "properties": {
                "timeout_ms": {"type": "integer", "minimum": 1},
                "strip_hop_by_hop_headers": {"type": "boolean"}
            }
        },
        "logging": {
            "type": "object",
            "properties": {
                "format": {"type": "string", "enum": ["text", "json"]},
                "level": {"type": "string"},
                "output": {"type": "string", "minLength": 1}
            }
        },
        "target_servers": {
            "type": "array",
            "items": {
                "type": "object",
                "required": ["name", "url"],
                "properties": {
                    "name": {"type": "string", "minLength": 1},
                    "url": {"type": "string", "minLength": 1}
                }
            }
        },
        "routes": {
            "type": "array",
            "items": {
                "type": "object",
                "required": ["path", "server"],
                "properties": {
                    "path": {"type": "string", "minLength": 1},
                    "server": {"type": "string", "minLength": 1},
                    "methods": {
                        "type": "array",
                        "items": {"type": "string"}
                    }
                }
            }
        }
    }
}"#;

impl JsonConfigValidator {
    /// 내장 스키마로 validator 생성
    pub fn new() -> Result<Self> {
        let schema_value: Value = serde_json::from_str(SCHEMA)
            .map_err(|e| SettingsError::SchemaCompileError {
                reason: format!("스키마 파싱 오류: {}", e),
            })?;

        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema_value)
            .map_err(|e| SettingsError::SchemaCompileError {
                reason: format!("스키마 컴파일 오류: {}", e),
            })?;

        debug!("JSON 스키마 컴파일 성공");
        Ok(Self { schema })
    }

    /// JSON 문자열을 파싱하고 스키마에 맞는지 검사합니다.
    pub fn validate(&self, json_str: &str) -> std::result::Result<Value, Vec<ValidationError>> {
        let value = serde_json::from_str::<Value>(json_str)
            .map_err(|e| vec![ValidationError::ParseError(e.to_string())])?;

        if let Err(errors) = self.schema.validate(&value) {
            return Err(errors
                .map(|error| ValidationError::SchemaError {
                    path: error.instance_path.to_string(),
                    message: error.to_string(),
                })
                .collect());
        }

        Ok(value)
    }
}

pub(crate) fn into_settings_error(file: &str, errors: Vec<ValidationError>) -> SettingsError {
    SettingsError::ValidationErrors {
        file: file.to_string(),
        errors: errors.iter().map(ToString::to_string).collect(),
    }
}
