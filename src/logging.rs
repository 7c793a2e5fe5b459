use std::path::Path;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, error, info, span, warn, Level};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::{time::UtcTime, writer::BoxMakeWriter};
use tracing_subscriber::EnvFilter;

use crate::settings::{LogFormat, LogOutput, LogSettings};

/// 로그 설정에 따라 전역 subscriber를 설치합니다.
///
/// `RUST_LOG`가 있으면 설정 파일의 레벨보다 우선합니다.
/// 파일 출력일 때 반환되는 guard는 프로세스가 끝날 때까지 유지해야 합니다.
pub fn init_logging(
    settings: &LogSettings,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let (writer, guard, ansi) = match &settings.output {
        LogOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), None, true),
        LogOutput::File(path) => {
            let path = Path::new(path);
            let file_name = path
                .file_name()
                .ok_or_else(|| format!("로그 파일 이름이 없음: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard), false)
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(settings.level).into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::new(Rfc3339))
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);

    match settings.format {
        LogFormat::Json => builder.json().try_init()?,
        LogFormat::Text => builder
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .try_init()?,
    }

    Ok(guard)
}

/// 요청 하나의 처리 결과를 모아 마지막에 한 번 기록하는 구조체
#[derive(Debug)]
pub struct RequestLog {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub duration_ms: u64,
    pub target_url: Option<String>,
    pub error: Option<String>,
}

impl RequestLog {
    pub fn new(request_id: String) -> Self {
        debug!(request_id = %request_id, "Creating new request log");
        Self {
            request_id,
            method: String::new(),
            path: String::new(),
            status_code: 0,
            duration_ms: 0,
            target_url: None,
            error: None,
        }
    }

    pub fn with_request<B>(&mut self, req: &hyper::Request<B>) {
        self.method = req.method().to_string();
        self.path = req.uri().path().to_string();

        debug!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            "Received request"
        );
    }

    pub fn with_target(&mut self, target_url: &str) {
        self.target_url = Some(target_url.to_string());
    }

    pub fn with_response(&mut self, status: hyper::StatusCode) {
        self.status_code = status.as_u16();
    }

    pub fn with_error(&mut self, error: impl std::fmt::Display) {
        self.error = Some(error.to_string());
    }
}

pub fn log_request(log: &RequestLog) {
    let level = if log.error.is_some() && log.status_code >= 500 {
        Level::ERROR
    } else if log.status_code >= 400 {
        Level::WARN
    } else {
        Level::INFO
    };

    let span = span!(
        Level::INFO,
        "request",
        request_id = %log.request_id,
        method = %log.method,
        path = %log.path,
        status = %log.status_code,
        duration_ms = %log.duration_ms
    );
    let _enter = span.enter();

    match level {
        Level::ERROR => error!(
            target_url = ?log.target_url,
            error = ?log.error,
            "Request failed"
        ),
        Level::WARN => warn!(
            target_url = ?log.target_url,
            error = ?log.error,
            "Request completed with warning"
        ),
        _ => info!(
            target_url = ?log.target_url,
            "Request completed successfully"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::{Method, Request, StatusCode};

    #[test]
    fn test_request_log_collects_fields() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("http://gateway.local/add?x=1")
            .body(())
            .unwrap();

        let mut log = RequestLog::new("req-1".to_string());
        log.with_request(&req);
        log.with_target("http://calc:8080/add?x=1");
        log.with_response(StatusCode::CREATED);

        assert_eq!(log.method, "POST");
        assert_eq!(log.path, "/add");
        assert_eq!(log.status_code, 201);
        assert_eq!(log.target_url.as_deref(), Some("http://calc:8080/add?x=1"));
        assert!(log.error.is_none());
    }
}
