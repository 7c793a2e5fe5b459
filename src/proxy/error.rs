use std::fmt;
use std::time::Duration;
use hyper::StatusCode;
use hyper_util::client::legacy;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 요청 하나를 전달하는 동안 발생하는 에러입니다.
/// 모든 변형은 해당 요청 안에서만 처리되며 500 응답으로 변환됩니다.
#[derive(Debug)]
pub enum ProxyError {
    /// 클라이언트 요청 본문을 끝까지 읽지 못함
    BodyRead {
        source: BoxError,
    },
    /// 전달할 URI를 만들 수 없음
    InvalidTargetUri {
        uri: String,
        reason: String,
    },
    /// 전달 요청 생성 실패
    RequestBuild {
        source: hyper::http::Error,
    },
    /// 제한 시간 안에 백엔드 응답을 받지 못함
    UpstreamTimeout {
        target: String,
        timeout: Duration,
    },
    /// 백엔드에 연결할 수 없음
    UpstreamUnreachable {
        target: String,
        source: legacy::Error,
    },
    /// 연결 이후의 전송 실패
    UpstreamTransport {
        target: String,
        source: legacy::Error,
    },
}

impl ProxyError {
    pub(crate) fn upstream(target: String, source: legacy::Error) -> Self {
        if source.is_connect() {
            ProxyError::UpstreamUnreachable { target, source }
        } else {
            ProxyError::UpstreamTransport { target, source }
        }
    }

    /// 클라이언트에게 돌려줄 상태 코드
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// 원인 에러까지 이어 붙인 설명. 에러 응답 본문으로 사용합니다.
    pub fn description(&self) -> String {
        match self {
            ProxyError::BodyRead { source } => error_chain(source.as_ref()),
            ProxyError::RequestBuild { source } => error_chain(source),
            ProxyError::UpstreamUnreachable { source, .. }
            | ProxyError::UpstreamTransport { source, .. } => error_chain(source),
            ProxyError::InvalidTargetUri { .. } | ProxyError::UpstreamTimeout { .. } => self.to_string(),
        }
    }
}

fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::BodyRead { source } =>
                write!(f, "요청 본문 읽기 실패: {}", source),
            ProxyError::InvalidTargetUri { uri, reason } =>
                write!(f, "잘못된 전달 URI {}: {}", uri, reason),
            ProxyError::RequestBuild { source } =>
                write!(f, "전달 요청 생성 실패: {}", source),
            ProxyError::UpstreamTimeout { target, timeout } =>
                write!(f, "백엔드 {} 응답 시간 초과 ({}ms)", target, timeout.as_millis()),
            ProxyError::UpstreamUnreachable { target, source } =>
                write!(f, "백엔드 {}에 연결할 수 없음: {}", target, error_chain(source)),
            ProxyError::UpstreamTransport { target, source } =>
                write!(f, "백엔드 {} 요청 실패: {}", target, error_chain(source)),
        }
    }
}

impl std::error::Error for ProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProxyError::BodyRead { source } => Some(source.as_ref()),
            ProxyError::RequestBuild { source } => Some(source),
            ProxyError::UpstreamUnreachable { source, .. }
            | ProxyError::UpstreamTransport { source, .. } => Some(source),
            _ => None,
        }
    }
}
