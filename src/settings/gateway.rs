use serde::{Deserialize, Serialize};

/// 이름으로 참조되는 백엔드 서버
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetServer {
    /// 라우트에서 참조하는 고유 이름
    pub name: String,
    /// 요청 경로가 덧붙여질 기본 URL (예: "http://calc-server:8080")
    pub url: String,
}

impl TargetServer {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// 경로와 대상 서버 이름의 쌍
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// 정확히 일치해야 하는 요청 경로
    pub path: String,

    /// 허용 메서드 목록. 매칭에는 사용하지 않습니다.
    #[serde(default)]
    pub methods: Vec<String>,

    /// 대상 서버 이름
    pub server: String,
}

impl Route {
    pub fn new(path: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            methods: Vec::new(),
            server: server.into(),
        }
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }
}
