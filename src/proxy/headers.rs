use hyper::header::{self, HeaderMap, HeaderName};

/// RFC 7230 6.1 의 hop-by-hop 헤더
static HOP_BY_HOP_HEADERS: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// hop-by-hop 헤더와 `Connection` 헤더에 나열된 헤더를 제거합니다.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP_HEADERS.iter()) {
        headers.remove(name);
    }
}

/// 전달 요청 헤더 정리. hop-by-hop 헤더와 함께 `Host`도 제거해
/// HTTP 클라이언트가 대상 서버 주소로 다시 채우게 합니다.
pub fn prepare_outbound(headers: &mut HeaderMap) {
    strip_hop_by_hop(headers);
    headers.remove(header::HOST);
}
