//! HTTP 安全响应头

use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// 为所有响应注入 HTTP 安全头
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    // 依赖 CSP，显式关闭旧的 XSS 过滤
    headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("0"));
    // 管理端和查询接口返回客户数据，不允许缓存
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
