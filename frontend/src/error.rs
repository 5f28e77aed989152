use std::fmt;

use crate::web::HttpError;

// =========================================================
// 错误类别枚举
// =========================================================

/// 错误类别
///
/// 远端调用失败分为网络 / 状态码 / 响应格式三类，本地另有校验与存储两类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 网络或传输层失败（服务不可达、请求构建失败）
    Network,
    /// 401 / 403：服务端拒绝了凭据
    Unauthorized,
    /// 其他非 2xx 响应
    Status,
    /// 响应体格式与预期不符
    Decode,
    /// 本地表单校验失败，未发出任何请求
    Validation,
    /// 本地存储不可用或写入被拒绝
    Storage,
}

impl ErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Status => "HTTP_STATUS",
            ErrorKind::Decode => "DECODE_ERROR",
            ErrorKind::Validation => "INVALID_INPUT",
            ErrorKind::Storage => "STORAGE_ERROR",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "api.fetch", "cart.add"
    pub operation: String,
    /// 额外的细节信息，如 endpoint、用户名等
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 应用错误
///
/// - kind: 错误类别
/// - message: 错误消息（仅用于日志，不直接展示给用户）
/// - status: 远端 HTTP 状态码（若有）
/// - spans: 结构化的调用追踪栈
#[derive(Debug, Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    spans: Vec<ErrorSpan>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// 非 2xx 响应：401/403 归为 Unauthorized，其余为 Status
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 | 403 => ErrorKind::Unauthorized,
            _ => ErrorKind::Status,
        };
        let mut snippet: String = body.chars().take(200).collect();
        if snippet.is_empty() {
            snippet.push_str("<empty body>");
        }
        Self {
            status: Some(status),
            ..Self::new(kind, format!("HTTP {}: {}", status, snippet))
        }
    }

    // --- Context builders ---

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    // --- Accessors ---

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }

    /// 展示给用户的提示
    ///
    /// 远端失败统一折叠为静态文案，不区分"服务不可用"与"凭据错误"；
    /// 本地校验失败直接展示校验消息。
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::Validation => self.message.clone(),
            ErrorKind::Storage => "Could not save to browser storage.".to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = std::result::Result<T, AppError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<HttpError> for AppError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::ResponseParseFailed(_) => AppError::decode(e.to_string()),
            HttpError::RequestBuildFailed(_) | HttpError::NetworkError(_) => {
                AppError::network(e.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(AppError::from_status(401, "").is_unauthorized());
        assert!(AppError::from_status(403, "nope").is_unauthorized());
        let e = AppError::from_status(500, "boom");
        assert_eq!(e.kind(), ErrorKind::Status);
        assert_eq!(e.status_code(), Some(500));
    }

    #[test]
    fn display_includes_trace() {
        let e = AppError::network("refused")
            .in_op_with("api.fetch", "/courses/")
            .in_op("dashboard.load");
        assert_eq!(
            e.to_string(),
            "[NETWORK_ERROR] refused | trace: api.fetch(/courses/) -> dashboard.load"
        );
    }

    #[test]
    fn remote_failures_collapse_to_generic_message() {
        let generic = "Something went wrong. Please try again.";
        assert_eq!(AppError::network("x").user_message(), generic);
        assert_eq!(AppError::from_status(401, "").user_message(), generic);
        assert_eq!(AppError::decode("x").user_message(), generic);
        assert_eq!(
            AppError::validation("Passwords do not match").user_message(),
            "Passwords do not match"
        );
    }
}
