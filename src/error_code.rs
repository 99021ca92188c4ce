//! Error classes for DashScope error responses.
//!
//! DashScope reports failures as an HTTP status plus a `code` string in the body
//! (`InvalidApiKey`, `Throttling.RateQuota`, `InternalError.Algo`, ...). This module
//! folds both into a small set of classes with retry semantics, which the default
//! error handler attaches to [`crate::Error::Remote`].
//!
//! | Class               | Retryable | Typical source                          |
//! |---------------------|-----------|-----------------------------------------|
//! | `invalid_request`   | no        | 400, `InvalidParameter`, `BadRequest.*` |
//! | `content_filtered`  | no        | `DataInspectionFailed`                  |
//! | `authentication`    | no        | 401, `InvalidApiKey`                    |
//! | `permission_denied` | no        | 403, `AccessDenied.*`                   |
//! | `not_found`         | no        | 404, `ModelNotFound`                    |
//! | `quota_exhausted`   | no        | `Arrearage`, `Throttling.AllocationQuota` |
//! | `rate_limited`      | yes       | 429, `Throttling`, `Throttling.RateQuota` |
//! | `server_error`      | yes       | 500, `InternalError.*`, `SystemError`   |
//! | `overloaded`        | yes       | 503, `ServiceUnavailable`               |
//! | `timeout`           | yes       | 408, 504, `RequestTimeOut`              |
//!
//! ## Example
//!
//! ```rust
//! use dashscope_image::error_code::ErrorClass;
//!
//! let class = ErrorClass::classify(429, Some("Throttling.RateQuota"));
//! assert_eq!(class.name(), "rate_limited");
//! assert!(class.retryable());
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Malformed request, invalid parameters, or missing required fields
    InvalidRequest,
    /// Input or output rejected by content inspection
    ContentFiltered,
    /// Invalid, expired, or missing API key
    Authentication,
    /// Valid credentials but the account or workspace lacks access
    PermissionDenied,
    /// Model, task, or endpoint does not exist
    NotFound,
    /// Account balance or allocation quota exhausted
    QuotaExhausted,
    /// Request rate limit exceeded
    RateLimited,
    /// Internal error on the service side
    ServerError,
    /// Service temporarily unavailable
    Overloaded,
    /// Request timed out before a response was produced
    Timeout,
    /// Could not be classified
    Unknown,
}

impl ErrorClass {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::ContentFiltered => "content_filtered",
            Self::Authentication => "authentication",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::QuotaExhausted => "quota_exhausted",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Overloaded => "overloaded",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the same request may succeed when repeated later.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError | Self::Overloaded | Self::Timeout
        )
    }

    /// Maps a DashScope `code` to a class.
    ///
    /// Codes are dotted (`Throttling.RateQuota`); the full code is checked first,
    /// then its leading segment.
    pub fn from_service_code(code: &str) -> Option<Self> {
        let class = match code {
            "Throttling.AllocationQuota" | "Arrearage" | "Throttling.FreeTierQuotaExhausted" => {
                Self::QuotaExhausted
            }
            "DataInspectionFailed" | "InvalidParameter.DataInspection" => Self::ContentFiltered,
            "ModelNotFound" | "Model.NotFound" | "NotFound" => Self::NotFound,
            "InvalidApiKey" | "InvalidApiKeyError" => Self::Authentication,
            "RequestTimeOut" | "RequestTimeout" => Self::Timeout,
            "ServiceUnavailable" => Self::Overloaded,
            "SystemError" => Self::ServerError,
            _ => {
                let head = code.split('.').next().unwrap_or(code);
                match head {
                    "InvalidParameter" | "BadRequest" | "InvalidURL" | "InvalidFile" => {
                        Self::InvalidRequest
                    }
                    "AccessDenied" | "Model" => Self::PermissionDenied,
                    "Throttling" => Self::RateLimited,
                    "InternalError" => Self::ServerError,
                    _ => return None,
                }
            }
        };
        Some(class)
    }

    /// Maps an HTTP status code to the most likely class.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidRequest,
            401 => Self::Authentication,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            429 => Self::RateLimited,
            503 => Self::Overloaded,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Service code wins over status when it is recognized.
    pub fn classify(status: u16, code: Option<&str>) -> Self {
        code.and_then(Self::from_service_code)
            .unwrap_or_else(|| Self::from_http_status(status))
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
