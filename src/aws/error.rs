//! Erros ao conversar com Step Functions ou Glue.
//!
//! Toda falha é repassada ao chamador como está. Nada aqui faz retentativa.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Códigos de erro usados quando o chamador excede sua taxa de requisições.
const THROTTLING_CODES: &[&str] = &[
    "ThrottlingException",
    "TooManyRequestsException",
    "RequestLimitExceeded",
    "Throttling",
];

#[derive(Debug, Error)]
pub enum ProviderError {
    /// O serviço respondeu com um documento de erro.
    #[error("{service} error {code} (status {status}): {message}")]
    Api {
        service: &'static str,
        code: String,
        message: String,
        status: u16,
    },

    /// O serviço recusou a chamada pela taxa de requisições.
    #[error("{service} throttled the request: {message}")]
    Throttled {
        service: &'static str,
        message: String,
    },

    #[error("no AWS region configured; set AWS_REGION or `region` in gluedash.toml")]
    MissingRegion,

    #[error("failed to load AWS credentials: {0}")]
    Credentials(String),

    #[error("failed to sign request: {0}")]
    Signing(String),

    /// Falhas de transporte (DNS, conexão, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to decode {service} response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Documento de erro dos protocolos JSON da AWS.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

impl ProviderError {
    /// Converte uma resposta sem sucesso em erro.
    pub(crate) fn from_response(service: &'static str, status: StatusCode, body: &[u8]) -> Self {
        let parsed: Option<ErrorBody> = serde_json::from_slice(body).ok();
        let code = parsed
            .as_ref()
            .and_then(|b| b.error_type.as_deref())
            .map(short_error_code)
            .unwrap_or_else(|| status.to_string());
        let message = parsed
            .and_then(|b| b.message)
            .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

        if status == StatusCode::TOO_MANY_REQUESTS || THROTTLING_CODES.contains(&code.as_str()) {
            return ProviderError::Throttled { service, message };
        }

        ProviderError::Api {
            service,
            code,
            message,
            status: status.as_u16(),
        }
    }

    /// Indica se o erro é um recurso inexistente (ARN ou nome de job desconhecido).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ProviderError::Api { code, .. }
                if code == "EntityNotFoundException"
                    || code == "StateMachineDoesNotExist"
                    || code == "ResourceNotFoundException"
        )
    }
}

/// `com.amazonaws.glue#EntityNotFoundException` e
/// `EntityNotFoundException:http://internal.amazon.com/` viram
/// `EntityNotFoundException`.
fn short_error_code(raw: &str) -> String {
    let after_namespace = raw.rsplit('#').next().unwrap_or(raw);
    after_namespace
        .split(':')
        .next()
        .unwrap_or(after_namespace)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_namespaced_error_type() {
        let body = br#"{"__type":"com.amazonaws.glue#EntityNotFoundException","Message":"Job not found"}"#;
        let err = ProviderError::from_response("glue", StatusCode::BAD_REQUEST, body);
        match &err {
            ProviderError::Api {
                service,
                code,
                message,
                status,
            } => {
                assert_eq!(*service, "glue");
                assert_eq!(code, "EntityNotFoundException");
                assert_eq!(message, "Job not found");
                assert_eq!(*status, 400);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert!(err.is_not_found());
    }

    #[test]
    fn maps_throttling_by_code() {
        let body = br#"{"__type":"ThrottlingException","message":"Rate exceeded"}"#;
        let err = ProviderError::from_response("states", StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, ProviderError::Throttled { service: "states", .. }));
        assert_eq!(err.to_string(), "states throttled the request: Rate exceeded");
    }

    #[test]
    fn maps_throttling_by_status() {
        let err = ProviderError::from_response("glue", StatusCode::TOO_MANY_REQUESTS, b"slow down");
        assert!(matches!(err, ProviderError::Throttled { .. }));
    }

    #[test]
    fn non_json_body_keeps_status_and_text() {
        let err = ProviderError::from_response("glue", StatusCode::BAD_GATEWAY, b"upstream down");
        assert_eq!(
            err.to_string(),
            "glue error 502 Bad Gateway (status 502): upstream down"
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn short_error_code_strips_namespace_and_suffix() {
        assert_eq!(
            short_error_code("StateMachineDoesNotExist:http://internal.amazon.com/"),
            "StateMachineDoesNotExist"
        );
        assert_eq!(short_error_code("AccessDeniedException"), "AccessDeniedException");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProviderError>();
    }
}
