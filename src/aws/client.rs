use std::time::Duration;

use aws_credential_types::provider::SharedCredentialsProvider;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ProviderError;
use super::signer::RequestSigner;

/// Como endereçar um serviço pelo protocolo JSON da AWS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSpec {
    /// Nome de assinatura SigV4, também prefixo do host do endpoint.
    pub signing_name: &'static str,
    /// Prefixo do header `X-Amz-Target`.
    pub target_prefix: &'static str,
    pub content_type: &'static str,
}

pub const STEP_FUNCTIONS: ServiceSpec = ServiceSpec {
    signing_name: "states",
    target_prefix: "AWSStepFunctions",
    content_type: "application/x-amz-json-1.0",
};

pub const GLUE: ServiceSpec = ServiceSpec {
    signing_name: "glue",
    target_prefix: "AWSGlue",
    content_type: "application/x-amz-json-1.1",
};

/// Timeouts HTTP compartilhados pelos clientes de serviço.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            request: Duration::from_secs(60),
        }
    }
}

/// Região e credenciais de todos os clientes de uma execução.
#[derive(Debug, Clone)]
pub struct AwsSettings {
    pub region: String,
    pub credentials: SharedCredentialsProvider,
}

impl AwsSettings {
    /// Resolve região e credenciais pela cadeia padrão de providers da AWS
    /// (ambiente, arquivos de profile, SSO, metadata da instância).
    pub async fn load(region_override: Option<&str>) -> Result<Self, ProviderError> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region_override {
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }
        let sdk_config = loader.load().await;

        let region = sdk_config
            .region()
            .map(|r| r.to_string())
            .ok_or(ProviderError::MissingRegion)?;
        let credentials = sdk_config
            .credentials_provider()
            .ok_or_else(|| ProviderError::Credentials("no credentials provider configured".into()))?
            .clone();

        Ok(Self {
            region,
            credentials,
        })
    }
}

/// Chamadas `POST /` assinadas com header `X-Amz-Target`, o formato de
/// wire comum a Step Functions e Glue.
pub struct JsonProtocolClient {
    http: Client,
    signer: RequestSigner,
    spec: ServiceSpec,
    endpoint: String,
}

impl JsonProtocolClient {
    /// Cria um cliente para o endpoint regional de `spec`.
    pub fn new(
        spec: ServiceSpec,
        settings: &AwsSettings,
        timeouts: Timeouts,
    ) -> Result<Self, ProviderError> {
        let endpoint = format!(
            "https://{}.{}.amazonaws.com",
            spec.signing_name, settings.region
        );
        Self::with_endpoint(spec, settings, timeouts, endpoint)
    }

    /// Cria um cliente apontando para um endpoint customizado (emuladores locais, testes).
    pub fn with_endpoint(
        spec: ServiceSpec,
        settings: &AwsSettings,
        timeouts: Timeouts,
        endpoint: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.request)
            .build()?;
        let signer = RequestSigner::new(
            settings.credentials.clone(),
            settings.region.clone(),
            spec.signing_name,
        );
        let endpoint = format!("{}/", endpoint.into().trim_end_matches('/'));
        Ok(Self {
            http,
            signer,
            spec,
            endpoint,
        })
    }

    /// Chama `operation` com `input` e decodifica o corpo da resposta.
    pub async fn call<I, O>(&self, operation: &str, input: &I) -> Result<O, ProviderError>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let service = self.spec.signing_name;
        let body = serde_json::to_vec(input)?;
        let target = format!("{}.{operation}", self.spec.target_prefix);

        tracing::debug!(service, operation, endpoint = %self.endpoint, "calling provider");

        let headers = self
            .signer
            .sign(
                "POST",
                &self.endpoint,
                &[
                    ("content-type", self.spec.content_type),
                    ("x-amz-target", target.as_str()),
                ],
                &body,
            )
            .await?;

        let mut request = self.http.post(&self.endpoint).body(body);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let err = ProviderError::from_response(service, status, &bytes);
            tracing::warn!(service, operation, error = %err, "provider call failed");
            return Err(err);
        }

        serde_json::from_slice(&bytes).map_err(|e| ProviderError::Decode {
            service,
            message: format!("{operation}: {e}"),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use aws_credential_types::Credentials;
    use aws_credential_types::provider::SharedCredentialsProvider;

    use super::AwsSettings;

    pub fn settings() -> AwsSettings {
        AwsSettings {
            region: "us-east-1".into(),
            credentials: SharedCredentialsProvider::new(Credentials::new(
                "AKIDEXAMPLE",
                "secret",
                None,
                None,
                "test",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Echo {
        ok: bool,
    }

    async fn client(server: &MockServer) -> JsonProtocolClient {
        JsonProtocolClient::with_endpoint(
            GLUE,
            &test_support::settings(),
            Timeouts::default(),
            server.uri(),
        )
        .unwrap()
    }

    #[test]
    fn default_endpoint_is_regional() {
        let c = JsonProtocolClient::new(STEP_FUNCTIONS, &test_support::settings(), Timeouts::default())
            .unwrap();
        assert_eq!(c.endpoint, "https://states.us-east-1.amazonaws.com/");
    }

    #[tokio::test]
    async fn sends_signed_json_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-amz-target", "AWSGlue.GetJobs"))
            .and(header("content-type", "application/x-amz-json-1.1"))
            .and(header_exists("authorization"))
            .and(header_exists("x-amz-date"))
            .and(body_json(json!({"MaxResults": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let echo: Echo = client(&server)
            .await
            .call("GetJobs", &json!({"MaxResults": 5}))
            .await
            .unwrap();
        assert!(echo.ok);
    }

    #[tokio::test]
    async fn error_document_becomes_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "__type": "com.amazonaws.glue#AccessDeniedException",
                "message": "not allowed"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .call::<_, Echo>("GetJobs", &json!({}))
            .await
            .unwrap_err();
        match err {
            ProviderError::Api { code, message, status, .. } => {
                assert_eq!(code, "AccessDeniedException");
                assert_eq!(message, "not allowed");
                assert_eq!(status, 400);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .call::<_, Echo>("GetJobs", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Decode { service: "glue", .. }));
    }
}
