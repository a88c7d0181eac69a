use std::time::SystemTime;

use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{SignableBody, SignableRequest, SigningSettings, sign};
use aws_sigv4::sign::v4;

use super::error::ProviderError;

/// Assina requisições de um serviço em uma região com AWS Signature V4.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: SharedCredentialsProvider,
    region: String,
    service: &'static str,
}

impl RequestSigner {
    pub fn new(
        credentials: SharedCredentialsProvider,
        region: impl Into<String>,
        service: &'static str,
    ) -> Self {
        Self {
            credentials,
            region: region.into(),
            service,
        }
    }

    /// Retorna `headers` mais os headers da assinatura (`authorization`,
    /// `x-amz-date` e, com credenciais temporárias, `x-amz-security-token`).
    pub async fn sign(
        &self,
        method: &str,
        uri: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<Vec<(String, String)>, ProviderError> {
        let credentials = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| ProviderError::Credentials(e.to_string()))?;

        let identity = credentials.into();
        let signing_params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(self.service)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| ProviderError::Signing(e.to_string()))?;

        let signable_request = SignableRequest::new(
            method,
            uri,
            headers.iter().copied(),
            SignableBody::Bytes(body),
        )
        .map_err(|e| ProviderError::Signing(e.to_string()))?;

        let (instructions, _signature) = sign(signable_request, &signing_params.into())
            .map_err(|e| ProviderError::Signing(e.to_string()))?
            .into_parts();

        let mut builder = http::Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let mut request = builder
            .body(())
            .map_err(|e| ProviderError::Signing(e.to_string()))?;
        instructions.apply_to_request_http1x(&mut request);

        Ok(request
            .headers()
            .iter()
            .filter(|(name, _)| name.as_str() != "host")
            .filter_map(|(name, value)| {
                Some((name.to_string(), value.to_str().ok()?.to_string()))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_credential_types::Credentials;

    fn signer(session_token: Option<&str>) -> RequestSigner {
        let credentials = Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            session_token.map(str::to_string),
            None,
            "test",
        );
        RequestSigner::new(
            SharedCredentialsProvider::new(credentials),
            "eu-west-1",
            "glue",
        )
    }

    fn find<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[tokio::test]
    async fn adds_authorization_and_keeps_request_headers() {
        let headers = signer(None)
            .sign(
                "POST",
                "https://glue.eu-west-1.amazonaws.com/",
                &[
                    ("content-type", "application/x-amz-json-1.1"),
                    ("x-amz-target", "AWSGlue.GetJobs"),
                ],
                b"{}",
            )
            .await
            .unwrap();

        let auth = find(&headers, "authorization").unwrap();
        assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
        assert!(auth.contains("/eu-west-1/glue/aws4_request"));
        assert!(auth.contains("x-amz-target"));
        assert!(find(&headers, "x-amz-date").is_some());
        assert_eq!(find(&headers, "x-amz-target"), Some("AWSGlue.GetJobs"));
        assert_eq!(
            find(&headers, "content-type"),
            Some("application/x-amz-json-1.1")
        );
        assert!(find(&headers, "x-amz-security-token").is_none());
        assert!(find(&headers, "host").is_none());
    }

    #[tokio::test]
    async fn session_token_is_forwarded() {
        let headers = signer(Some("session-token"))
            .sign("POST", "https://glue.eu-west-1.amazonaws.com/", &[], b"{}")
            .await
            .unwrap();
        assert_eq!(find(&headers, "x-amz-security-token"), Some("session-token"));
    }
}
