//! Configuração do gluedash carregada a partir de `gluedash.toml`.
//!
//! A struct [`DashConfig`] contém todos os parâmetros. Chaves ausentes usam
//! defaults. `AWS_REGION`, `GLUEDASH_ACCOUNT_ID` e `GLUEDASH_NAME_FILTER` têm
//! precedência sobre o arquivo; as flags da CLI têm precedência sobre ambos.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::aws::Timeouts;
use crate::error::DashError;
use crate::model::NameFilter;

/// Arquivo de configuração padrão, procurado no diretório atual.
pub const DEFAULT_CONFIG_FILE: &str = "gluedash.toml";

/// Configuração de nível superior carregada de `gluedash.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashConfig {
    /// Região AWS. Sem valor, a cadeia de providers da AWS decide.
    #[serde(default)]
    pub region: Option<String>,

    /// Conta AWS, usada para transformar o nome de uma state machine em ARN.
    #[serde(default)]
    pub account_id: Option<String>,

    /// Predicado de nome aplicado às state machines e jobs do Glue.
    #[serde(default)]
    pub filter: NameFilter,

    /// Quantidade de runs exibidos por job quando `--limit` não é informado.
    #[serde(default = "default_max_runs")]
    pub max_runs: usize,

    /// Endpoint alternativo do Step Functions (emuladores locais).
    #[serde(default)]
    pub states_endpoint: Option<String>,

    /// Endpoint alternativo do Glue.
    #[serde(default)]
    pub glue_endpoint: Option<String>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// Valor padrão para o histórico de runs: 10.
fn default_max_runs() -> usize {
    10
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            region: None,
            account_id: None,
            filter: NameFilter::default(),
            max_runs: default_max_runs(),
            states_endpoint: None,
            glue_endpoint: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl DashConfig {
    /// Carrega `gluedash.toml` do diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self, DashError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE), false)
    }

    /// Carrega a configuração de `path`. Arquivo ausente só é erro quando
    /// `required` está ligado (`--config` explícito).
    pub fn load_from(path: &Path, required: bool) -> Result<Self, DashError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<DashConfig>(&contents)?
        } else if required {
            return Err(DashError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Variáveis de ambiente têm precedência sobre o arquivo.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| var(key).filter(|v| !v.is_empty());

        if let Some(region) = non_empty("AWS_REGION") {
            self.region = Some(region);
        }
        if let Some(account_id) = non_empty("GLUEDASH_ACCOUNT_ID") {
            self.account_id = Some(account_id);
        }
        if let Some(prefix) = non_empty("GLUEDASH_NAME_FILTER") {
            self.filter.prefix = Some(prefix);
        }
    }

    fn validate(&self) -> Result<(), DashError> {
        if let Some(account_id) = &self.account_id
            && (account_id.len() != 12 || !account_id.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(DashError::Config(format!(
                "account_id must be 12 digits, got `{account_id}`"
            )));
        }
        Ok(())
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            request: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Transforma o nome de uma state machine em ARN. ARNs passam inalterados.
    pub fn state_machine_arn(&self, name_or_arn: &str, region: &str) -> Result<String, DashError> {
        if name_or_arn.starts_with("arn:") {
            return Ok(name_or_arn.to_string());
        }
        let account_id = self.account_id.as_deref().ok_or_else(|| {
            DashError::Config(
                "account_id is required to describe a state machine by name".to_string(),
            )
        })?;
        Ok(format!(
            "arn:aws:states:{region}:{account_id}:stateMachine:{name_or_arn}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = DashConfig::default();
        assert_eq!(config.max_runs, 10);
        assert!(config.region.is_none());
        assert!(config.account_id.is_none());
        assert_eq!(config.filter, NameFilter::any());
        assert_eq!(config.timeouts().connect, Duration::from_secs(10));
        assert_eq!(config.timeouts().request, Duration::from_secs(60));
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            region = "eu-west-1"
            max_runs = 25

            [filter]
            prefix = "team_"
        "#;
        let config: DashConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.max_runs, 25);
        assert_eq!(config.filter.prefix.as_deref(), Some("team_"));
        assert!(config.filter.contains.is_none());
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn env_overrides_file() {
        let mut config: DashConfig = toml::from_str(
            r#"
            region = "eu-west-1"
            account_id = "111111111111"
        "#,
        )
        .unwrap();
        let env: HashMap<&str, &str> = [
            ("AWS_REGION", "us-west-2"),
            ("GLUEDASH_ACCOUNT_ID", ""),
            ("GLUEDASH_NAME_FILTER", "ops_"),
        ]
        .into_iter()
        .collect();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.region.as_deref(), Some("us-west-2"));
        // Valores vazios são ignorados.
        assert_eq!(config.account_id.as_deref(), Some("111111111111"));
        assert_eq!(config.filter.prefix.as_deref(), Some("ops_"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "account_id = \"123456789012\"\nmax_runs = 3").unwrap();

        let config = DashConfig::load_from(file.path(), true).unwrap();
        assert_eq!(config.max_runs, 3);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashConfig::load_from(&dir.path().join("nope.toml"), true).unwrap_err();
        assert!(matches!(err, DashError::Config(_)));
    }

    #[test]
    fn missing_default_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashConfig::load_from(&dir.path().join("gluedash.toml"), false).unwrap();
        assert_eq!(config.max_runs, 10);
    }

    #[test]
    fn invalid_account_id_is_rejected() {
        let config = DashConfig {
            account_id: Some("12345".into()),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DashError::Config(_))));
    }

    #[test]
    fn state_machine_arn_from_name() {
        let config = DashConfig {
            account_id: Some("123456789012".into()),
            ..Default::default()
        };
        assert_eq!(
            config.state_machine_arn("orders", "us-east-1").unwrap(),
            "arn:aws:states:us-east-1:123456789012:stateMachine:orders"
        );
        let arn = "arn:aws:states:eu-west-1:999999999999:stateMachine:x";
        assert_eq!(config.state_machine_arn(arn, "us-east-1").unwrap(), arn);
    }

    #[test]
    fn state_machine_arn_without_account_fails() {
        let err = DashConfig::default()
            .state_machine_arn("orders", "us-east-1")
            .unwrap_err();
        assert!(matches!(err, DashError::Config(_)));
    }
}
