//! Interface de linha de comando do gluedash baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] e flags globais
//! (--config, --region, --filter, --json, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Cruza state machines do Step Functions com os jobs do Glue que elas executam.
#[derive(Debug, Parser)]
#[command(name = "gluedash", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Arquivo de configuração (padrão: ./gluedash.toml, se existir).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Região AWS, com precedência sobre configuração e ambiente.
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Considera apenas state machines e jobs do Glue cujo nome começa com este prefixo.
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// Imprime JSON em vez de tabelas.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Habilita logs de debug no stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lista state machines e os jobs do Glue que cada uma inicia.
    StateMachines,

    /// Lista jobs do Glue e as state machines que os iniciam.
    Jobs,

    /// Mostra os runs mais recentes de um job do Glue.
    Runs {
        /// Nome do job do Glue.
        job: String,

        /// Quantidade de runs (padrão: `max_runs` da configuração).
        #[arg(long, short)]
        limit: Option<usize>,
    },

    /// Lista as state machines que iniciam um job do Glue.
    UsedBy {
        /// Nome do job do Glue.
        job: String,
    },

    /// Mostra os jobs do Glue iniciados por uma state machine.
    Describe {
        /// ARN da state machine, ou o nome quando `account_id` está configurado.
        state_machine: String,
    },

    /// Mostra os jobs do Glue iniciados por um arquivo de definição local. Funciona offline.
    Resolve {
        /// Caminho de um arquivo JSON em Amazon States Language.
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_runs_subcommand() {
        let cli = Cli::parse_from(["gluedash", "runs", "etl_daily", "--limit", "5"]);
        match cli.command {
            Command::Runs { job, limit } => {
                assert_eq!(job, "etl_daily");
                assert_eq!(limit, Some(5));
            }
            _ => panic!("expected Runs command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "gluedash",
            "--region",
            "eu-west-1",
            "--filter",
            "team_",
            "--json",
            "--verbose",
            "jobs",
        ]);
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
        assert_eq!(cli.filter.as_deref(), Some("team_"));
        assert!(matches!(cli.command, Command::Jobs));
    }

    #[test]
    fn cli_parses_kebab_case_subcommands() {
        let cli = Cli::parse_from(["gluedash", "used-by", "etl_daily"]);
        assert!(matches!(cli.command, Command::UsedBy { ref job } if job == "etl_daily"));

        let cli = Cli::parse_from(["gluedash", "state-machines", "--json"]);
        assert!(matches!(cli.command, Command::StateMachines));
        assert!(cli.json);
    }

    #[test]
    fn cli_parses_resolve_path() {
        let cli = Cli::parse_from(["gluedash", "resolve", "definition.json"]);
        match cli.command {
            Command::Resolve { file } => assert_eq!(file, PathBuf::from("definition.json")),
            _ => panic!("expected Resolve command"),
        }
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
