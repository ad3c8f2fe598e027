//src/main.rs

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use gestao_processos::{
    AppConfig, AppState,
    models::ProcessoFilter,
    services::RefetchPolicy,
};

#[derive(Parser)]
#[command(name = "gestao-processos")]
#[command(version, about = "Console de gestão de processos por área")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Endereço da API de processos
    #[arg(long, global = true, env = "API_BASE_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Lista as áreas
    Areas,

    /// Lista processos, com filtro opcional por área e por nome
    Processos {
        #[arg(long)]
        area: Option<String>,
        #[arg(long)]
        busca: Option<String>,
    },

    /// Mostra um processo
    Processo { id: String },

    /// Responsáveis, ferramentas e documentos de um processo
    Detalhes { id: String },

    /// Árvore de subprocessos a partir de um processo
    Hierarquia {
        id: String,
        /// Imprime nós e arestas com coordenadas em vez da árvore
        #[arg(long)]
        grafo: bool,
    },

    /// Resumo do painel inicial
    Resumo,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // .env antes do clap, para que `env = "API_BASE_URL"` também o enxergue
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.api_url.filter(|u| !u.trim().is_empty()) {
        config.api_base_url = url.trim().trim_end_matches('/').to_string();
    }
    let state = AppState::new(config)?;

    // Console sem cache entre execuções: toda leitura vai ao servidor
    let policy = RefetchPolicy::Always;

    match cli.command {
        Commands::Areas => print_json(&state.area_service.list_all(policy).await?)?,
        Commands::Processos { area, busca } => {
            let filter = ProcessoFilter {
                termo: busca.filter(|t| !t.trim().is_empty()),
                area_id: area,
            };
            print_json(&state.processo_service.search(&filter, policy).await?)?
        }
        Commands::Processo { id } => print_json(&state.processo_service.get_by_id(&id, policy).await?)?,
        Commands::Detalhes { id } => print_json(&state.processo_service.get_details(&id, policy).await?)?,
        Commands::Hierarquia { id, grafo } => {
            if grafo {
                print_json(&state.hierarquia_service.graph(&id, policy).await?)?
            } else {
                print_json(&state.hierarquia_service.hierarchy(&id, policy).await?)?
            }
        }
        Commands::Resumo => print_json(&state.dashboard_service.get_summary(policy).await?)?,
    }

    Ok(())
}
