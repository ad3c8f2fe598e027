// src/config.rs

use std::{env, sync::Arc, time::Duration};

use crate::{
    adapters::ProcessoAdapter,
    common::error::AppError,
    gateway::{AreaGateway, HttpTransport, ProcessoGateway, ReqwestTransport},
    services::{
        AreaService, CacheCoordinator, DashboardService, HierarquiaService, Notifier, ProcessoService,
    },
};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5241";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HIERARCHY_MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub timeout: Duration,
    // Limite de sanidade contra ciclos vindos do servidor
    pub hierarchy_max_depth: usize,
    pub compensate_partial_create: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            hierarchy_max_depth: DEFAULT_HIERARCHY_MAX_DEPTH,
            compensate_partial_create: false,
        }
    }
}

fn parse_positive<T>(name: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(AppError::Config(format!("{name} deve ser um inteiro positivo (veio '{raw}')"))),
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "sim" | "yes" => Ok(true),
        "false" | "0" | "nao" | "não" | "no" | "" => Ok(false),
        _ => Err(AppError::Config(format!("{name} deve ser true ou false (veio '{raw}')"))),
    }
}

impl AppConfig {
    /// Lê o `.env` (se houver) e depois as variáveis de ambiente.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Monta a configuração a partir de uma função de busca; ausentes ficam no padrão.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("API_BASE_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::Config(format!("API_BASE_URL inválida: '{url}'")));
            }
            config.api_base_url = url;
        }
        if let Some(raw) = lookup("API_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_positive::<u64>("API_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = lookup("HIERARCHY_MAX_DEPTH") {
            config.hierarchy_max_depth = parse_positive::<usize>("HIERARCHY_MAX_DEPTH", &raw)?;
        }
        if let Some(raw) = lookup("COMPENSATE_PARTIAL_CREATE") {
            config.compensate_partial_create = parse_bool("COMPENSATE_PARTIAL_CREATE", &raw)?;
        }

        Ok(config)
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub cache: Arc<CacheCoordinator>,
    pub notifier: Notifier,
    pub area_service: AreaService,
    pub processo_service: ProcessoService,
    pub hierarquia_service: HierarquiaService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(&config.api_base_url, config.timeout)?;
        tracing::info!("✅ Cliente HTTP configurado para {}", transport.base_url());
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_transport(config: AppConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let cache = Arc::new(CacheCoordinator::new());
        let notifier = Notifier::default();

        let area_gateway = AreaGateway::new(transport.clone());
        let processo_gateway = ProcessoGateway::new(transport, ProcessoAdapter::default());

        let processo_service = ProcessoService::new(
            processo_gateway.clone(),
            cache.clone(),
            notifier.clone(),
            config.hierarchy_max_depth,
        )
        .with_compensation(config.compensate_partial_create);
        let area_service = AreaService::new(area_gateway, processo_gateway.clone(), cache.clone(), notifier.clone());
        let hierarquia_service = HierarquiaService::new(processo_gateway, cache.clone(), config.hierarchy_max_depth);
        let dashboard_service = DashboardService::new(area_service.clone(), processo_service.clone());

        Self {
            config,
            cache,
            notifier,
            area_service,
            processo_service,
            hierarquia_service,
            dashboard_service,
        }
    }
}
