// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    models::{
        area::Area,
        dashboard::{AreaProcessCount, DashboardSummary},
        processo::Processo,
    },
    services::{area_service::AreaService, cache_service::RefetchPolicy, processo_service::ProcessoService},
};

pub const SEM_AREA: &str = "Sem área";
const RECENT_AREAS: usize = 3;

#[derive(Clone)]
pub struct DashboardService {
    areas: AreaService,
    processos: ProcessoService,
}

impl DashboardService {
    pub fn new(areas: AreaService, processos: ProcessoService) -> Self {
        Self { areas, processos }
    }

    pub async fn get_summary(&self, policy: RefetchPolicy) -> Result<DashboardSummary, AppError> {
        // As duas listas são independentes
        let (areas, processos) = tokio::try_join!(self.areas.list_all(policy), self.processos.list_all(policy))?;
        Ok(summarize(&areas, &processos))
    }
}

// Agrupa pelo nome da área cadastrada; a ordem é a da primeira ocorrência
pub fn summarize(areas: &[Area], processos: &[Processo]) -> DashboardSummary {
    let mut por_area: Vec<AreaProcessCount> = Vec::new();

    for processo in processos {
        let nome = areas
            .iter()
            .find(|a| a.id == processo.area_id)
            .map(|a| a.nome.as_str())
            .unwrap_or(SEM_AREA);

        match por_area.iter_mut().find(|c| c.area == nome) {
            Some(contagem) => contagem.count += 1,
            None => por_area.push(AreaProcessCount { area: nome.to_string(), count: 1 }),
        }
    }

    DashboardSummary {
        total_areas: areas.len(),
        recent_areas: areas.iter().take(RECENT_AREAS).cloned().collect(),
        total_processos: processos.len(),
        processos_por_area: por_area,
    }
}
