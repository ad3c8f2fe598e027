// src/models/dashboard.rs

use serde::Serialize;

use crate::models::area::Area;

// 1. Cards do topo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_areas: usize,
    pub recent_areas: Vec<Area>, // as 3 primeiras que a API devolve
    pub total_processos: usize,
    pub processos_por_area: Vec<AreaProcessCount>,
}

// 2. Barras de processos por área
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaProcessCount {
    pub area: String,
    pub count: usize,
}
