// src/models/hierarquia.rs

use serde::{Deserialize, Serialize};

use crate::models::{
    enums::{StatusProcesso, TipoProcesso},
    processo::Processo,
};

// Árvore montada sob demanda para a visualização. Cada nó é dono dos filhos (sem ponteiro para o pai).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessoHierarquia {
    #[serde(flatten)]
    pub processo: Processo,
    pub sub_processos: Vec<ProcessoHierarquia>,
}

impl ProcessoHierarquia {
    /// Total de nós da árvore, incluindo a raiz.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.sub_processos.iter());
        }
        count
    }

    /// Profundidade máxima (raiz = 0).
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, level)) = stack.pop() {
            max = max.max(level);
            stack.extend(node.sub_processos.iter().map(|c| (c, level + 1)));
        }
        max
    }

    pub fn find(&self, id: &str) -> Option<&ProcessoHierarquia> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.processo.id == id {
                return Some(node);
            }
            stack.extend(node.sub_processos.iter());
        }
        None
    }
}

// --- Grafo para o componente de desenho ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub nome: String,
    pub tipo: TipoProcesso,
    pub status: StatusProcesso,
    pub area_nome: String,
    pub level: usize,
    pub horizontal_slot: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
