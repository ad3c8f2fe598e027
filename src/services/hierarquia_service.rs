// src/services/hierarquia_service.rs

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::{
    common::error::AppError,
    gateway::ProcessoGateway,
    models::hierarquia::{GraphEdge, GraphNode, HierarchyGraph, ProcessoHierarquia},
    services::cache_service::{CacheCoordinator, CacheKey, RefetchPolicy},
};

// Layout fixo, sem ajuste iterativo: mesma árvore, mesmas coordenadas.
pub const HORIZONTAL_GAP: f64 = 300.0;
pub const VERTICAL_GAP: f64 = 180.0;
// Distância entre irmãos, em "slots"
pub const SIBLING_SPACING: f64 = 1.2;

#[derive(Clone)]
pub struct HierarquiaService {
    gateway: ProcessoGateway,
    cache: Arc<CacheCoordinator>,
    max_depth: usize,
}

impl HierarquiaService {
    pub fn new(gateway: ProcessoGateway, cache: Arc<CacheCoordinator>, max_depth: usize) -> Self {
        Self { gateway, cache, max_depth }
    }

    /// Árvore completa a partir de `root_id`, sem passar pelo cache.
    /// Raiz inexistente é `AppError::NotFound`, nunca uma árvore vazia.
    pub async fn build_tree(&self, root_id: &str) -> Result<ProcessoHierarquia, AppError> {
        let tree = self.gateway.get_hierarchy(root_id, self.max_depth).await?;
        info!(processo_id = %root_id, nos = tree.node_count(), "Hierarquia montada");
        Ok(tree)
    }

    pub async fn hierarchy(&self, root_id: &str, policy: RefetchPolicy) -> Result<ProcessoHierarquia, AppError> {
        self.cache
            .fetch(&CacheKey::hierarquia(root_id), policy, || self.build_tree(root_id))
            .await
    }

    pub async fn graph(&self, root_id: &str, policy: RefetchPolicy) -> Result<HierarchyGraph, AppError> {
        let tree = self.hierarchy(root_id, policy).await?;
        Ok(flatten(&tree))
    }
}

/// Achata a árvore em nós e arestas para o componente de desenho.
///
/// Pré-ordem. `level` é a profundidade; os filhos ficam da esquerda para a direita
/// na ordem recebida, em `slot_pai + (-(n-1)/2 + i) * SIBLING_SPACING`, o que deixa
/// o pai centralizado sobre eles. Uma aresta por relação pai→filho.
pub fn flatten(tree: &ProcessoHierarquia) -> HierarchyGraph {
    let mut graph = HierarchyGraph::default();
    let mut seen_edges = HashSet::new();
    let mut stack: Vec<(&ProcessoHierarquia, usize, f64, Option<&str>)> = vec![(tree, 0, 0.0, None)];

    while let Some((node, level, slot, parent)) = stack.pop() {
        let processo = &node.processo;
        graph.nodes.push(GraphNode {
            id: processo.id.clone(),
            nome: processo.nome.clone(),
            tipo: processo.tipo,
            status: processo.status,
            area_nome: processo.area_nome.clone(),
            level,
            horizontal_slot: slot,
            x: slot * HORIZONTAL_GAP,
            y: level as f64 * VERTICAL_GAP,
        });

        if let Some(parent_id) = parent {
            let edge_id = format!("edge-{}-{}", parent_id, processo.id);
            if seen_edges.insert(edge_id.clone()) {
                graph.edges.push(GraphEdge {
                    id: edge_id,
                    source: parent_id.to_string(),
                    target: processo.id.clone(),
                });
            }
        }

        let count = node.sub_processos.len();
        let start = -(count as f64 - 1.0) / 2.0;
        // empilha ao contrário para visitar na ordem recebida
        for (index, child) in node.sub_processos.iter().enumerate().rev() {
            let child_slot = slot + (start + index as f64) * SIBLING_SPACING;
            stack.push((child, level + 1, child_slot, Some(processo.id.as_str())));
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ProcessoAdapter;
    use crate::models::wire::ProcessoApiResponse;

    fn node(id: &str, children: Vec<ProcessoHierarquia>) -> ProcessoHierarquia {
        let processo = ProcessoAdapter::default().adapt(ProcessoApiResponse {
            id: id.to_string(),
            nome: id.to_uppercase(),
            ..Default::default()
        });
        ProcessoHierarquia { processo, sub_processos: children }
    }

    fn find<'a>(graph: &'a HierarchyGraph, id: &str) -> &'a GraphNode {
        graph.nodes.iter().find(|n| n.id == id).unwrap()
    }

    #[test]
    fn three_leaf_children_are_symmetric_around_the_root() {
        let tree = node("r", vec![node("a", vec![]), node("b", vec![]), node("c", vec![])]);
        let graph = flatten(&tree);

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["r", "a", "b", "c"]);

        assert_eq!(find(&graph, "a").horizontal_slot, -SIBLING_SPACING);
        assert_eq!(find(&graph, "b").horizontal_slot, 0.0);
        assert_eq!(find(&graph, "c").horizontal_slot, SIBLING_SPACING);
        assert_eq!(find(&graph, "a").x, -SIBLING_SPACING * HORIZONTAL_GAP);
        assert_eq!(find(&graph, "c").y, VERTICAL_GAP);

        let edges: Vec<(&str, &str)> = graph
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(edges, vec![("r", "a"), ("r", "b"), ("r", "c")]);

        // determinístico
        assert_eq!(flatten(&tree), graph);
    }

    #[test]
    fn level_equals_depth_and_children_sit_one_level_below() {
        let tree = node(
            "r",
            vec![
                node("a", vec![node("a1", vec![node("a1x", vec![])])]),
                node("b", vec![node("b1", vec![]), node("b2", vec![])]),
            ],
        );
        let graph = flatten(&tree);

        let expected = [("r", 0), ("a", 1), ("a1", 2), ("a1x", 3), ("b", 1), ("b1", 2), ("b2", 2)];
        for (id, level) in expected {
            assert_eq!(find(&graph, id).level, level, "nível de {id}");
        }
        for edge in &graph.edges {
            assert_eq!(find(&graph, &edge.target).level, find(&graph, &edge.source).level + 1);
        }
        assert_eq!(graph.edges.len(), graph.nodes.len() - 1);
    }

    #[test]
    fn parent_is_centered_over_its_children() {
        let tree = node("r", vec![node("a", vec![node("a1", vec![]), node("a2", vec![])]), node("b", vec![])]);
        let graph = flatten(&tree);

        let a = find(&graph, "a").horizontal_slot;
        let media = (find(&graph, "a1").horizontal_slot + find(&graph, "a2").horizontal_slot) / 2.0;
        assert!((a - media).abs() < 1e-9);
        assert!((find(&graph, "a2").horizontal_slot - find(&graph, "a1").horizontal_slot - SIBLING_SPACING).abs() < 1e-9);
    }

    #[test]
    fn single_node_tree_has_no_edges() {
        let graph = flatten(&node("r", vec![]));
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
        assert_eq!((graph.nodes[0].x, graph.nodes[0].y), (0.0, 0.0));
    }
}
