// src/adapters/processo_adapter.rs

use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    adapters::normalizer::{CanonicalNormalizer, EnumNormalizer},
    common::error::AppError,
    models::{
        hierarquia::ProcessoHierarquia,
        processo::{
            AREA_NAO_ESPECIFICADA, DocumentoProcesso, FerramentaProcesso, Processo,
            ProcessoDetalhes, ProcessoInput, ProcessoPatch, ResponsavelProcesso,
        },
        wire::{DetalhesApiResponse, ProcessoApiRequest, ProcessoApiResponse, RelatedItemApi},
    },
};

// Converte registros crus da API no formato canônico e vice-versa.
// Entrada é total: nunca falha, só degrada para os padrões do normalizador.
#[derive(Clone)]
pub struct ProcessoAdapter {
    normalizer: Arc<dyn EnumNormalizer>,
}

impl Default for ProcessoAdapter {
    fn default() -> Self {
        Self::new(Arc::new(CanonicalNormalizer))
    }
}

// Campos comuns depois de resolver nome aninhado e o vínculo com o detalhe
struct ResolvedItem {
    id: String,
    nome: String,
    descricao: String,
    processo_detalhe_id: String,
}

fn resolve_item(item: RelatedItemApi, detalhe_id: Option<&str>) -> ResolvedItem {
    let nested = item.entidade.unwrap_or_default();
    ResolvedItem {
        id: item.id,
        nome: item.nome.or(nested.nome).unwrap_or_default(),
        descricao: item.descricao.or(nested.descricao).unwrap_or_default(),
        processo_detalhe_id: item
            .processo_detalhe_id
            .or_else(|| detalhe_id.map(str::to_string))
            .unwrap_or_default(),
    }
}

fn responsaveis(items: Vec<RelatedItemApi>, detalhe_id: Option<&str>) -> Vec<ResponsavelProcesso> {
    items
        .into_iter()
        .map(|i| resolve_item(i, detalhe_id))
        .map(|r| ResponsavelProcesso {
            id: r.id,
            nome: r.nome,
            processo_detalhe_id: r.processo_detalhe_id,
        })
        .collect()
}

fn ferramentas(items: Vec<RelatedItemApi>, detalhe_id: Option<&str>) -> Vec<FerramentaProcesso> {
    items
        .into_iter()
        .map(|i| resolve_item(i, detalhe_id))
        .map(|r| FerramentaProcesso {
            id: r.id,
            nome: r.nome,
            descricao: r.descricao,
            processo_detalhe_id: r.processo_detalhe_id,
        })
        .collect()
}

fn documentos(items: Vec<RelatedItemApi>, detalhe_id: Option<&str>) -> Vec<DocumentoProcesso> {
    items
        .into_iter()
        .map(|i| resolve_item(i, detalhe_id))
        .map(|r| DocumentoProcesso {
            id: r.id,
            nome: r.nome,
            descricao: r.descricao,
            processo_detalhe_id: r.processo_detalhe_id,
        })
        .collect()
}

impl ProcessoAdapter {
    pub fn new(normalizer: Arc<dyn EnumNormalizer>) -> Self {
        Self { normalizer }
    }

    // --- Entrada (API -> canônico) ---

    pub fn adapt(&self, raw: ProcessoApiResponse) -> Processo {
        let detalhe_id = raw.detalhe_id;
        let detalhe = detalhe_id.as_deref();

        Processo {
            tipo: self.normalizer.tipo(raw.tipo.as_ref()),
            status: self.normalizer.status(raw.status.as_ref()),
            ferramentas: ferramentas(raw.ferramentas.unwrap_or_default(), detalhe),
            responsaveis: responsaveis(raw.responsaveis.unwrap_or_default(), detalhe),
            documentos: documentos(raw.documentos.unwrap_or_default(), detalhe),
            area_nome: raw
                .area_nome
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| AREA_NAO_ESPECIFICADA.to_string()),
            id: raw.id,
            nome: raw.nome,
            descricao: raw.descricao,
            area_id: raw.area_id,
            processo_pai_id: raw.processo_pai_id,
            detalhe_id,
        }
    }

    pub fn adapt_all(&self, raws: Vec<ProcessoApiResponse>) -> Vec<Processo> {
        raws.into_iter().map(|raw| self.adapt(raw)).collect()
    }

    pub fn adapt_details(&self, processo_id: &str, raw: DetalhesApiResponse) -> ProcessoDetalhes {
        let detalhe = raw.id.as_deref();
        ProcessoDetalhes {
            processo_id: processo_id.to_string(),
            responsaveis: responsaveis(raw.responsaveis, detalhe),
            ferramentas: ferramentas(raw.ferramentas, detalhe),
            documentos: documentos(raw.documentos, detalhe),
            detalhe_id: raw.id,
        }
    }

    /// Aplica `adapt` a cada nó da resposta aninhada, preservando a forma.
    ///
    /// Recusa árvores mais profundas que `max_depth` e nós cujo id já aparece
    /// no próprio caminho até a raiz (dado corrompido no servidor).
    pub fn adapt_tree(
        &self,
        raw: ProcessoApiResponse,
        max_depth: usize,
    ) -> Result<ProcessoHierarquia, AppError> {
        let mut path = HashSet::new();
        self.adapt_node(raw, 0, max_depth, &mut path)
    }

    fn adapt_node(
        &self,
        mut raw: ProcessoApiResponse,
        depth: usize,
        max_depth: usize,
        path: &mut HashSet<String>,
    ) -> Result<ProcessoHierarquia, AppError> {
        if depth > max_depth {
            return Err(AppError::HierarchyTooDeep(max_depth));
        }
        if !path.insert(raw.id.clone()) {
            return Err(AppError::CycleDetected(raw.id));
        }

        let children = raw.sub_processos.take().unwrap_or_default();
        let processo = self.adapt(raw);

        let mut sub_processos = Vec::with_capacity(children.len());
        for child in children {
            sub_processos.push(self.adapt_node(child, depth + 1, max_depth, path)?);
        }

        path.remove(&processo.id);
        Ok(ProcessoHierarquia { processo, sub_processos })
    }

    // --- Saída (canônico -> API) ---

    pub fn to_wire(&self, input: &ProcessoInput) -> ProcessoApiRequest {
        ProcessoApiRequest {
            nome: input.nome.clone(),
            descricao: input.descricao.clone(),
            tipo: self.normalizer.tipo_code(input.tipo),
            status: self.normalizer.status_code(input.status),
            area_id: input.area_id.clone().filter(|a| !a.is_empty()),
            processo_pai_id: input.processo_pai_id.clone().filter(|p| !p.is_empty()),
        }
    }

    pub fn patch_to_wire(&self, patch: &ProcessoPatch) -> ProcessoApiRequest {
        ProcessoApiRequest {
            nome: patch.nome.clone(),
            descricao: patch.descricao.clone(),
            tipo: self.normalizer.tipo_code(patch.tipo),
            status: self.normalizer.status_code(patch.status),
            area_id: patch.area_id.clone().filter(|a| !a.is_empty()),
            processo_pai_id: patch.processo_pai_id.clone().filter(|p| !p.is_empty()),
        }
    }

    // Reenvio de um processo já lido; campos só de tela ficam de fora
    pub fn processo_to_wire(&self, processo: &Processo) -> ProcessoApiRequest {
        self.patch_to_wire(&ProcessoPatch::from_processo(processo))
    }
}
