// src/services/cache_service.rs

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::common::error::AppError;

// --- Chaves ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Area,
    Areas,
    Processo,
    Processos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Detalhes,
    Hierarquia,
    Subprocessos,
}

/// `(tipo de entidade, id?, relação?)`, a unidade de invalidação.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: EntityKind,
    pub id: Option<String>,
    pub relation: Option<Relation>,
}

impl CacheKey {
    fn new(kind: EntityKind, id: Option<&str>, relation: Option<Relation>) -> Self {
        Self { kind, id: id.map(str::to_string), relation }
    }

    pub fn areas() -> Self {
        Self::new(EntityKind::Areas, None, None)
    }

    pub fn area(id: &str) -> Self {
        Self::new(EntityKind::Area, Some(id), None)
    }

    /// Lista completa de processos
    pub fn processos() -> Self {
        Self::new(EntityKind::Processos, None, None)
    }

    pub fn processos_by_area(area_id: &str) -> Self {
        Self::new(EntityKind::Processos, Some(area_id), None)
    }

    pub fn subprocessos(parent_id: &str) -> Self {
        Self::new(EntityKind::Processos, Some(parent_id), Some(Relation::Subprocessos))
    }

    pub fn processo(id: &str) -> Self {
        Self::new(EntityKind::Processo, Some(id), None)
    }

    pub fn detalhes(id: &str) -> Self {
        Self::new(EntityKind::Processo, Some(id), Some(Relation::Detalhes))
    }

    pub fn hierarquia(id: &str) -> Self {
        Self::new(EntityKind::Processo, Some(id), Some(Relation::Hierarquia))
    }

    /// Casamento por prefixo: `(processo, p1)` cobre `(processo, p1, detalhes)` e `(processo, p1, hierarquia)`.
    pub fn covers(&self, other: &CacheKey) -> bool {
        self.kind == other.kind
            && (self.id.is_none() || self.id == other.id)
            && (self.relation.is_none() || self.relation == other.relation)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(id) = &self.id {
            write!(f, "/{id}")?;
        }
        if let Some(relation) = &self.relation {
            write!(f, "/{relation:?}")?;
        }
        Ok(())
    }
}

// --- Política de busca ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefetchPolicy {
    /// Usa o valor em cache se estiver fresco
    #[default]
    IfStale,
    /// Sempre busca de novo (ex.: tela que volta a ficar visível)
    Always,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheRead<T> {
    pub value: T,
    pub is_stale: bool,
}

// --- Entradas ---

type Stored = Arc<dyn Any + Send + Sync>;

struct Entry {
    value: Option<Stored>,
    stale: bool,
    // Incrementada a cada invalidação e a cada busca iniciada.
    // Uma resposta só é aplicada se a geração não mudou desde que a busca começou.
    generation: u64,
}

impl Entry {
    fn empty() -> Self {
        Self { value: None, stale: true, generation: 0 }
    }
}

/// Bilhete de uma busca em andamento
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: CacheKey,
    generation: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub stale: usize,
}

// Cache de consultas invalidado por mutação, em memória, recriado vazio a cada execução.
// Invalidar marca como obsoleto mas mantém o valor (stale-while-revalidate).
#[derive(Default)]
pub struct CacheCoordinator {
    entries: DashMap<CacheKey, Entry>,
}

impl CacheCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read<T>(&self, key: &CacheKey) -> Option<CacheRead<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entry = self.entries.get(key)?;
        let stored = entry.value.clone()?;
        let value = stored.downcast::<T>().ok()?;
        Some(CacheRead { value: (*value).clone(), is_stale: entry.stale })
    }

    pub fn is_stale(&self, key: &CacheKey) -> bool {
        self.entries.get(key).map(|e| e.stale).unwrap_or(true)
    }

    /// Marca uma chave exata como obsoleta e invalida buscas em andamento para ela.
    pub fn invalidate(&self, key: &CacheKey) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.stale = true;
            entry.generation += 1;
            debug!(key = %key, "Cache invalidado");
        }
    }

    /// Invalida toda chave coberta pelo prefixo.
    pub fn invalidate_prefix(&self, prefix: &CacheKey) {
        self.invalidate_where(|key| prefix.covers(key));
    }

    pub fn invalidate_where<F>(&self, predicate: F)
    where
        F: Fn(&CacheKey) -> bool,
    {
        for mut entry in self.entries.iter_mut() {
            if predicate(entry.key()) {
                let e = entry.value_mut();
                e.stale = true;
                e.generation += 1;
            }
        }
    }

    pub fn invalidate_all(&self) {
        self.invalidate_where(|_| true);
    }

    // --- Protocolo de busca com geração ---

    pub fn begin_fetch(&self, key: &CacheKey) -> FetchTicket {
        let mut entry = self.entries.entry(key.clone()).or_insert_with(Entry::empty);
        entry.generation += 1;
        FetchTicket { key: key.clone(), generation: entry.generation }
    }

    /// Grava o resultado se nada o superou. Devolve `false` quando a resposta foi descartada.
    pub fn complete_fetch<T>(&self, ticket: &FetchTicket, value: T) -> bool
    where
        T: Send + Sync + 'static,
    {
        match self.entries.get_mut(&ticket.key) {
            Some(mut entry) if entry.generation == ticket.generation => {
                entry.value = Some(Arc::new(value));
                entry.stale = false;
                true
            }
            _ => {
                debug!(key = %ticket.key, "Resposta superada descartada");
                false
            }
        }
    }

    // Erro nunca vira valor: a entrada fica obsoleta com o valor anterior
    pub fn fail_fetch(&self, ticket: &FetchTicket) {
        if let Some(mut entry) = self.entries.get_mut(&ticket.key) {
            entry.stale = true;
        }
    }

    /// Leitura com busca: devolve o cache se fresco (e a política permitir), senão chama `fetcher`.
    ///
    /// O chamador sempre recebe o resultado da própria busca, mesmo quando ele chega
    /// tarde demais para ser gravado no cache.
    pub async fn fetch<T, F, Fut>(&self, key: &CacheKey, policy: RefetchPolicy, fetcher: F) -> Result<T, AppError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if policy == RefetchPolicy::IfStale {
            if let Some(CacheRead { value, is_stale: false }) = self.read::<T>(key) {
                return Ok(value);
            }
        }

        let ticket = self.begin_fetch(key);
        match fetcher().await {
            Ok(value) => {
                self.complete_fetch(&ticket, value.clone());
                Ok(value)
            }
            Err(err) => {
                self.fail_fetch(&ticket);
                Err(err)
            }
        }
    }

    pub async fn invalidate_and_refetch<T, F, Fut>(&self, key: &CacheKey, fetcher: F) -> Result<T, AppError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        self.invalidate(key);
        self.fetch(key, RefetchPolicy::Always, fetcher).await
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for entry in self.entries.iter() {
            stats.entries += 1;
            if entry.stale {
                stats.stale += 1;
            }
        }
        stats
    }
}
