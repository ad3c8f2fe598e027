// src/services/subscription.rs

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::{
    common::error::AppError,
    services::cache_service::{CacheCoordinator, CacheKey, RefetchPolicy},
};

// O que a tela está mostrando agora
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    pub key: CacheKey,
    pub value: T,
}

/// Assinatura de uma tela sobre uma consulta do cache.
///
/// Cada `focus` (montagem, volta à tela, troca de alvo) recebe uma geração; só a
/// resposta da geração mais recente é publicada. Assim, navegar de P1 para P2 antes
/// de P1 responder nunca faz P1 aparecer na tela de P2.
pub struct QuerySubscription<T> {
    cache: Arc<CacheCoordinator>,
    policy: RefetchPolicy,
    generation: AtomicU64,
    sender: watch::Sender<Option<ViewState<T>>>,
}

impl<T> QuerySubscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Padrão das telas: sempre rebusca ao (re)montar, independente do cache estar fresco.
    pub fn new(cache: Arc<CacheCoordinator>) -> Self {
        Self::with_policy(cache, RefetchPolicy::Always)
    }

    pub fn with_policy(cache: Arc<CacheCoordinator>, policy: RefetchPolicy) -> Self {
        let (sender, _) = watch::channel(None);
        Self { cache, policy, generation: AtomicU64::new(0), sender }
    }

    pub fn watch(&self) -> watch::Receiver<Option<ViewState<T>>> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> Option<ViewState<T>> {
        self.sender.borrow().clone()
    }

    /// Busca `key` e publica o resultado se ninguém focou outra coisa nesse meio-tempo.
    ///
    /// Devolve `Ok(true)` quando publicou, `Ok(false)` quando a resposta foi superada.
    /// Erros voltam ao chamador e não apagam o que já estava na tela.
    pub async fn focus<F, Fut>(&self, key: CacheKey, fetcher: F) -> Result<bool, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let value = self.cache.fetch(&key, self.policy, fetcher).await?;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(key = %key, "Tela mudou de alvo, resposta ignorada");
            return Ok(false);
        }

        self.sender.send_replace(Some(ViewState { key, value }));
        Ok(true)
    }

    // Tela desmontada: respostas pendentes deixam de valer
    pub fn release(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.sender.send_replace(None);
    }
}
