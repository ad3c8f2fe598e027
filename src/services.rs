pub mod cache_service;
pub use cache_service::{CacheCoordinator, CacheKey, RefetchPolicy};
pub mod subscription;
pub use subscription::{QuerySubscription, ViewState};
pub mod notificacao;
pub use notificacao::{Notificacao, NivelNotificacao, Notifier};
pub mod hierarquia_service;
pub use hierarquia_service::{HierarquiaService, flatten};
pub mod processo_service;
pub use processo_service::ProcessoService;
pub mod area_service;
pub use area_service::AreaService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
