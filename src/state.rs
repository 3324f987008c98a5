use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use crate::config::Config;
use crate::services::establishment::EstablishmentRecorder;
use crate::services::handover::HandoverOrchestrator;
use crate::services::outbound::HttpNotifier;
use crate::services::session_directory::InMemorySessionDirectory;
use crate::services::teid_pool::TeidPool;

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: CancellationToken,
    pub sessions: Arc<InMemorySessionDirectory>,
    pub handover: HandoverOrchestrator,
    pub establishment: Arc<EstablishmentRecorder>,
}

pub fn init(config: &Config, lifecycle: CancellationToken) -> anyhow::Result<AppState> {
    let teids = Arc::new(TeidPool::new());
    teids.init(Some(lifecycle.clone()))?;

    let sessions = Arc::new(InMemorySessionDirectory::new(teids, config.upf_gtp_addr));
    let notifier = Arc::new(HttpNotifier::new(config.user_agent.clone(), config.http_timeout));

    let handover = HandoverOrchestrator::new(sessions.clone(), notifier, lifecycle.clone());
    let establishment = Arc::new(EstablishmentRecorder::new(sessions.clone()));
    establishment.spawn_audit(lifecycle.clone());

    tracing::info!("Control plane state initialized (UPF GTP-U address {})", config.upf_gtp_addr);

    Ok(AppState {
        lifecycle,
        sessions,
        handover,
        establishment,
    })
}
