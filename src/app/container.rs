use std::sync::Arc;

use crate::adapters::{AppConfig, FsStore, LibavMediaOpener, YtDlpAcquisition};
use crate::app::{process_interactor::ProcessInteractor, retrieve_interactor::RetrieveInteractor};
use crate::domain::errors::ProcessError;
use crate::engine::{EngineConfig, SamplingEngine};
use crate::ports::{AcquisitionPort, MediaOpener, StoragePort};

pub trait AppContainer: Send + Sync {
    fn process_interactor(&self) -> Arc<ProcessInteractor>;
    fn retrieve_interactor(&self) -> Arc<RetrieveInteractor>;
    fn config(&self) -> &AppConfig;
}

pub struct DefaultAppContainer {
    config: AppConfig,
    process_interactor: Arc<ProcessInteractor>,
    retrieve_interactor: Arc<RetrieveInteractor>,
}

impl DefaultAppContainer {
    /// Wire the production adapters from `config`
    pub fn new(config: AppConfig) -> Result<Self, ProcessError> {
        let opener = LibavMediaOpener::new()?;
        let acquisition = YtDlpAcquisition::new(config.yt_dlp_path.clone(), config.strategy);
        let storage = FsStore::new(config.output_dir.clone())?;

        Ok(Self::with_ports(
            config,
            Arc::new(acquisition) as Arc<dyn AcquisitionPort>,
            Arc::new(opener) as Arc<dyn MediaOpener>,
            Arc::new(storage) as Arc<dyn StoragePort>,
        ))
    }

    /// Wire the interactors around caller-supplied ports
    pub fn with_ports(
        config: AppConfig,
        acquisition: Arc<dyn AcquisitionPort>,
        opener: Arc<dyn MediaOpener>,
        storage: Arc<dyn StoragePort>,
    ) -> Self {
        let engine = Arc::new(SamplingEngine::new(
            opener,
            EngineConfig {
                output_dir: storage.root().to_path_buf(),
                resolution_dpi: config.page_resolution_dpi,
            },
        ));

        let process_interactor = Arc::new(ProcessInteractor::new(
            acquisition,
            Arc::clone(&storage),
            engine,
        ));
        let retrieve_interactor = Arc::new(RetrieveInteractor::new(storage));

        Self {
            config,
            process_interactor,
            retrieve_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn process_interactor(&self) -> Arc<ProcessInteractor> {
        Arc::clone(&self.process_interactor)
    }

    fn retrieve_interactor(&self) -> Arc<RetrieveInteractor> {
        Arc::clone(&self.retrieve_interactor)
    }

    fn config(&self) -> &AppConfig {
        &self.config
    }
}
