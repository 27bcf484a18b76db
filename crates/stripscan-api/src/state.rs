//! Application state shared across handlers.

use std::path::PathBuf;

use sqlx::PgPool;
use stripscan_core::Config;
use stripscan_db::SubmissionRepository;
use stripscan_processing::ImagePipeline;

pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub repository: SubmissionRepository,
    pub pipeline: ImagePipeline,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        let upload_dir = PathBuf::from(&config.upload_dir);
        AppState {
            repository: SubmissionRepository::new(pool.clone()),
            pipeline: ImagePipeline::new(&upload_dir),
            upload_dir,
            pool,
            config,
        }
    }
}
