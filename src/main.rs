use std::sync::Arc;

use anyhow::Context;
use campus_rooms::config::EngineConfig;
use campus_rooms::data::{load_campus_from_dir, read_campus_from_file};
use campus_rooms::group::JsonFileGroupStore;
use campus_rooms::schedule::Campus;
use campus_rooms::service::{EngineRequest, EngineResponse, RoomFinder};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use log::info;

type Finder = RoomFinder<JsonFileGroupStore>;

fn load_campus(config: &EngineConfig) -> anyhow::Result<Campus> {
    match &config.bundle {
        Some(bundle) => read_campus_from_file(bundle)
            .with_context(|| format!("failed to read campus bundle {}", bundle.display())),
        None => load_campus_from_dir(&config.data_dir).with_context(|| {
            format!("failed to load fixtures from {}", config.data_dir.display())
        }),
    }
}

async fn handler(finder: &Finder, event: LambdaEvent<EngineRequest>) -> Result<EngineResponse, Error> {
    Ok(finder.handle(event.payload))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = EngineConfig::from_env()?;
    let campus = load_campus(&config)?;
    info!(
        "serving {} buildings, groups stored in {}",
        campus.len(),
        config.group_store.display()
    );

    let finder = Arc::new(RoomFinder::new(
        campus,
        JsonFileGroupStore::new(&config.group_store),
        &config,
    ));
    let func = service_fn(move |event: LambdaEvent<EngineRequest>| {
        let finder = Arc::clone(&finder);
        async move { handler(&finder, event).await }
    });
    lambda_runtime::run(func).await
}
