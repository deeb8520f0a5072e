//! `agency` command handlers.

use busdesk_api::{AgencyProfileStore, ApiClient, FileProfileCache};
use busdesk_core::AppConfig;
use busdesk_wizard::projector;

async fn refreshed_store(
    config: &AppConfig,
    client: &ApiClient,
) -> anyhow::Result<AgencyProfileStore<FileProfileCache>> {
    let mut store = AgencyProfileStore::mount(FileProfileCache::new(&config.cache_dir));
    store
        .refresh(client)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    Ok(store)
}

pub(crate) async fn run_agency_status(config: &AppConfig) -> anyhow::Result<()> {
    let client = ApiClient::from_config(config)?;
    let store = refreshed_store(config, &client).await?;

    if let Some(profile) = store.profile() {
        println!("{} ({})", profile.name, profile.id);
    }
    for (key, requirement) in projector::ordered(store.status()) {
        match &requirement.reason {
            Some(reason) => println!("  {key:<14} {}  ({reason})", requirement.status),
            None => println!("  {key:<14} {}", requirement.status),
        }
    }

    let projection = store.projection();
    println!("publishable: {}", projection.publishable);
    println!("next: {}", projection.landing.route());
    Ok(())
}

pub(crate) async fn run_agency_publish(config: &AppConfig) -> anyhow::Result<()> {
    let client = ApiClient::from_config(config)?;
    let store = refreshed_store(config, &client).await?;
    let projection = store.projection();

    let Some(profile) = store.profile() else {
        anyhow::bail!("no agency profile available");
    };
    if !projection.publishable {
        println!(
            "{} is not ready to publish; continue at {}",
            profile.name,
            projection.landing.route()
        );
        return Ok(());
    }

    client
        .publish_agency(&profile.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    println!("{} published", profile.name);
    Ok(())
}
