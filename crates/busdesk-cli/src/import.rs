//! `import` command handlers.

use std::path::Path;

use anyhow::Context;
use busdesk_api::ApiClient;
use busdesk_core::{AppConfig, PendingFile};
use busdesk_import::{validate_pending_file, FileValidation};

fn load_and_validate(path: &Path) -> anyhow::Result<(PendingFile, FileValidation)> {
    let file = PendingFile::from_path(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let validation = validate_pending_file(&file);
    Ok((file, validation))
}

fn ensure_valid(file: &PendingFile, validation: &FileValidation) -> anyhow::Result<()> {
    if let Some(error) = &validation.error {
        anyhow::bail!("{} rejected: {error}", file.file_name);
    }
    Ok(())
}

pub(crate) fn run_import_check(path: &Path) -> anyhow::Result<()> {
    let (file, validation) = load_and_validate(path)?;
    ensure_valid(&file, &validation)?;

    println!("{}: {} bus rows", file.file_name, validation.rows.len());
    for row in &validation.rows {
        println!(
            "  row {:>4}  {:<14} {:<10} {:>3} seats  station {}",
            row.row, row.plate_number, row.bus_type, row.capacity, row.base_station_id
        );
    }
    Ok(())
}

pub(crate) async fn run_import_upload(config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    let (file, validation) = load_and_validate(path)?;
    ensure_valid(&file, &validation)?;

    let client = ApiClient::from_config(config)?;
    let response = client
        .import_buses(&file)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    tracing::info!(file = %file.file_name, rows = validation.rows.len(), "bus import uploaded");
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
