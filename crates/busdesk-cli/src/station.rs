//! `station submit`: drive the station wizard from a JSON draft.

use std::path::{Path, PathBuf};

use anyhow::Context;
use busdesk_api::ApiClient;
use busdesk_core::{AppConfig, PendingFile, StationDraft, StationPatch};
use busdesk_wizard::{ContinueOutcome, GateContext, StationWizard, WizardStep};

pub(crate) fn load_draft(path: &Path) -> anyhow::Result<StationDraft> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid station draft in {}", path.display()))
}

pub(crate) async fn run_station_submit(
    config: &AppConfig,
    draft_path: &Path,
    images: &[PathBuf],
) -> anyhow::Result<()> {
    let draft = load_draft(draft_path)?;
    let manager_email = draft.manager_email.clone();

    let client = ApiClient::from_config(config)?;
    let ctx = GateContext {
        max_image_bytes: config.max_image_bytes,
    };
    let mut wizard = StationWizard::new(client, ctx);
    wizard.store_mut().set_draft(draft);
    for path in images {
        let image = PendingFile::from_path(path)?;
        wizard.store_mut().add_image(image);
    }

    loop {
        match wizard.handle_continue().await {
            ContinueOutcome::Advanced(step) => {
                tracing::debug!(step = step.label(), "station wizard advanced");
            }
            ContinueOutcome::Blocked { message, .. } => {
                anyhow::bail!(
                    "cannot continue at {}: {message}",
                    wizard.current_step().label()
                );
            }
            ContinueOutcome::Busy => anyhow::bail!("a request is already in flight"),
            ContinueOutcome::Failed { message } => anyhow::bail!(message),
            ContinueOutcome::Submitted {
                receipt,
                next,
                landing,
            } => {
                println!(
                    "station created{}",
                    receipt
                        .entity_id
                        .as_deref()
                        .map(|id| format!(" ({id})"))
                        .unwrap_or_default()
                );
                if next.is_none() || manager_email.is_none() {
                    println!("next: {}", landing.route());
                    return Ok(());
                }
                wizard.store_mut().update_form_data(StationPatch {
                    manager_email: manager_email.clone(),
                    ..StationPatch::default()
                });
            }
            ContinueOutcome::Finished { landing } => {
                println!("manager assigned");
                println!("next: {}", landing.route());
                return Ok(());
            }
        }
    }
}
