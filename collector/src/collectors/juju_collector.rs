use crate::{
    bundle::{
        is_offer_fragment,
        parse_bundle,
        EMPTY_BUNDLE,
    },
    collectors::Collector,
    controller::{
        ControllerApi,
        ModelApi,
    },
    document::{
        Document,
        DocumentSender,
    },
    naming::{
        ArchiveKey,
        EntryKind,
        EntryName,
        RunTimestamp,
    },
    CollectionError,
};
use inventory_collector_config::Settings;
use std::{
    future::Future,
    pin::Pin,
};

/// Archives the status and bundle of every model on a Juju controller, one archive per model.
///
/// The collector borrows the controller connection for the run but never closes it; whoever
/// connected takes it back with [`JujuCollector::into_controller`].
pub struct JujuCollector<C> {
    controller: C,
    settings: Settings,
}

impl<C: ControllerApi> JujuCollector<C> {
    pub fn new(controller: C, settings: Settings) -> Self {
        Self { controller, settings }
    }

    pub fn into_controller(self) -> C {
        self.controller
    }
}

impl<C: ControllerApi> Collector for JujuCollector<C> {
    fn collect<'a>(
        &'a mut self,
        timestamp: &'a RunTimestamp,
        documents: &'a DocumentSender,
    ) -> Pin<Box<dyn Future<Output = Result<(), CollectionError>> + Send + 'a>> {
        Box::pin(async move {
            let models = self.controller.list_models().await?;
            info!(count = models.len(), "Collecting Juju models");

            for summary in &models {
                let mut model = self.controller.model(summary).await?;
                let collected = collect_model(&self.settings, &mut model, &summary.name, timestamp, documents).await;
                let released = model.disconnect().await;

                if let Err(err) = collected {
                    if let Err(release_err) = released {
                        warn!(model = %summary.name, error = %release_err, "Failed to disconnect from model");
                    }
                    return Err(err);
                }
                released?;
                info!(model = %summary.name, "Collected Juju model");
            }
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "JujuCollector"
    }
}

async fn collect_model<M: ModelApi>(
    settings: &Settings,
    model: &mut M,
    name: &str,
    timestamp: &RunTimestamp,
    documents: &DocumentSender,
) -> Result<(), CollectionError> {
    let archive = ArchiveKey::for_model(settings, name, timestamp);

    let status = model.status().await?;
    let status_entry = EntryName::new(EntryKind::JujuStatus, name, timestamp);
    documents
        .send(Document::new(archive.clone(), status_entry, serde_json::to_string(&status)?))
        .await?;

    let export = match model.export_bundle().await {
        Ok(export) => export,
        Err(err) if err.is_nothing_to_export() => {
            debug!(model = name, "Model has no applications, archiving an empty bundle");
            EMPTY_BUNDLE.to_string()
        }
        Err(err) => return Err(err.into()),
    };

    let bundle_entry = EntryName::new(EntryKind::JujuBundle, name, timestamp);
    let bundles = parse_bundle(&export).map_err(|source| CollectionError::BundleParse {
        model: name.to_string(),
        source,
    })?;
    for bundle in bundles {
        if is_offer_fragment(&bundle) {
            debug!(model = name, "Skipping cross-model relation offers");
            continue;
        }
        documents
            .send(Document::new(archive.clone(), bundle_entry.clone(), bundle))
            .await?;
    }
    Ok(())
}
