//! The seam between the collectors and a Juju controller.
//!
//! [`JujuCollector`](crate::JujuCollector) only talks to these traits, so it can be driven by the
//! real client in `inventory_collector_juju` or by an in-memory controller.

use inventory_collector_juju::{
    Controller,
    JujuError,
    Model,
    ModelSummary,
};
use serde_json::Value;
use std::{
    future::Future,
    pin::Pin,
};

pub trait ControllerApi: Send {
    type Model: ModelApi;

    /// Every model visible to the connected user, in the controller's order.
    fn list_models(&mut self) -> Pin<Box<dyn Future<Output = Result<Vec<ModelSummary>, JujuError>> + Send + '_>>;

    /// Opens a handle to one model. The caller releases it with [`ModelApi::disconnect`].
    fn model<'a>(
        &'a mut self,
        model: &'a ModelSummary,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Model, JujuError>> + Send + 'a>>;

    fn disconnect(self) -> Pin<Box<dyn Future<Output = Result<(), JujuError>> + Send>>;
}

pub trait ModelApi: Send {
    fn status(&mut self) -> Pin<Box<dyn Future<Output = Result<Value, JujuError>> + Send + '_>>;

    /// The raw bundle export, possibly holding several YAML documents.
    fn export_bundle(&mut self) -> Pin<Box<dyn Future<Output = Result<String, JujuError>> + Send + '_>>;

    fn disconnect(self) -> Pin<Box<dyn Future<Output = Result<(), JujuError>> + Send>>;
}

impl ControllerApi for Controller {
    type Model = Model;

    fn list_models(&mut self) -> Pin<Box<dyn Future<Output = Result<Vec<ModelSummary>, JujuError>> + Send + '_>> {
        Box::pin(Controller::list_models(self))
    }

    fn model<'a>(
        &'a mut self,
        model: &'a ModelSummary,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Model, JujuError>> + Send + 'a>> {
        Box::pin(Controller::model(self, model))
    }

    fn disconnect(self) -> Pin<Box<dyn Future<Output = Result<(), JujuError>> + Send>> {
        Box::pin(Controller::disconnect(self))
    }
}

impl ModelApi for Model {
    fn status(&mut self) -> Pin<Box<dyn Future<Output = Result<Value, JujuError>> + Send + '_>> {
        Box::pin(self.full_status())
    }

    fn export_bundle(&mut self) -> Pin<Box<dyn Future<Output = Result<String, JujuError>> + Send + '_>> {
        Box::pin(Model::export_bundle(self))
    }

    fn disconnect(self) -> Pin<Box<dyn Future<Output = Result<(), JujuError>> + Send>> {
        Box::pin(Model::disconnect(self))
    }
}
