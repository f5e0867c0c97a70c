use crate::Args;
use color_eyre::Result;
use eyre::WrapErr;
use inventory_collector_config::{
    Config,
    JujuController,
};
use inventory_collector_core::Orchestrator;
use inventory_collector_juju::{
    ConnectOptions,
    Controller,
};

pub struct App {
    args: Args,
}

impl App {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    pub async fn run(self) -> Result<()> {
        let config = Config::load(&self.args.config).wrap_err("Failed to load config")?;

        let controller = Controller::connect(connect_options(&config.juju_controller))
            .await
            .wrap_err("Failed to connect to juju controller")?;

        if self.args.dry_run {
            controller
                .disconnect()
                .await
                .wrap_err("Failed to disconnect from juju controller")?;
            println!("OK.");
            return Ok(());
        }

        let summary = Orchestrator::new(&config, controller)
            .run()
            .await
            .wrap_err("Failed to collect data")?;
        info!(
            archives = summary.archive_count(),
            entries = summary.entry_count(),
            collection_path = %config.settings.collection_path.display(),
            "Inventory collected"
        );
        Ok(())
    }
}

fn connect_options(controller: &JujuController) -> ConnectOptions {
    ConnectOptions {
        endpoint: controller.endpoint.clone(),
        username: controller.username.clone(),
        password: controller.password.clone(),
        ca_cert: controller.ca_cert.clone(),
    }
}
