//! Binary entry point for the `dedicated-storage` CLI.

mod cli;

use std::io::{self, Write};
use std::process;

use clap::Parser;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dedicated_storage::apis::v1::{
    ContractPatch, ContractSpec, CreateContractRequest, CreateSnapshotRequest, ExpandDiskRequest,
    ResourceRef, SnapshotPatch, SnapshotSpec, UpdateContractRequest, UpdateSnapshotRequest,
};
use dedicated_storage::{
    ApiError, ClientError, ConfigError, ContractApi, ContractOp, DiskApi, DiskOp, SakuraConfig,
    new_client_with_api_root_url, saclient,
};

use cli::{
    Cli, Command, ContractCommand, CreateContractArgs, CreateSnapshotArgs, DiskCommand,
    SnapshotCommand, UpdateContractArgs, UpdateSnapshotArgs,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("HTTP client error: {0}")]
    Http(#[from] saclient::ClientError),
    #[error("API client error: {0}")]
    Client(#[from] ClientError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Result of a subcommand: a value to print, or nothing for operations the
/// service acknowledges without a body.
type Output = Option<Value>;

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.api_root_url)?;
    let http = saclient::Client::from_config(&config)?;
    let client = new_client_with_api_root_url(&http, &config.api_root_url)?;
    debug!(root = %client.server_url(), "dispatching command");

    let output = match cli.command {
        Command::Plans(args) => run_plans(&ContractOp::new(client), args.id).await?,
        Command::Contract(command) => run_contract(&ContractOp::new(client), command).await?,
        Command::Snapshot(command) => run_snapshot(&DiskOp::new(client), command).await?,
        Command::Disk(command) => run_disk(&DiskOp::new(client), command).await?,
    };

    match output {
        Some(value) => write_json(io::stdout().lock(), &value),
        None => Ok(()),
    }
}

fn load_config(api_root_url: Option<String>) -> Result<SakuraConfig, CliError> {
    let mut config = SakuraConfig::load_without_cli_args()?;
    if let Some(url) = api_root_url {
        config.api_root_url = url;
    }
    config.validate()?;
    Ok(config)
}

async fn run_plans(api: &impl ContractApi, plan_id: Option<i64>) -> Result<Output, CliError> {
    let value = match plan_id {
        Some(id) => serde_json::to_value(api.read_plan(id).await?)?,
        None => serde_json::to_value(api.list_plans().await?)?,
    };
    Ok(Some(value))
}

async fn run_contract(api: &impl ContractApi, command: ContractCommand) -> Result<Output, CliError> {
    let value = match command {
        ContractCommand::List => serde_json::to_value(api.list().await?)?,
        ContractCommand::Read { id } => serde_json::to_value(api.read(id).await?)?,
        ContractCommand::Create(args) => {
            let request = create_contract_request(args);
            serde_json::to_value(api.create(&request).await?)?
        }
        ContractCommand::Update(args) => {
            let id = args.id;
            let request = update_contract_request(args);
            serde_json::to_value(api.update(id, &request).await?)?
        }
        ContractCommand::Delete { id } => {
            api.delete(id).await?;
            return Ok(None);
        }
        ContractCommand::PoolUsage { id } => serde_json::to_value(api.pool_usage(id).await?)?,
        ContractCommand::Snapshots { id } => {
            serde_json::to_value(api.list_disk_snapshots(id).await?)?
        }
    };
    Ok(Some(value))
}

async fn run_snapshot(api: &impl DiskApi, command: SnapshotCommand) -> Result<Output, CliError> {
    let value = match command {
        SnapshotCommand::List { disk_id } => serde_json::to_value(api.list_snapshots(disk_id).await?)?,
        SnapshotCommand::Create(args) => {
            let disk_id = args.disk_id;
            let request = create_snapshot_request(args);
            serde_json::to_value(api.create_snapshot(disk_id, &request).await?)?
        }
        SnapshotCommand::Update(args) => {
            let (disk_id, snapshot_id) = (args.target.disk_id, args.target.snapshot_id);
            let request = update_snapshot_request(args);
            serde_json::to_value(api.update_snapshot(disk_id, snapshot_id, &request).await?)?
        }
        SnapshotCommand::Delete(target) => {
            api.delete_snapshot(target.disk_id, target.snapshot_id)
                .await?;
            return Ok(None);
        }
        SnapshotCommand::Restore(target) => {
            api.restore_from_snapshot(target.disk_id, target.snapshot_id)
                .await?;
            return Ok(None);
        }
    };
    Ok(Some(value))
}

async fn run_disk(api: &impl DiskApi, command: DiskCommand) -> Result<Output, CliError> {
    match command {
        DiskCommand::Expand { disk_id, size_mb } => {
            api.expand(disk_id, &ExpandDiskRequest::new(size_mb))
                .await?;
        }
    }
    Ok(None)
}

fn create_contract_request(args: CreateContractArgs) -> CreateContractRequest {
    let mut spec = ContractSpec::new(args.plan_id, args.name).tags(args.tags);
    if let Some(description) = args.description {
        spec = spec.description(description);
    }
    if let Some(icon_id) = args.icon_id {
        spec = spec.icon(icon_id);
    }
    CreateContractRequest::new(spec)
}

fn update_contract_request(args: UpdateContractArgs) -> UpdateContractRequest {
    let icon = if args.clear_icon {
        Some(None)
    } else {
        args.icon_id.map(|id| Some(ResourceRef::new(id)))
    };
    UpdateContractRequest::new(ContractPatch {
        name: args.name,
        description: args.description,
        tags: args.tags,
        icon,
    })
}

fn create_snapshot_request(args: CreateSnapshotArgs) -> CreateSnapshotRequest {
    let mut spec = SnapshotSpec::new(args.contract_id, args.name);
    if let Some(description) = args.description {
        spec = spec.description(description);
    }
    CreateSnapshotRequest::new(spec)
}

fn update_snapshot_request(args: UpdateSnapshotArgs) -> UpdateSnapshotRequest {
    UpdateSnapshotRequest::new(SnapshotPatch {
        name: args.name,
        description: args.description,
    })
}

fn write_json(mut target: impl Write, value: &Value) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut target, value)?;
    writeln!(target)?;
    Ok(())
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
