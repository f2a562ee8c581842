//! Command-line interface definitions for the `dedicated-storage` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Args, Parser, Subcommand};

/// Top-level CLI for the `dedicated-storage` binary.
#[derive(Debug, Parser)]
#[command(
    name = "dedicated-storage",
    version,
    about = "Manage Sakura Cloud dedicated storage contracts and disk snapshots",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Override the zone API root URL from configuration.
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) api_root_url: Option<String>,
    /// Operation to perform.
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Resource groups exposed by the CLI.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List purchasable plans, or show one plan.
    #[command(name = "plans")]
    Plans(PlansCommand),
    /// Manage dedicated storage contracts.
    #[command(name = "contract", subcommand)]
    Contract(ContractCommand),
    /// Manage snapshots of a disk.
    #[command(name = "snapshot", subcommand)]
    Snapshot(SnapshotCommand),
    /// Change disk capacity.
    #[command(name = "disk", subcommand)]
    Disk(DiskCommand),
}

/// Arguments for `dedicated-storage plans`.
#[derive(Debug, Args)]
pub(crate) struct PlansCommand {
    /// Show only the plan with this ID.
    #[arg(long, value_name = "ID")]
    pub(crate) id: Option<i64>,
}

/// `dedicated-storage contract` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum ContractCommand {
    /// List contracts.
    List,
    /// Show one contract.
    Read {
        /// Contract ID.
        id: i64,
    },
    /// Purchase a contract.
    Create(CreateContractArgs),
    /// Change a contract's name, description, tags or icon.
    Update(UpdateContractArgs),
    /// Cancel a contract.
    Delete {
        /// Contract ID.
        id: i64,
    },
    /// Show capacity statistics for a contract's pool.
    PoolUsage {
        /// Contract ID.
        id: i64,
    },
    /// List snapshots stored in a contract's pool.
    Snapshots {
        /// Contract ID.
        id: i64,
    },
}

/// Arguments for `dedicated-storage contract create`.
#[derive(Debug, Args)]
pub(crate) struct CreateContractArgs {
    /// Plan to purchase.
    #[arg(long, value_name = "ID")]
    pub(crate) plan_id: i64,
    /// Contract name.
    #[arg(long)]
    pub(crate) name: String,
    /// Free-form description.
    #[arg(long)]
    pub(crate) description: Option<String>,
    /// Tag to attach; repeat for several tags.
    #[arg(long = "tag", value_name = "TAG")]
    pub(crate) tags: Vec<String>,
    /// Icon to attach.
    #[arg(long, value_name = "ID")]
    pub(crate) icon_id: Option<i64>,
}

/// Arguments for `dedicated-storage contract update`.
#[derive(Debug, Args)]
pub(crate) struct UpdateContractArgs {
    /// Contract ID.
    pub(crate) id: i64,
    /// New name.
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// New description.
    #[arg(long)]
    pub(crate) description: Option<String>,
    /// Replacement tag list; repeat for several tags.
    #[arg(long = "tag", value_name = "TAG")]
    pub(crate) tags: Option<Vec<String>>,
    /// New icon.
    #[arg(long, value_name = "ID", conflicts_with = "clear_icon")]
    pub(crate) icon_id: Option<i64>,
    /// Detach the current icon.
    #[arg(long)]
    pub(crate) clear_icon: bool,
}

/// `dedicated-storage snapshot` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum SnapshotCommand {
    /// List a disk's snapshots.
    List {
        /// Disk ID.
        disk_id: i64,
    },
    /// Snapshot a disk.
    Create(CreateSnapshotArgs),
    /// Rename or re-describe a snapshot.
    Update(UpdateSnapshotArgs),
    /// Delete a snapshot.
    Delete(SnapshotTarget),
    /// Roll a disk back to a snapshot.
    Restore(SnapshotTarget),
}

/// A snapshot of a specific disk.
#[derive(Debug, Args)]
pub(crate) struct SnapshotTarget {
    /// Disk ID.
    pub(crate) disk_id: i64,
    /// Snapshot ID.
    pub(crate) snapshot_id: i64,
}

/// Arguments for `dedicated-storage snapshot create`.
#[derive(Debug, Args)]
pub(crate) struct CreateSnapshotArgs {
    /// Disk ID.
    pub(crate) disk_id: i64,
    /// Contract whose pool stores the snapshot.
    #[arg(long, value_name = "ID")]
    pub(crate) contract_id: i64,
    /// Snapshot name.
    #[arg(long)]
    pub(crate) name: String,
    /// Free-form description.
    #[arg(long)]
    pub(crate) description: Option<String>,
}

/// Arguments for `dedicated-storage snapshot update`.
#[derive(Debug, Args)]
pub(crate) struct UpdateSnapshotArgs {
    /// Snapshot to change.
    #[command(flatten)]
    pub(crate) target: SnapshotTarget,
    /// New name.
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// New description.
    #[arg(long)]
    pub(crate) description: Option<String>,
}

/// `dedicated-storage disk` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum DiskCommand {
    /// Grow a disk.
    Expand {
        /// Disk ID.
        disk_id: i64,
        /// New size in mebibytes.
        #[arg(long, value_name = "MB")]
        size_mb: u64,
    },
}
