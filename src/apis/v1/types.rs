//! Request and response schemas for the v1 dedicated storage API.
//!
//! Member names follow the provider's PascalCase JSON. Resource identifiers
//! are accepted either as JSON numbers or as decimal strings.

use serde::{Deserialize, Serialize};

pub(crate) mod flexible_id {
    use serde::{Deserialize, Deserializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawId::deserialize(deserializer)? {
            RawId::Number(value) => Ok(value),
            RawId::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| de::Error::custom(format!("invalid resource id '{text}'"))),
        }
    }
}

/// Reference to another resource by identifier.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ResourceRef {
    /// Identifier of the referenced resource.
    #[serde(rename = "ID", deserialize_with = "flexible_id::deserialize")]
    pub id: i64,
}

impl ResourceRef {
    /// Builds a reference to the resource with the given identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self { id }
    }
}

/// A provisioned dedicated storage allocation.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Contract {
    /// Contract identifier.
    #[serde(rename = "ID", deserialize_with = "flexible_id::deserialize")]
    pub id: i64,
    /// Display name.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Free-form description.
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Tags attached to the contract.
    #[serde(rename = "Tags", default)]
    pub tags: Vec<String>,
    /// Icon attached to the contract, if any.
    #[serde(rename = "Icon", default)]
    pub icon: Option<ResourceRef>,
    /// Plan the contract was purchased under.
    #[serde(rename = "Plan", default)]
    pub plan: Option<ResourceRef>,
    /// Lifecycle state reported by the service (for example `available`).
    #[serde(rename = "Availability", default)]
    pub availability: Option<String>,
    /// Creation timestamp as reported by the service.
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<String>,
}

/// Catalog entry describing a purchasable storage tier.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Plan {
    /// Plan identifier.
    #[serde(rename = "ID", deserialize_with = "flexible_id::deserialize")]
    pub id: i64,
    /// Display name.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Free-form description.
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Whether the plan can currently be purchased.
    #[serde(rename = "Availability", default)]
    pub availability: Option<String>,
    /// Capacity offered by the plan in GiB.
    #[serde(rename = "SizeGB", default)]
    pub size_gb: Option<u64>,
}

/// Point-in-time capture of a disk.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    /// Snapshot identifier.
    #[serde(rename = "ID", deserialize_with = "flexible_id::deserialize")]
    pub id: i64,
    /// Display name.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Free-form description.
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Contract whose pool stores the snapshot.
    #[serde(rename = "DedicatedStorageContract", default)]
    pub contract: Option<ResourceRef>,
    /// Lifecycle state reported by the service.
    #[serde(rename = "Availability", default)]
    pub availability: Option<String>,
    /// Size of the captured data in MiB.
    #[serde(rename = "SizeMB", default)]
    pub size_mb: Option<u64>,
    /// Creation timestamp as reported by the service.
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<String>,
}

/// Capacity statistics for one contract's storage pool, in MiB.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PoolUsage {
    /// Total capacity of the pool.
    #[serde(rename = "TotalSizeMB", default)]
    pub total_size_mb: u64,
    /// Capacity allocated to disks.
    #[serde(rename = "AllocatedSizeMB", default)]
    pub allocated_size_mb: u64,
    /// Capacity holding written data.
    #[serde(rename = "UsedSizeMB", default)]
    pub used_size_mb: u64,
    /// Capacity consumed by snapshots.
    #[serde(rename = "SnapshotSizeMB", default)]
    pub snapshot_size_mb: u64,
}

/// Envelope returned when a single contract is created, read or updated.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContractResponse {
    /// The contract.
    #[serde(rename = "DedicatedStorageContract")]
    pub contract: Contract,
}

/// One page of contracts.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContractListResponse {
    /// Offset of the first item.
    #[serde(rename = "From", default)]
    pub from: u64,
    /// Number of items in this page.
    #[serde(rename = "Count", default)]
    pub count: u64,
    /// Number of items across all pages.
    #[serde(rename = "Total", default)]
    pub total: u64,
    /// The contracts.
    #[serde(rename = "DedicatedStorageContracts", default)]
    pub contracts: Vec<Contract>,
}

impl ContractListResponse {
    /// Returns the contract with the given identifier, if listed.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<&Contract> {
        self.contracts.iter().find(|contract| contract.id == id)
    }
}

/// Envelope returned when a single plan is read.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlanResponse {
    /// The plan.
    #[serde(rename = "DedicatedStorageContractPlan")]
    pub plan: Plan,
}

/// The plan catalog.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlanListResponse {
    /// Offset of the first item.
    #[serde(rename = "From", default)]
    pub from: u64,
    /// Number of items in this page.
    #[serde(rename = "Count", default)]
    pub count: u64,
    /// Number of items across all pages.
    #[serde(rename = "Total", default)]
    pub total: u64,
    /// The plans.
    #[serde(rename = "DedicatedStorageContractPlans", default)]
    pub plans: Vec<Plan>,
}

/// Envelope returned for a contract's pool usage.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PoolUsageResponse {
    /// The usage statistics.
    #[serde(rename = "PoolUsage")]
    pub pool_usage: PoolUsage,
}

/// Envelope returned when a single snapshot is created or updated.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SnapshotResponse {
    /// The snapshot.
    #[serde(rename = "DiskSnapshot")]
    pub snapshot: Snapshot,
}

/// One page of snapshots, scoped either to a disk or to a contract.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SnapshotListResponse {
    /// Offset of the first item.
    #[serde(rename = "From", default)]
    pub from: u64,
    /// Number of items in this page.
    #[serde(rename = "Count", default)]
    pub count: u64,
    /// Number of items across all pages.
    #[serde(rename = "Total", default)]
    pub total: u64,
    /// The snapshots.
    #[serde(rename = "DiskSnapshots", default)]
    pub snapshots: Vec<Snapshot>,
}

impl SnapshotListResponse {
    /// Returns the snapshot with the given identifier, if listed.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<&Snapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }
}

/// Body of a contract creation request.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CreateContractRequest {
    /// Attributes of the contract to create.
    #[serde(rename = "DedicatedStorageContract")]
    pub contract: ContractSpec,
}

impl CreateContractRequest {
    /// Wraps contract attributes in a request body.
    #[must_use]
    pub const fn new(contract: ContractSpec) -> Self {
        Self { contract }
    }
}

/// Attributes supplied when creating a contract.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContractSpec {
    /// Plan to purchase.
    #[serde(rename = "Plan")]
    pub plan: ResourceRef,
    /// Display name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Free-form description.
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Tags to attach.
    #[serde(rename = "Tags", default)]
    pub tags: Vec<String>,
    /// Icon to attach.
    #[serde(rename = "Icon", default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<ResourceRef>,
}

impl ContractSpec {
    /// Starts attributes for the given plan and name.
    #[must_use]
    pub fn new(plan_id: i64, name: impl Into<String>) -> Self {
        Self {
            plan: ResourceRef::new(plan_id),
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            icon: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = value.into();
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn tags<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = values.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches an icon.
    #[must_use]
    pub const fn icon(mut self, icon_id: i64) -> Self {
        self.icon = Some(ResourceRef::new(icon_id));
        self
    }
}

/// Body of a contract update request.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct UpdateContractRequest {
    /// Fields to change.
    #[serde(rename = "DedicatedStorageContract")]
    pub contract: ContractPatch,
}

impl UpdateContractRequest {
    /// Wraps a patch in a request body.
    #[must_use]
    pub const fn new(contract: ContractPatch) -> Self {
        Self { contract }
    }
}

/// Partial update of a contract. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContractPatch {
    /// New display name.
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(
        rename = "Description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    /// Replacement tag set.
    #[serde(rename = "Tags", default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// `Some(None)` clears the icon; `None` leaves it unchanged.
    #[serde(
        rename = "Icon",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize"
    )]
    pub icon: Option<Option<ResourceRef>>,
}

impl ContractPatch {
    /// Starts an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name.
    #[must_use]
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    /// Replaces the tag set.
    #[must_use]
    pub fn tags<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Attaches an icon.
    #[must_use]
    pub const fn icon(mut self, icon_id: i64) -> Self {
        self.icon = Some(Some(ResourceRef::new(icon_id)));
        self
    }

    /// Removes the icon.
    #[must_use]
    pub const fn clear_icon(mut self) -> Self {
        self.icon = Some(None);
        self
    }
}

mod nullable {
    use serde::{Deserialize, Deserializer};

    // Present-but-null must decode as `Some(None)`.
    pub(super) fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Body of a snapshot creation request.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CreateSnapshotRequest {
    /// Attributes of the snapshot to create.
    #[serde(rename = "DiskSnapshot")]
    pub snapshot: SnapshotSpec,
}

impl CreateSnapshotRequest {
    /// Wraps snapshot attributes in a request body.
    #[must_use]
    pub const fn new(snapshot: SnapshotSpec) -> Self {
        Self { snapshot }
    }
}

/// Attributes supplied when creating a snapshot.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SnapshotSpec {
    /// Contract whose pool will hold the snapshot.
    #[serde(rename = "DedicatedStorageContract")]
    pub contract: ResourceRef,
    /// Display name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Free-form description.
    #[serde(rename = "Description", default)]
    pub description: String,
}

impl SnapshotSpec {
    /// Starts attributes for a snapshot stored under `contract_id`.
    #[must_use]
    pub fn new(contract_id: i64, name: impl Into<String>) -> Self {
        Self {
            contract: ResourceRef::new(contract_id),
            name: name.into(),
            description: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = value.into();
        self
    }
}

/// Body of a snapshot update request.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct UpdateSnapshotRequest {
    /// Fields to change.
    #[serde(rename = "DiskSnapshot")]
    pub snapshot: SnapshotPatch,
}

impl UpdateSnapshotRequest {
    /// Wraps a patch in a request body.
    #[must_use]
    pub const fn new(snapshot: SnapshotPatch) -> Self {
        Self { snapshot }
    }
}

/// Partial update of a snapshot. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SnapshotPatch {
    /// New display name.
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(
        rename = "Description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl SnapshotPatch {
    /// Starts an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name.
    #[must_use]
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }
}

/// Body of a disk expansion request.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ExpandDiskRequest {
    /// Target disk size in MiB. The member name is the service's spelling.
    #[serde(rename = "ExpanedSizeMB")]
    pub expanded_size_mb: u64,
}

impl ExpandDiskRequest {
    /// Requests expansion to `size_mb` MiB.
    #[must_use]
    pub const fn new(size_mb: u64) -> Self {
        Self {
            expanded_size_mb: size_mb,
        }
    }

    /// Requests expansion to `size_gib` GiB, or `None` when the size does not
    /// fit in MiB.
    #[must_use]
    pub const fn gib(size_gib: u64) -> Option<Self> {
        match size_gib.checked_mul(1024) {
            Some(size_mb) => Some(Self::new(size_mb)),
            None => None,
        }
    }
}
