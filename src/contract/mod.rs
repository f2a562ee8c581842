//! Operations on dedicated storage contracts and the plan catalog.

use crate::apis::v1::{
    self, Contract, ContractListResponse, CreateContractRequest, Invoker, Plan, PlanListResponse,
    PoolUsage, SnapshotListResponse, UpdateContractRequest,
};
use crate::error::{ApiFuture, call};

/// Contract lifecycle, pool statistics and plan lookups.
pub trait ContractApi {
    /// Purchases a new contract.
    fn create<'a>(&'a self, request: &'a CreateContractRequest) -> ApiFuture<'a, Contract>;

    /// Lists contracts visible to the caller.
    fn list(&self) -> ApiFuture<'_, ContractListResponse>;

    /// Reads one contract.
    fn read(&self, id: i64) -> ApiFuture<'_, Contract>;

    /// Changes a contract's name, description, tags or icon.
    fn update<'a>(&'a self, id: i64, request: &'a UpdateContractRequest)
    -> ApiFuture<'a, Contract>;

    /// Cancels a contract.
    fn delete(&self, id: i64) -> ApiFuture<'_, ()>;

    /// Reports capacity statistics for a contract's pool.
    fn pool_usage(&self, id: i64) -> ApiFuture<'_, PoolUsage>;

    /// Lists snapshots stored in a contract's pool across all of its disks.
    fn list_disk_snapshots(&self, id: i64) -> ApiFuture<'_, SnapshotListResponse>;

    /// Lists purchasable plans.
    fn list_plans(&self) -> ApiFuture<'_, PlanListResponse>;

    /// Reads one plan.
    fn read_plan(&self, plan_id: i64) -> ApiFuture<'_, Plan>;
}

/// [`ContractApi`] over any [`Invoker`].
#[derive(Clone, Debug)]
pub struct ContractOp<I = v1::Client> {
    client: I,
}

impl<I: Invoker> ContractOp<I> {
    /// Wraps `client`.
    #[must_use]
    pub const fn new(client: I) -> Self {
        Self { client }
    }
}

impl<I: Invoker> ContractApi for ContractOp<I> {
    fn create<'a>(&'a self, request: &'a CreateContractRequest) -> ApiFuture<'a, Contract> {
        Box::pin(async move {
            let response = call(
                "Contract.Create",
                self.client.dedicated_storage_contracts_create(request),
            )
            .await?;
            Ok(response.contract)
        })
    }

    fn list(&self) -> ApiFuture<'_, ContractListResponse> {
        Box::pin(call(
            "Contract.List",
            self.client.dedicated_storage_contracts_list(),
        ))
    }

    fn read(&self, id: i64) -> ApiFuture<'_, Contract> {
        Box::pin(async move {
            let response = call(
                "Contract.Read",
                self.client.dedicated_storage_contracts_get(id),
            )
            .await?;
            Ok(response.contract)
        })
    }

    fn update<'a>(
        &'a self,
        id: i64,
        request: &'a UpdateContractRequest,
    ) -> ApiFuture<'a, Contract> {
        Box::pin(async move {
            let response = call(
                "Contract.Update",
                self.client.dedicated_storage_contracts_update(id, request),
            )
            .await?;
            Ok(response.contract)
        })
    }

    fn delete(&self, id: i64) -> ApiFuture<'_, ()> {
        Box::pin(call(
            "Contract.Delete",
            self.client.dedicated_storage_contracts_delete(id),
        ))
    }

    fn pool_usage(&self, id: i64) -> ApiFuture<'_, PoolUsage> {
        Box::pin(async move {
            let response = call(
                "Contract.PoolUsage",
                self.client.dedicated_storage_contracts_pool_usage(id),
            )
            .await?;
            Ok(response.pool_usage)
        })
    }

    fn list_disk_snapshots(&self, id: i64) -> ApiFuture<'_, SnapshotListResponse> {
        Box::pin(call(
            "Contract.DiskSnapshots",
            self.client
                .dedicated_storage_contracts_list_snapshots_by_contract(id),
        ))
    }

    fn list_plans(&self) -> ApiFuture<'_, PlanListResponse> {
        Box::pin(call(
            "Contract.ListPlans",
            self.client.product_plans_list_plans(),
        ))
    }

    fn read_plan(&self, plan_id: i64) -> ApiFuture<'_, Plan> {
        Box::pin(async move {
            let response = call(
                "Contract.ReadPlan",
                self.client.product_plans_get_plans(plan_id),
            )
            .await?;
            Ok(response.plan)
        })
    }
}
