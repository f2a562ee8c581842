//! Version 1 of the dedicated storage REST API.
//!
//! [`Invoker`] lists every endpoint the service exposes. [`Client`] implements
//! it over HTTP using a [`saclient::Client`] handle; the operation facades in
//! this crate are generic over the trait so any implementation can stand in
//! for the network.

mod error;
mod types;

use std::future::Future;
use std::pin::Pin;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::saclient;

pub use error::{ErrorResponse, ErrorStatusCode, InvokeError};
pub use types::{
    Contract, ContractListResponse, ContractPatch, ContractResponse, ContractSpec,
    CreateContractRequest, CreateSnapshotRequest, ExpandDiskRequest, Plan, PlanListResponse,
    PlanResponse, PoolUsage, PoolUsageResponse, ResourceRef, Snapshot, SnapshotListResponse,
    SnapshotPatch, SnapshotResponse, SnapshotSpec, UpdateContractRequest, UpdateSnapshotRequest,
};

/// Future returned by [`Invoker`] methods.
pub type InvokeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, InvokeError>> + Send + 'a>>;

/// Every endpoint of the dedicated storage API.
pub trait Invoker: Send + Sync {
    /// `POST dedicatedstorage/contracts`
    fn dedicated_storage_contracts_create<'a>(
        &'a self,
        request: &'a CreateContractRequest,
    ) -> InvokeFuture<'a, ContractResponse>;

    /// `GET dedicatedstorage/contracts`
    fn dedicated_storage_contracts_list(&self) -> InvokeFuture<'_, ContractListResponse>;

    /// `GET dedicatedstorage/contracts/{id}`
    fn dedicated_storage_contracts_get(&self, id: i64) -> InvokeFuture<'_, ContractResponse>;

    /// `PUT dedicatedstorage/contracts/{id}`
    fn dedicated_storage_contracts_update<'a>(
        &'a self,
        id: i64,
        request: &'a UpdateContractRequest,
    ) -> InvokeFuture<'a, ContractResponse>;

    /// `DELETE dedicatedstorage/contracts/{id}`
    fn dedicated_storage_contracts_delete(&self, id: i64) -> InvokeFuture<'_, ()>;

    /// `GET dedicatedstorage/contracts/{id}/pool-usage`
    fn dedicated_storage_contracts_pool_usage(
        &self,
        id: i64,
    ) -> InvokeFuture<'_, PoolUsageResponse>;

    /// `GET dedicatedstorage/contracts/{contract_id}/snapshots`
    fn dedicated_storage_contracts_list_snapshots_by_contract(
        &self,
        contract_id: i64,
    ) -> InvokeFuture<'_, SnapshotListResponse>;

    /// `GET product/dedicatedstorage/plans`
    fn product_plans_list_plans(&self) -> InvokeFuture<'_, PlanListResponse>;

    /// `GET product/dedicatedstorage/plans/{id}`
    fn product_plans_get_plans(&self, id: i64) -> InvokeFuture<'_, PlanResponse>;

    /// `POST disk/{disk_id}/snapshots`
    fn disks_create_snapshot<'a>(
        &'a self,
        disk_id: i64,
        request: &'a CreateSnapshotRequest,
    ) -> InvokeFuture<'a, SnapshotResponse>;

    /// `GET disk/{disk_id}/snapshots`
    fn disks_list_snapshots(&self, disk_id: i64) -> InvokeFuture<'_, SnapshotListResponse>;

    /// `PUT disk/{disk_id}/snapshots/{snapshot_id}`
    fn disks_update_snapshot<'a>(
        &'a self,
        disk_id: i64,
        snapshot_id: i64,
        request: &'a UpdateSnapshotRequest,
    ) -> InvokeFuture<'a, SnapshotResponse>;

    /// `DELETE disk/{disk_id}/snapshots/{snapshot_id}`
    fn disks_delete_snapshot(&self, disk_id: i64, snapshot_id: i64) -> InvokeFuture<'_, ()>;

    /// `PUT disk/{disk_id}/snapshots/{snapshot_id}/restore`
    fn disks_restore_snapshot(&self, disk_id: i64, snapshot_id: i64) -> InvokeFuture<'_, ()>;

    /// `PUT disk/{disk_id}/expand`
    fn disks_expand<'a>(
        &'a self,
        disk_id: i64,
        request: &'a ExpandDiskRequest,
    ) -> InvokeFuture<'a, ()>;
}

/// HTTP implementation of [`Invoker`].
#[derive(Clone, Debug)]
pub struct Client {
    server_url: Url,
    http: saclient::Client,
}

impl Client {
    /// Binds a client to `root_url`. A missing trailing slash is added so
    /// endpoint paths resolve beneath the root rather than replacing its last
    /// segment.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] when `root_url` is not an absolute URL.
    pub fn new(root_url: &str, http: saclient::Client) -> Result<Self, url::ParseError> {
        let mut server_url = Url::parse(root_url)?;
        if !server_url.path().ends_with('/') {
            let path = format!("{}/", server_url.path());
            server_url.set_path(&path);
        }
        Ok(Self { server_url, http })
    }

    /// Root URL every endpoint is resolved against.
    #[must_use]
    pub const fn server_url(&self) -> &Url {
        &self.server_url
    }

    /// HTTP handle used for requests.
    #[must_use]
    pub const fn http(&self) -> &saclient::Client {
        &self.http
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, InvokeError> {
        let url = self.server_url.join(path)?;
        trace!(%method, %url, "building request");
        Ok(self.http.request(method, url))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>, InvokeError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if status.is_success() {
            return Ok(body.to_vec());
        }
        Err(error::error_from_body(status.as_u16(), &body))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, InvokeError> {
        let body = self.execute(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_unit(&self, request: RequestBuilder) -> Result<(), InvokeError> {
        self.execute(request).await.map(|_| ())
    }
}

const CONTRACTS: &str = "dedicatedstorage/contracts";
const PLANS: &str = "product/dedicatedstorage/plans";

fn contract_path(id: i64) -> String {
    format!("{CONTRACTS}/{id}")
}

fn snapshots_path(disk_id: i64) -> String {
    format!("disk/{disk_id}/snapshots")
}

fn snapshot_path(disk_id: i64, snapshot_id: i64) -> String {
    format!("disk/{disk_id}/snapshots/{snapshot_id}")
}

impl Invoker for Client {
    fn dedicated_storage_contracts_create<'a>(
        &'a self,
        request: &'a CreateContractRequest,
    ) -> InvokeFuture<'a, ContractResponse> {
        Box::pin(async move {
            let builder = self.request(Method::POST, CONTRACTS)?.json(request);
            self.fetch(builder).await
        })
    }

    fn dedicated_storage_contracts_list(&self) -> InvokeFuture<'_, ContractListResponse> {
        Box::pin(async move { self.fetch(self.request(Method::GET, CONTRACTS)?).await })
    }

    fn dedicated_storage_contracts_get(&self, id: i64) -> InvokeFuture<'_, ContractResponse> {
        Box::pin(async move {
            self.fetch(self.request(Method::GET, &contract_path(id))?)
                .await
        })
    }

    fn dedicated_storage_contracts_update<'a>(
        &'a self,
        id: i64,
        request: &'a UpdateContractRequest,
    ) -> InvokeFuture<'a, ContractResponse> {
        Box::pin(async move {
            let builder = self
                .request(Method::PUT, &contract_path(id))?
                .json(request);
            self.fetch(builder).await
        })
    }

    fn dedicated_storage_contracts_delete(&self, id: i64) -> InvokeFuture<'_, ()> {
        Box::pin(async move {
            self.fetch_unit(self.request(Method::DELETE, &contract_path(id))?)
                .await
        })
    }

    fn dedicated_storage_contracts_pool_usage(
        &self,
        id: i64,
    ) -> InvokeFuture<'_, PoolUsageResponse> {
        Box::pin(async move {
            let path = format!("{}/pool-usage", contract_path(id));
            self.fetch(self.request(Method::GET, &path)?).await
        })
    }

    fn dedicated_storage_contracts_list_snapshots_by_contract(
        &self,
        contract_id: i64,
    ) -> InvokeFuture<'_, SnapshotListResponse> {
        Box::pin(async move {
            let path = format!("{}/snapshots", contract_path(contract_id));
            self.fetch(self.request(Method::GET, &path)?).await
        })
    }

    fn product_plans_list_plans(&self) -> InvokeFuture<'_, PlanListResponse> {
        Box::pin(async move { self.fetch(self.request(Method::GET, PLANS)?).await })
    }

    fn product_plans_get_plans(&self, id: i64) -> InvokeFuture<'_, PlanResponse> {
        Box::pin(async move {
            let path = format!("{PLANS}/{id}");
            self.fetch(self.request(Method::GET, &path)?).await
        })
    }

    fn disks_create_snapshot<'a>(
        &'a self,
        disk_id: i64,
        request: &'a CreateSnapshotRequest,
    ) -> InvokeFuture<'a, SnapshotResponse> {
        Box::pin(async move {
            let builder = self
                .request(Method::POST, &snapshots_path(disk_id))?
                .json(request);
            self.fetch(builder).await
        })
    }

    fn disks_list_snapshots(&self, disk_id: i64) -> InvokeFuture<'_, SnapshotListResponse> {
        Box::pin(async move {
            self.fetch(self.request(Method::GET, &snapshots_path(disk_id))?)
                .await
        })
    }

    fn disks_update_snapshot<'a>(
        &'a self,
        disk_id: i64,
        snapshot_id: i64,
        request: &'a UpdateSnapshotRequest,
    ) -> InvokeFuture<'a, SnapshotResponse> {
        Box::pin(async move {
            let builder = self
                .request(Method::PUT, &snapshot_path(disk_id, snapshot_id))?
                .json(request);
            self.fetch(builder).await
        })
    }

    fn disks_delete_snapshot(&self, disk_id: i64, snapshot_id: i64) -> InvokeFuture<'_, ()> {
        Box::pin(async move {
            let path = snapshot_path(disk_id, snapshot_id);
            self.fetch_unit(self.request(Method::DELETE, &path)?).await
        })
    }

    fn disks_restore_snapshot(&self, disk_id: i64, snapshot_id: i64) -> InvokeFuture<'_, ()> {
        Box::pin(async move {
            let path = format!("{}/restore", snapshot_path(disk_id, snapshot_id));
            self.fetch_unit(self.request(Method::PUT, &path)?).await
        })
    }

    fn disks_expand<'a>(
        &'a self,
        disk_id: i64,
        request: &'a ExpandDiskRequest,
    ) -> InvokeFuture<'a, ()> {
        Box::pin(async move {
            let path = format!("disk/{disk_id}/expand");
            let builder = self.request(Method::PUT, &path)?.json(request);
            self.fetch_unit(builder).await
        })
    }
}
