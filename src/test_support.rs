//! Test support utilities shared across unit and integration tests.

use std::collections::{BTreeSet, VecDeque};
use std::env;
use std::ffi::OsString;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::MutexGuard;
use tokio::task::JoinHandle;

use crate::apis::v1::{
    ContractListResponse, ContractResponse, CreateContractRequest, CreateSnapshotRequest,
    ErrorStatusCode, ExpandDiskRequest, InvokeError, InvokeFuture, Invoker, PlanListResponse,
    PlanResponse, PoolUsageResponse, SnapshotListResponse, SnapshotResponse,
    UpdateContractRequest, UpdateSnapshotRequest,
};

/// Records a single call made through [`ScriptedInvoker`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Invocation {
    /// `dedicated_storage_contracts_create`
    CreateContract(CreateContractRequest),
    /// `dedicated_storage_contracts_list`
    ListContracts,
    /// `dedicated_storage_contracts_get`
    GetContract(i64),
    /// `dedicated_storage_contracts_update`
    UpdateContract(i64, UpdateContractRequest),
    /// `dedicated_storage_contracts_delete`
    DeleteContract(i64),
    /// `dedicated_storage_contracts_pool_usage`
    PoolUsage(i64),
    /// `dedicated_storage_contracts_list_snapshots_by_contract`
    ListContractSnapshots(i64),
    /// `product_plans_list_plans`
    ListPlans,
    /// `product_plans_get_plans`
    GetPlan(i64),
    /// `disks_create_snapshot`
    CreateSnapshot(i64, CreateSnapshotRequest),
    /// `disks_list_snapshots`
    ListSnapshots(i64),
    /// `disks_update_snapshot`
    UpdateSnapshot(i64, i64, UpdateSnapshotRequest),
    /// `disks_delete_snapshot`
    DeleteSnapshot(i64, i64),
    /// `disks_restore_snapshot`
    RestoreSnapshot(i64, i64),
    /// `disks_expand`
    ExpandDisk(i64, ExpandDiskRequest),
}

type Scripted = Result<serde_json::Value, InvokeError>;

/// Scripted [`Invoker`] that returns pre-seeded outcomes in FIFO order.
///
/// Successful outcomes are stored as JSON and decoded into whatever envelope
/// the called endpoint returns, so a mismatched payload surfaces as
/// [`InvokeError::Decode`]. An empty queue yields a 501 status error.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInvoker {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    invocations: Arc<Mutex<Vec<Invocation>>>,
}

impl ScriptedInvoker {
    /// Creates an invoker with no queued outcomes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all invocations recorded so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Queues a successful response body.
    pub fn push_json(&self, body: serde_json::Value) {
        self.push(Ok(body));
    }

    /// Queues a successful response for endpoints that return no body.
    pub fn push_empty(&self) {
        self.push(Ok(serde_json::Value::Null));
    }

    /// Queues a structured remote error.
    pub fn push_status(&self, status_code: u16, message: impl Into<String>) {
        self.push(Err(ErrorStatusCode::new(status_code, message).into()));
    }

    /// Queues an arbitrary failure.
    pub fn push_failure(&self, error: InvokeError) {
        self.push(Err(error));
    }

    fn push(&self, outcome: Scripted) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }

    fn next(&self, invocation: Invocation) -> Scripted {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation);
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(ErrorStatusCode::new(501, "no scripted response available").into())
            })
    }

    fn reply<T>(&self, invocation: Invocation) -> InvokeFuture<'_, T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let outcome = self
            .next(invocation)
            .and_then(|body| serde_json::from_value(body).map_err(InvokeError::from));
        Box::pin(async move { outcome })
    }

    fn reply_unit(&self, invocation: Invocation) -> InvokeFuture<'_, ()> {
        let outcome = self.next(invocation).map(|_| ());
        Box::pin(async move { outcome })
    }
}

impl Invoker for ScriptedInvoker {
    fn dedicated_storage_contracts_create<'a>(
        &'a self,
        request: &'a CreateContractRequest,
    ) -> InvokeFuture<'a, ContractResponse> {
        self.reply(Invocation::CreateContract(request.clone()))
    }

    fn dedicated_storage_contracts_list(&self) -> InvokeFuture<'_, ContractListResponse> {
        self.reply(Invocation::ListContracts)
    }

    fn dedicated_storage_contracts_get(&self, id: i64) -> InvokeFuture<'_, ContractResponse> {
        self.reply(Invocation::GetContract(id))
    }

    fn dedicated_storage_contracts_update<'a>(
        &'a self,
        id: i64,
        request: &'a UpdateContractRequest,
    ) -> InvokeFuture<'a, ContractResponse> {
        self.reply(Invocation::UpdateContract(id, request.clone()))
    }

    fn dedicated_storage_contracts_delete(&self, id: i64) -> InvokeFuture<'_, ()> {
        self.reply_unit(Invocation::DeleteContract(id))
    }

    fn dedicated_storage_contracts_pool_usage(
        &self,
        id: i64,
    ) -> InvokeFuture<'_, PoolUsageResponse> {
        self.reply(Invocation::PoolUsage(id))
    }

    fn dedicated_storage_contracts_list_snapshots_by_contract(
        &self,
        contract_id: i64,
    ) -> InvokeFuture<'_, SnapshotListResponse> {
        self.reply(Invocation::ListContractSnapshots(contract_id))
    }

    fn product_plans_list_plans(&self) -> InvokeFuture<'_, PlanListResponse> {
        self.reply(Invocation::ListPlans)
    }

    fn product_plans_get_plans(&self, id: i64) -> InvokeFuture<'_, PlanResponse> {
        self.reply(Invocation::GetPlan(id))
    }

    fn disks_create_snapshot<'a>(
        &'a self,
        disk_id: i64,
        request: &'a CreateSnapshotRequest,
    ) -> InvokeFuture<'a, SnapshotResponse> {
        self.reply(Invocation::CreateSnapshot(disk_id, request.clone()))
    }

    fn disks_list_snapshots(&self, disk_id: i64) -> InvokeFuture<'_, SnapshotListResponse> {
        self.reply(Invocation::ListSnapshots(disk_id))
    }

    fn disks_update_snapshot<'a>(
        &'a self,
        disk_id: i64,
        snapshot_id: i64,
        request: &'a UpdateSnapshotRequest,
    ) -> InvokeFuture<'a, SnapshotResponse> {
        self.reply(Invocation::UpdateSnapshot(
            disk_id,
            snapshot_id,
            request.clone(),
        ))
    }

    fn disks_delete_snapshot(&self, disk_id: i64, snapshot_id: i64) -> InvokeFuture<'_, ()> {
        self.reply_unit(Invocation::DeleteSnapshot(disk_id, snapshot_id))
    }

    fn disks_restore_snapshot(&self, disk_id: i64, snapshot_id: i64) -> InvokeFuture<'_, ()> {
        self.reply_unit(Invocation::RestoreSnapshot(disk_id, snapshot_id))
    }

    fn disks_expand<'a>(
        &'a self,
        disk_id: i64,
        request: &'a ExpandDiskRequest,
    ) -> InvokeFuture<'a, ()> {
        self.reply_unit(Invocation::ExpandDisk(disk_id, *request))
    }
}

/// Raw HTTP request captured by [`CannedServer`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CapturedRequest {
    /// Request method (for example `GET`).
    pub method: String,
    /// Request target including any query string.
    pub path: String,
    /// Header pairs with lower-cased names, in arrival order.
    pub headers: Vec<(String, String)>,
    /// Request body decoded as UTF-8.
    pub body: String,
}

impl CapturedRequest {
    /// Returns the first value of the named header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        let wanted = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == wanted)
            .map(|(_, value)| value.as_str())
    }
}

/// Loopback HTTP/1.1 server that answers exactly one request with a canned
/// response and hands the captured request back to the test.
#[derive(Debug)]
pub struct CannedServer {
    root_url: String,
    handle: JoinHandle<io::Result<CapturedRequest>>,
}

/// Path prefix served by [`CannedServer`], mirroring the real API root.
pub const CANNED_ROOT_PATH: &str = "/cloud/zone/tk1b/api/cloud/1.0/";

impl CannedServer {
    /// Binds an ephemeral port and answers the first request with `status`
    /// and a JSON `body`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the listener cannot be bound.
    pub async fn respond(status: u16, body: impl Into<String>) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let body = body.into();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await?;
            let request = read_request(&mut stream).await?;
            let response = format!(
                "HTTP/1.1 {status} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                reason_phrase(status),
                body.len()
            );
            stream.write_all(response.as_bytes()).await?;
            stream.shutdown().await?;
            Ok::<_, io::Error>(request)
        });
        Ok(Self {
            root_url: format!("http://{addr}{CANNED_ROOT_PATH}"),
            handle,
        })
    }

    /// API root URL pointing at this server.
    #[must_use]
    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    /// Waits for the request to be served and returns it.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when serving failed or the task panicked.
    pub async fn captured(self) -> io::Result<CapturedRequest> {
        self.handle.await.map_err(io::Error::other)?
    }
}

const fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

async fn read_request(stream: &mut TcpStream) -> io::Result<CapturedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 4096];
    let header_end = loop {
        if let Some(position) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break position;
        }
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed before headers completed",
            ));
        }
        buffer.extend(chunk.iter().take(read));
    };

    let head = String::from_utf8_lossy(buffer.get(..header_end).unwrap_or_default()).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_owned();
    let path = parts.next().unwrap_or_default().to_owned();
    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_owned()))
        .collect::<Vec<_>>();

    let content_length = headers
        .iter()
        .find(|(name, _)| name == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let body_start = header_end + 4;
    while buffer.len() < body_start + content_length {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buffer.extend(chunk.iter().take(read));
    }
    let body = buffer
        .get(body_start..)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default();

    Ok(CapturedRequest {
        method,
        path,
        headers,
        body,
    })
}

/// Global mutex used to serialise environment mutation in tests.
pub static ENV_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

/// Guard that holds the env mutex and restores variables on drop.
pub struct EnvGuard {
    previous: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Sets multiple environment variables while holding a global mutex.
    pub async fn set_vars(pairs: &[(&str, &str)]) -> Self {
        debug_assert!(
            {
                let mut seen = BTreeSet::new();
                pairs.iter().all(|(key, _)| seen.insert(*key))
            },
            "duplicate environment variable keys passed to EnvGuard::set_vars"
        );

        let guard = ENV_LOCK.lock().await;
        let mut previous = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let old = env::var_os(key);
            // SAFETY: Environment mutation is serialised by `ENV_LOCK`, preventing races.
            unsafe { env::set_var(key, value) };
            previous.push(((*key).to_owned(), old));
        }

        Self {
            previous,
            _guard: guard,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.previous {
            // SAFETY: Environment mutation is serialised by holding `_guard`.
            unsafe {
                match old {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
