//! Client library for the Sakura Cloud dedicated storage API.
//!
//! [`new_client`] binds a shared [`saclient::Client`] handle to a zone root
//! URL. The resulting [`apis::v1::Client`] is wrapped by two operation
//! facades: [`ContractOp`] manages contracts, pool statistics and plans, and
//! [`DiskOp`] manages disk snapshots and expansion. Facade failures are
//! reported as [`ApiError`], which names the operation and keeps the HTTP
//! status of structured remote errors.
//!
//! ```no_run
//! use dedicated_storage::apis::v1::{
//!     ContractPatch, ContractSpec, CreateContractRequest, UpdateContractRequest,
//! };
//! use dedicated_storage::saclient::{self, Credentials};
//! use dedicated_storage::{ContractApi, ContractOp, new_client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let http = saclient::Client::with_credentials(Credentials::new("token", "secret"))?;
//!     let op = ContractOp::new(new_client(&http)?);
//!
//!     let plans = op.list_plans().await?;
//!     let Some(plan) = plans.plans.first() else {
//!         return Ok(());
//!     };
//!
//!     let created = op
//!         .create(&CreateContractRequest::new(
//!             ContractSpec::new(plan.id, "example").tags(["tag1"]),
//!         ))
//!         .await?;
//!     let read = op.read(created.id).await?;
//!     println!("{} {}", read.id, read.name);
//!
//!     for contract in op.list().await?.contracts {
//!         println!("{}", contract.name);
//!     }
//!
//!     op.update(
//!         created.id,
//!         &UpdateContractRequest::new(ContractPatch::new().name("example-updated")),
//!     )
//!     .await?;
//!     op.delete(created.id).await?;
//!     Ok(())
//! }
//! ```

pub mod apis;
pub mod client;
pub mod config;
pub mod contract;
pub mod disk;
pub mod error;
pub mod saclient;
pub mod test_support;

pub use client::{
    ClientError, DEFAULT_API_ROOT_URL, USER_AGENT, VERSION, new_client,
    new_client_with_api_root_url,
};
pub use config::{ConfigError, SakuraConfig};
pub use contract::{ContractApi, ContractOp};
pub use disk::{DiskApi, DiskOp};
pub use error::{ApiError, ApiErrorCause, ApiFuture};
