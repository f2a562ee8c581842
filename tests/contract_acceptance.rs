//! Acceptance tests for contract operations against the live API.
//!
//! These run only when `TESTACC=1` and Sakura Cloud credentials are present;
//! otherwise each test returns immediately.

#[path = "common/acceptance.rs"]
mod acceptance;

use dedicated_storage::apis::v1::{
    ContractPatch, ContractSpec, CreateContractRequest, UpdateContractRequest,
};
use dedicated_storage::{ContractApi, ContractOp};

use acceptance::{CONTRACT_ID_VAR, id_from_env, live_client, unique_name};

#[tokio::test]
async fn contract_lifecycle() {
    let Some(client) = live_client(&[]) else {
        return;
    };
    let op = ContractOp::new(client);

    let plans = op.list_plans().await.expect("list plans");
    let plan_id = plans.plans.first().map(|plan| plan.id).expect("at least one plan");
    let plan = op.read_plan(plan_id).await.expect("read plan");
    assert_eq!(plan.id, plan_id);

    let name = unique_name("dedicated-storage-acc");
    let created = op
        .create(&CreateContractRequest::new(
            ContractSpec::new(plan_id, name.as_str())
                .description("description")
                .tags(["tag1", "tag2"]),
        ))
        .await
        .expect("create contract");
    assert_eq!(created.name, name);

    let read = op.read(created.id).await.expect("read contract");
    assert_eq!(read.id, created.id);

    let listed = op.list().await.expect("list contracts");
    assert!(
        listed.find(created.id).is_some(),
        "created contract {} missing from list",
        created.id
    );

    let updated = op
        .update(
            created.id,
            &UpdateContractRequest::new(
                ContractPatch::new()
                    .name(format!("{name}-updated"))
                    .description("description-updated")
                    .tags(["tag1-updated", "tag2-updated"]),
            ),
        )
        .await
        .expect("update contract");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, format!("{name}-updated"));
    assert_eq!(updated.description, "description-updated");
    assert_eq!(updated.tags, vec!["tag1-updated", "tag2-updated"]);

    op.delete(created.id).await.expect("delete contract");
    let after = op.list().await.expect("list contracts after delete");
    assert!(
        after.find(created.id).is_none(),
        "deleted contract {} still listed",
        created.id
    );
}

#[tokio::test]
async fn pool_usage_of_existing_contract() {
    let Some(client) = live_client(&[CONTRACT_ID_VAR]) else {
        return;
    };
    let op = ContractOp::new(client);

    let usage = op
        .pool_usage(id_from_env(CONTRACT_ID_VAR))
        .await
        .expect("pool usage");

    assert!(usage.allocated_size_mb <= usage.total_size_mb || usage.total_size_mb == 0);
}

#[tokio::test]
async fn disk_snapshots_of_existing_contract() {
    let Some(client) = live_client(&[CONTRACT_ID_VAR]) else {
        return;
    };
    let op = ContractOp::new(client);

    op.list_disk_snapshots(id_from_env(CONTRACT_ID_VAR))
        .await
        .expect("list snapshots by contract");
}
