//! Unit tests for the disk facade.

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::apis::v1::{InvokeError, SnapshotPatch, SnapshotSpec};
use crate::error::{ApiError, ApiErrorCause};
use crate::test_support::{Invocation, ScriptedInvoker};

const DISK_ID: i64 = 113_600_000_010;

#[derive(Clone, Copy, Debug)]
enum Operation {
    CreateSnapshot,
    ListSnapshots,
    UpdateSnapshot,
    DeleteSnapshot,
    RestoreFromSnapshot,
    Expand,
}

async fn run(op: &DiskOp<ScriptedInvoker>, operation: Operation) -> Result<(), ApiError> {
    let create = CreateSnapshotRequest::new(SnapshotSpec::new(1, "snap"));
    let update = UpdateSnapshotRequest::new(SnapshotPatch::new().name("renamed"));
    let expand = ExpandDiskRequest::new(40_960);
    match operation {
        Operation::CreateSnapshot => op.create_snapshot(DISK_ID, &create).await.map(drop),
        Operation::ListSnapshots => op.list_snapshots(DISK_ID).await.map(drop),
        Operation::UpdateSnapshot => op.update_snapshot(DISK_ID, 2, &update).await.map(drop),
        Operation::DeleteSnapshot => op.delete_snapshot(DISK_ID, 2).await,
        Operation::RestoreFromSnapshot => op.restore_from_snapshot(DISK_ID, 2).await,
        Operation::Expand => op.expand(DISK_ID, &expand).await,
    }
}

#[fixture]
fn invoker() -> ScriptedInvoker {
    ScriptedInvoker::new()
}

#[rstest]
#[case(Operation::CreateSnapshot, "Disk.CreateSnapshot")]
#[case(Operation::ListSnapshots, "Disk.ListSnapshots")]
#[case(Operation::UpdateSnapshot, "Disk.UpdateSnapshot")]
#[case(Operation::DeleteSnapshot, "Disk.DeleteSnapshot")]
#[case(Operation::RestoreFromSnapshot, "Disk.RestoreFromSnapshot")]
#[case(Operation::Expand, "Disk.Expand")]
#[tokio::test]
async fn remote_errors_keep_operation_status_and_message(
    invoker: ScriptedInvoker,
    #[case] operation: Operation,
    #[case] method: &str,
) {
    invoker.push_status(404, "disk not found");
    let op = DiskOp::new(invoker);

    let err = run(&op, operation).await.expect_err("scripted failure");

    assert_eq!(err.method(), method);
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.message(), "disk not found");
    assert!(err.is_not_found());
}

#[rstest]
#[case(Operation::CreateSnapshot, "Disk.CreateSnapshot")]
#[case(Operation::ListSnapshots, "Disk.ListSnapshots")]
#[case(Operation::UpdateSnapshot, "Disk.UpdateSnapshot")]
#[case(Operation::DeleteSnapshot, "Disk.DeleteSnapshot")]
#[case(Operation::RestoreFromSnapshot, "Disk.RestoreFromSnapshot")]
#[case(Operation::Expand, "Disk.Expand")]
#[tokio::test]
async fn other_failures_report_status_zero(
    invoker: ScriptedInvoker,
    #[case] operation: Operation,
    #[case] method: &str,
) {
    invoker.push_failure(InvokeError::Url(url::ParseError::InvalidPort));
    let op = DiskOp::new(invoker);

    let err = run(&op, operation).await.expect_err("scripted failure");

    assert_eq!(err.method(), method);
    assert_eq!(err.status_code(), 0);
    assert!(matches!(
        err.cause(),
        ApiErrorCause::Transport(InvokeError::Url(url::ParseError::InvalidPort))
    ));
}

#[rstest]
#[tokio::test]
async fn snapshot_lifecycle_addresses_disk_and_snapshot(invoker: ScriptedInvoker) {
    invoker.push_json(json!({
        "DiskSnapshot": {
            "ID": "200",
            "Name": "snap",
            "Description": "description",
            "DedicatedStorageContract": {"ID": "1"}
        }
    }));
    invoker.push_json(json!({"Count": 1, "DiskSnapshots": [{"ID": 200, "Name": "snap"}]}));
    invoker.push_json(json!({"DiskSnapshot": {"ID": 200, "Name": "snap-updated"}}));
    invoker.push_empty();
    invoker.push_empty();
    let op = DiskOp::new(invoker.clone());

    let create = CreateSnapshotRequest::new(SnapshotSpec::new(1, "snap").description("description"));
    let created = op
        .create_snapshot(DISK_ID, &create)
        .await
        .expect("create succeeds");
    let listed = op.list_snapshots(DISK_ID).await.expect("list succeeds");
    let update = UpdateSnapshotRequest::new(SnapshotPatch::new().name("snap-updated"));
    let updated = op
        .update_snapshot(DISK_ID, created.id, &update)
        .await
        .expect("update succeeds");
    op.restore_from_snapshot(DISK_ID, created.id)
        .await
        .expect("restore succeeds");
    op.delete_snapshot(DISK_ID, created.id)
        .await
        .expect("delete succeeds");

    assert_eq!(created.id, 200);
    assert_eq!(created.contract.map(|c| c.id), Some(1));
    assert!(listed.find(created.id).is_some());
    assert_eq!(updated.name, "snap-updated");
    assert_eq!(
        invoker.invocations(),
        vec![
            Invocation::CreateSnapshot(DISK_ID, create),
            Invocation::ListSnapshots(DISK_ID),
            Invocation::UpdateSnapshot(DISK_ID, 200, update),
            Invocation::RestoreSnapshot(DISK_ID, 200),
            Invocation::DeleteSnapshot(DISK_ID, 200),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn expand_forwards_requested_size(invoker: ScriptedInvoker) {
    invoker.push_empty();
    let op = DiskOp::new(invoker.clone());

    op.expand(DISK_ID, &ExpandDiskRequest::gib(40).expect("size fits"))
        .await
        .expect("expand succeeds");

    assert_eq!(
        invoker.invocations(),
        vec![Invocation::ExpandDisk(DISK_ID, ExpandDiskRequest::new(40_960))]
    );
}

#[rstest]
#[tokio::test]
async fn unscripted_call_surfaces_as_remote_error(invoker: ScriptedInvoker) {
    let op = DiskOp::new(invoker);

    let err = op.list_snapshots(DISK_ID).await.expect_err("nothing queued");

    assert_eq!(err.status_code(), 501);
    assert_eq!(err.method(), "Disk.ListSnapshots");
}
