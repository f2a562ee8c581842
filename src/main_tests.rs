//! Unit tests for the `dedicated-storage` CLI binary implementation.

use super::*;
use dedicated_storage::apis::v1::InvokeError;
use dedicated_storage::test_support::{Invocation, ScriptedInvoker};
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn invoker() -> ScriptedInvoker {
    ScriptedInvoker::new()
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("dedicated-storage").chain(args.iter().copied()))
        .expect("arguments parse")
}

#[test]
fn create_contract_request_carries_optional_fields() {
    let Cli {
        command: Command::Contract(ContractCommand::Create(args)),
        ..
    } = parse(&[
        "contract",
        "create",
        "--plan-id",
        "3",
        "--name",
        "storage",
        "--tag",
        "a",
        "--tag",
        "b",
        "--icon-id",
        "9",
    ])
    else {
        panic!("expected contract create");
    };

    let request = create_contract_request(args);

    assert_eq!(
        request,
        CreateContractRequest::new(
            ContractSpec::new(3, "storage").tags(["a", "b"]).icon(9)
        )
    );
}

#[rstest]
#[case::untouched(&["contract", "update", "5", "--name", "n"], None, None)]
#[case::clear_icon(&["contract", "update", "5", "--clear-icon"], None, Some(None))]
#[case::set_icon_and_tags(
    &["contract", "update", "5", "--tag", "x", "--icon-id", "2"],
    Some(vec![String::from("x")]),
    Some(Some(ResourceRef::new(2)))
)]
fn update_contract_request_only_sets_given_fields(
    #[case] args: &[&str],
    #[case] tags: Option<Vec<String>>,
    #[case] icon: Option<Option<ResourceRef>>,
) {
    let Cli {
        command: Command::Contract(ContractCommand::Update(update)),
        ..
    } = parse(args)
    else {
        panic!("expected contract update");
    };

    let request = update_contract_request(update);

    assert_eq!(request.contract.tags, tags);
    assert_eq!(request.contract.icon, icon);
}

#[test]
fn icon_flags_conflict() {
    let result = Cli::try_parse_from([
        "dedicated-storage",
        "contract",
        "update",
        "5",
        "--icon-id",
        "2",
        "--clear-icon",
    ]);
    assert!(result.is_err());
}

#[test]
fn global_root_url_is_accepted_after_subcommand() {
    let cli = parse(&["plans", "--api-root-url", "http://127.0.0.1:1/"]);
    assert_eq!(cli.api_root_url.as_deref(), Some("http://127.0.0.1:1/"));
}

#[rstest]
#[tokio::test]
async fn plans_with_id_reads_single_plan(invoker: ScriptedInvoker) {
    invoker.push_json(json!({"DedicatedStorageContractPlan": {"ID": 4, "Name": "2TB"}}));
    let api = ContractOp::new(invoker.clone());

    let output = run_plans(&api, Some(4))
        .await
        .expect("plan read");

    let value = output.expect("plan printed");
    assert_eq!(value.get("Name"), Some(&json!("2TB")));
    assert_eq!(invoker.invocations(), vec![Invocation::GetPlan(4)]);
}

#[rstest]
#[tokio::test]
async fn contract_delete_prints_nothing(invoker: ScriptedInvoker) {
    invoker.push_empty();
    let api = ContractOp::new(invoker.clone());

    let output = run_contract(&api, ContractCommand::Delete { id: 12 })
        .await
        .expect("delete succeeds");

    assert!(output.is_none());
    assert_eq!(invoker.invocations(), vec![Invocation::DeleteContract(12)]);
}

#[rstest]
#[tokio::test]
async fn snapshot_update_addresses_target(invoker: ScriptedInvoker) {
    invoker.push_json(json!({"DiskSnapshot": {"ID": 2, "Name": "after"}}));
    let api = DiskOp::new(invoker.clone());
    let Cli {
        command: Command::Snapshot(command),
        ..
    } = parse(&["snapshot", "update", "10", "2", "--name", "after"])
    else {
        panic!("expected snapshot command");
    };

    let output = run_snapshot(&api, command).await.expect("update succeeds");

    assert_eq!(output.and_then(|v| v.get("ID").cloned()), Some(json!(2)));
    assert_eq!(
        invoker.invocations(),
        vec![Invocation::UpdateSnapshot(
            10,
            2,
            UpdateSnapshotRequest::new(SnapshotPatch::new().name("after"))
        )]
    );
}

#[rstest]
#[tokio::test]
async fn disk_expand_forwards_size(invoker: ScriptedInvoker) {
    invoker.push_empty();
    let api = DiskOp::new(invoker.clone());

    let output = run_disk(
        &api,
        DiskCommand::Expand {
            disk_id: 10,
            size_mb: 61_440,
        },
    )
    .await
    .expect("expand succeeds");

    assert!(output.is_none());
    assert_eq!(
        invoker.invocations(),
        vec![Invocation::ExpandDisk(10, ExpandDiskRequest::new(61_440))]
    );
}

#[rstest]
#[tokio::test]
async fn api_failures_surface_with_operation_name(invoker: ScriptedInvoker) {
    invoker.push_status(404, "disk not found");
    let api = DiskOp::new(invoker);

    let err = run_snapshot(&api, SnapshotCommand::List { disk_id: 1 })
        .await
        .expect_err("scripted failure");

    assert_eq!(err.to_string(), "Disk.ListSnapshots: status 404: disk not found");
}

#[rstest]
#[tokio::test]
async fn transport_failures_render_without_status(invoker: ScriptedInvoker) {
    invoker.push_failure(InvokeError::Url(url::ParseError::EmptyHost));
    let api = ContractOp::new(invoker);

    let err = run_contract(&api, ContractCommand::List)
        .await
        .expect_err("scripted failure");

    assert_eq!(
        err.to_string(),
        "Contract.List: invalid endpoint URL: empty host"
    );
}

#[test]
fn write_json_pretty_prints_with_trailing_newline() {
    let mut buf = Vec::new();
    write_json(&mut buf, &json!({"ID": 1})).expect("write succeeds");
    let rendered = String::from_utf8(buf).expect("utf8");
    assert_eq!(rendered, "{\n  \"ID\": 1\n}\n");
}

#[test]
fn write_error_writes_cli_error() {
    let mut buf = Vec::new();
    let err = CliError::Config(ConfigError::InvalidTimeout);
    write_error(&mut buf, &err);
    let rendered = String::from_utf8(buf).expect("utf8");
    assert!(
        rendered.contains("SAKURA_TIMEOUT_SECS must be greater than zero"),
        "rendered: {rendered}"
    );
}
