mod common;

use std::time::Duration;

use common::{capacity, settings, RESOURCE_GROUP};
use fab_config::{AdminMembers, CapacityConfig, CapacityDefaults};
use fab_core::{FabError, RecordingSleeper};
use fab_provision::capacity::{SUSPEND_BACKOFF, SUSPEND_MAX_ATTEMPTS};
use fab_provision::{CapacityLifecycle, CapacityOutcome, ProvisionContext};
use fab_transport::{ApiResponse, Audience, HttpMethod, MockTransport};
use serde_json::json;

fn defaults() -> CapacityDefaults {
    CapacityDefaults {
        region: Some("westeurope".into()),
        sku: Some("F2".into()),
        resource_group: RESOURCE_GROUP.into(),
        capacity_admins: AdminMembers::Csv("admin@contoso.com, ops@contoso.com".into()),
    }
}

#[test]
fn test_exists_reads_200_as_present() {
    let mock = MockTransport::new().on_api(
        HttpMethod::Get,
        "capacities/cap1",
        [capacity("Succeeded", Some("Active"))],
    );
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    assert!(lifecycle.exists("cap1", RESOURCE_GROUP));

    let request = &mock.requests()[0];
    assert_eq!(
        request.endpoint,
        "/subscriptions/sub-123/resourceGroups/rg-fabric/providers/Microsoft.Fabric/capacities/cap1"
    );
    assert_eq!(request.audience, Some(Audience::Azure));
    assert_eq!(
        request.query,
        vec![("api-version".to_string(), "2023-11-01".to_string())]
    );
}

#[test]
fn test_status_asymmetry_on_404() {
    let mock = MockTransport::new().on_api(
        HttpMethod::Get,
        "capacities/cap1",
        [ApiResponse::json(404, json!({"error": {"code": "ResourceNotFound"}}))],
    );
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    assert!(!lifecycle.exists("cap1", RESOURCE_GROUP));
    assert!(matches!(
        lifecycle.status("cap1", RESOURCE_GROUP),
        Err(FabError::Remote { .. })
    ));
}

#[test]
fn test_exists_treats_transport_failure_as_absent() {
    let mock = MockTransport::new().on_api(HttpMethod::Get, "capacities/cap1", [ApiResponse::blank()]);
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    assert!(!lifecycle.exists("cap1", RESOURCE_GROUP));
}

#[test]
fn test_status_reads_properties() {
    let mock = MockTransport::new().on_api(
        HttpMethod::Get,
        "capacities/cap1",
        [capacity("Succeeded", Some("Paused"))],
    );
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    let status = lifecycle.status("cap1", RESOURCE_GROUP).unwrap();
    assert_eq!(status.provisioning_state.as_deref(), Some("Succeeded"));
    assert_eq!(status.state.as_deref(), Some("Paused"));
}

#[test]
fn test_wait_until_ready_polls_at_fixed_interval() {
    let mock = MockTransport::new().on_api(
        HttpMethod::Get,
        "capacities/cap1",
        [
            capacity("Provisioning", None),
            capacity("Provisioning", None),
            capacity("Succeeded", Some("Active")),
        ],
    );
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    let ready = lifecycle
        .wait_until_ready(
            "cap1",
            RESOURCE_GROUP,
            Duration::from_secs(600),
            Duration::from_secs(15),
        )
        .unwrap();

    assert!(ready);
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(15); 2]);
    assert_eq!(mock.count(HttpMethod::Get, "capacities/cap1"), 3);
}

#[test]
fn test_wait_until_ready_accepts_absent_state() {
    let mock = MockTransport::new().on_api(
        HttpMethod::Get,
        "capacities/cap1",
        [capacity("Succeeded", None)],
    );
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    assert!(lifecycle
        .wait_until_ready("cap1", RESOURCE_GROUP, Duration::from_secs(60), Duration::from_secs(15))
        .unwrap());
    assert_eq!(sleeper.count(), 0);
}

#[test]
fn test_wait_until_ready_times_out_without_error() {
    let mock = MockTransport::new().on_api(
        HttpMethod::Get,
        "capacities/cap1",
        [capacity("Succeeded", Some("Resuming"))],
    );
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    let ready = lifecycle
        .wait_until_ready("cap1", RESOURCE_GROUP, Duration::from_secs(60), Duration::from_secs(15))
        .unwrap();

    assert!(!ready);
    assert_eq!(sleeper.count(), 4);
    assert_eq!(sleeper.total(), Duration::from_secs(60));
    assert_eq!(mock.count(HttpMethod::Get, "capacities/cap1"), 4);
}

#[test]
fn test_wait_until_ready_propagates_status_failure() {
    let mock = MockTransport::new().on_api(
        HttpMethod::Get,
        "capacities/cap1",
        [capacity("Provisioning", None), ApiResponse::status(500)],
    );
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    let result = lifecycle.wait_until_ready(
        "cap1",
        RESOURCE_GROUP,
        Duration::from_secs(600),
        Duration::from_secs(15),
    );
    assert!(matches!(result, Err(FabError::Remote { .. })));
}

#[test]
fn test_create_existing_capacity_is_pure_lookup() {
    let mock = MockTransport::new().on_api(
        HttpMethod::Get,
        "capacities/cap1",
        [capacity("Succeeded", Some("Active"))],
    );
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    let outcome = lifecycle
        .create(&CapacityConfig::new("cap1"), RESOURCE_GROUP, &defaults())
        .unwrap();

    assert_eq!(outcome, CapacityOutcome::AlreadyExists);
    assert_eq!(mock.count_method(HttpMethod::Put), 0);
    assert_eq!(mock.count(HttpMethod::Get, "capacities/cap1"), 1);
    assert_eq!(sleeper.count(), 0);
}

#[test]
fn test_create_missing_capacity_then_waits() {
    let mock = MockTransport::new()
        .on_api(
            HttpMethod::Get,
            "capacities/cap1",
            [
                ApiResponse::status(404),
                capacity("Provisioning", None),
                capacity("Succeeded", Some("Active")),
            ],
        )
        .on_api(
            HttpMethod::Put,
            "capacities/cap1",
            [ApiResponse::json(201, json!({"name": "cap1"}))],
        );
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    let config = CapacityConfig {
        sku: Some("F8".into()),
        ..CapacityConfig::new("cap1")
    };
    let outcome = lifecycle.create(&config, RESOURCE_GROUP, &defaults()).unwrap();

    assert_eq!(outcome, CapacityOutcome::Created { ready: true });
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(15)]);

    let puts = mock.requests_to(HttpMethod::Put, "capacities/cap1");
    assert_eq!(puts.len(), 1);
    assert_eq!(
        puts[0].body,
        Some(json!({
            "location": "westeurope",
            "sku": {"name": "F8", "tier": "Fabric"},
            "properties": {"administration": {"members": ["admin@contoso.com", "ops@contoso.com"]}}
        }))
    );
}

#[test]
fn test_create_twice_issues_one_create_request() {
    let mock = MockTransport::new()
        .on_api(
            HttpMethod::Get,
            "capacities/cap1",
            [ApiResponse::status(404), capacity("Succeeded", Some("Active"))],
        )
        .on_api(HttpMethod::Put, "capacities/cap1", [ApiResponse::status(200)]);
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));
    let config = CapacityConfig::new("cap1");

    let first = lifecycle.create(&config, RESOURCE_GROUP, &defaults()).unwrap();
    let second = lifecycle.create(&config, RESOURCE_GROUP, &defaults()).unwrap();

    assert_eq!(first, CapacityOutcome::Created { ready: true });
    assert_eq!(second, CapacityOutcome::AlreadyExists);
    assert_eq!(mock.count_method(HttpMethod::Put), 1);
}

#[test]
fn test_create_rejected_is_error_without_retry() {
    let mock = MockTransport::new()
        .on_api(HttpMethod::Get, "capacities/cap1", [ApiResponse::status(404)])
        .on_api(
            HttpMethod::Put,
            "capacities/cap1",
            [ApiResponse::json(400, json!({"error": {"code": "InvalidSku"}}))],
        );
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    let result = lifecycle.create(&CapacityConfig::new("cap1"), RESOURCE_GROUP, &defaults());

    match result {
        Err(FabError::Remote { operation, detail }) => {
            assert!(operation.contains("cap1"));
            assert!(detail.contains("InvalidSku"));
        }
        other => panic!("expected remote error, got {:?}", other),
    }
    assert_eq!(mock.count_method(HttpMethod::Put), 1);
    assert_eq!(sleeper.count(), 0);
}

#[test]
fn test_suspend_accepted_first_time() {
    let mock = MockTransport::new().on_api(
        HttpMethod::Post,
        "capacities/cap1/suspend",
        [ApiResponse::status(202)],
    );
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    assert!(lifecycle.suspend("cap1", RESOURCE_GROUP));
    assert_eq!(mock.count(HttpMethod::Post, "capacities/cap1/suspend"), 1);
    assert_eq!(sleeper.count(), 0);
}

#[test]
fn test_suspend_gives_up_after_five_attempts() {
    let mock = MockTransport::new().on_api(
        HttpMethod::Post,
        "capacities/cap1/suspend",
        [ApiResponse::status(409)],
    );
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    assert!(!lifecycle.suspend("cap1", RESOURCE_GROUP));
    assert_eq!(
        mock.count(HttpMethod::Post, "capacities/cap1/suspend"),
        SUSPEND_MAX_ATTEMPTS as usize
    );
    assert_eq!(sleeper.sleeps(), vec![SUSPEND_BACKOFF; 4]);
    assert_eq!(sleeper.total(), Duration::from_secs(240));
}

#[test]
fn test_suspend_recovers_on_later_attempt() {
    let mock = MockTransport::new().on_api(
        HttpMethod::Post,
        "capacities/cap1/suspend",
        [
            ApiResponse::status(500),
            ApiResponse::blank(),
            ApiResponse::status(200),
        ],
    );
    let sleeper = RecordingSleeper::new();
    let settings = settings();
    let lifecycle = CapacityLifecycle::new(ProvisionContext::new(&mock, &sleeper, &settings));

    assert!(lifecycle.suspend("cap1", RESOURCE_GROUP));
    assert_eq!(mock.count(HttpMethod::Post, "capacities/cap1/suspend"), 3);
    assert_eq!(sleeper.count(), 2);
}
