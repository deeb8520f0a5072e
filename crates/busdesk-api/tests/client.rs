//! Integration tests for `ApiClient` using wiremock HTTP mocks.

use busdesk_api::{AgencyProfileStore, ApiClient, ApiError, MemoryProfileCache, ProfileCache};
use busdesk_core::{
    AgencyDraft, ContactKind, Coordinates, PaymentMethod, PaymentProvider, PendingFile,
    RequirementStatus, StationPatch,
};
use busdesk_wizard::{
    AgencyStep, AgencyWizard, ContinueOutcome, GateContext, Landing, RemoteSync, StationStep,
    StationWizard,
};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::with_base_url(base_url, 5, "busdesk-test/0.1")
        .expect("client construction should not fail")
}

fn agency_me(completion: serde_json::Value, publishable: bool) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "data": {
            "agency": {
                "id": 12,
                "name": "Acme Voyages",
                "headAddress": "Rue Joss, Douala",
                "towns": ["Douala", "Yaoundé"],
                "contactInfo": [{"type": "email", "value": "info@acme.cm"}]
            },
            "completionSteps": completion,
            "isPublishable": publishable
        }
    })
}

async fn mount_agency_me(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/agency/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn get_my_agency_parses_completion_steps() {
    let server = MockServer::start().await;
    mount_agency_me(
        &server,
        agency_me(
            serde_json::json!({
                "verification": {"status": "approved"},
                "stations": {"status": "rejected", "reason": "Photo is blurry"}
            }),
            false,
        ),
    )
    .await;

    let client = test_client(&server.uri());
    let me = client.get_my_agency().await.expect("should parse agency");

    assert_eq!(me.agency.id, "12");
    assert_eq!(me.agency.towns.len(), 2);
    let stations = me.completion_steps.get("stations").unwrap();
    assert_eq!(stations.status, RequirementStatus::Rejected);
    assert_eq!(stations.reason.as_deref(), Some("Photo is blurry"));
    assert_eq!(
        me.completion_steps.get("verification").unwrap().status,
        RequirementStatus::Completed
    );
}

#[tokio::test]
async fn bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/agency/me"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(agency_me(
            serde_json::json!({}),
            false,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.set_token(Some("secret-token".into()));
    client.get_my_agency().await.expect("authorized call");
}

#[tokio::test]
async fn non_2xx_surfaces_error_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/agency/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "success": false,
            "error": "Session expired",
            "message": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).get_my_agency().await.unwrap_err();
    match &err {
        ApiError::Api { status, message } => {
            assert_eq!(*status, 401);
            assert_eq!(message, "Session expired");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(err.user_message(), "Session expired");
}

#[tokio::test]
async fn success_false_with_200_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/agency/12/publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "message": "Agency is not ready to publish"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .publish_agency("12")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Agency is not ready to publish");
}

#[tokio::test]
async fn unparseable_error_body_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .update_profile(&AgencyDraft::default())
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "An unexpected error occurred");
}

#[tokio::test]
async fn publish_agency_hits_publish_route() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/agency/12/publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {"status": "published"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let data = test_client(&server.uri())
        .publish_agency("12")
        .await
        .expect("publish succeeds");
    assert_eq!(data["status"], "published");
}

#[tokio::test]
async fn create_agency_replaces_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/agency"))
        .and(body_partial_json(serde_json::json!({"name": "Acme Voyages"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "success": true,
            "data": {"agency": {"id": "ag-7"}, "token": "owner-token"}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.set_token(Some("visitor-token".into()));
    let draft = AgencyDraft {
        name: Some("Acme Voyages".into()),
        towns: vec!["Douala".into()],
        ..AgencyDraft::default()
    };

    let receipt = RemoteSync::<AgencyDraft>::submit(&client, &draft)
        .await
        .expect("creation succeeds");
    assert_eq!(receipt.entity_id.as_deref(), Some("ag-7"));
    assert_eq!(receipt.token.as_deref(), Some("owner-token"));
    assert_eq!(client.token().as_deref(), Some("owner-token"));
}

#[tokio::test]
async fn import_buses_uploads_file_part() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/buses/import"))
        .and(body_string_contains("name=\"file\"; filename=\"buses.csv\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {"imported": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = PendingFile::new("buses.csv", b"plateNumber,capacity\nLT-123,70\n".to_vec());
    let data = test_client(&server.uri())
        .import_buses(&file)
        .await
        .expect("upload succeeds");
    assert_eq!(data["imported"], 1);
}

// ---------------------------------------------------------------------------
// Agency profile store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn profile_refresh_writes_cache() {
    let server = MockServer::start().await;
    mount_agency_me(
        &server,
        agency_me(serde_json::json!({"profile": {"status": "completed"}}), true),
    )
    .await;

    let client = test_client(&server.uri());
    let mut store = AgencyProfileStore::mount(MemoryProfileCache::default());
    let profile = store.refresh(&client).await.expect("refresh succeeds");
    assert_eq!(profile.name, "Acme Voyages");
    assert!(store.server_publishable());
    assert_eq!(store.projection().landing, Landing::Dashboard);
    assert_eq!(store.cache().load().unwrap().agency.id, "12");
}

#[tokio::test]
async fn profile_refresh_failure_clears_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/agency/me"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "success": false,
            "message": "Maintenance"
        })))
        .mount(&server)
        .await;

    let cache = MemoryProfileCache::default();
    cache
        .save(&busdesk_api::CachedProfile {
            agency: serde_json::from_value(serde_json::json!({"id": 1, "name": "Stale"}))
                .unwrap(),
            fetched_at: chrono::Utc::now(),
        })
        .unwrap();
    let mut store = AgencyProfileStore::mount(cache);
    assert!(store.profile().is_some());

    let err = store.refresh(&test_client(&server.uri())).await.unwrap_err();
    assert_eq!(err.user_message(), "Maintenance");
    assert!(store.profile().is_none());
    assert!(store.cache().load().is_none());
}

/// Cache whose entry can never be removed.
struct UndeletableCache(MemoryProfileCache);

impl ProfileCache for UndeletableCache {
    fn load(&self) -> Option<busdesk_api::CachedProfile> {
        self.0.load()
    }

    fn save(&self, profile: &busdesk_api::CachedProfile) -> Result<(), ApiError> {
        self.0.save(profile)
    }

    fn clear(&self) -> Result<(), ApiError> {
        Err(ApiError::Cache {
            path: "myAgency.json".to_string(),
            source: std::io::Error::other("read-only filesystem"),
        })
    }
}

#[tokio::test]
async fn profile_refresh_failure_reports_fetch_error_when_cache_clear_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/agency/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "success": false,
            "error": "Session expired"
        })))
        .mount(&server)
        .await;

    let mut store = AgencyProfileStore::mount(UndeletableCache(MemoryProfileCache::default()));
    let err = store.refresh(&test_client(&server.uri())).await.unwrap_err();
    assert!(matches!(err, ApiError::Api { .. }), "{err:?}");
    assert_eq!(err.user_message(), "Session expired");
    assert!(store.profile().is_none());
}

#[tokio::test]
async fn scenario_c_routes_to_station_setup() {
    let server = MockServer::start().await;
    mount_agency_me(
        &server,
        agency_me(
            serde_json::json!({
                "verification": {"status": "completed"},
                "stations": {"status": "required"}
            }),
            false,
        ),
    )
    .await;

    let status = RemoteSync::<AgencyDraft>::fetch_status(&test_client(&server.uri()))
        .await
        .expect("status fetch");
    let projection = busdesk_wizard::CompletionProjection::from_status(&status);
    assert!(!projection.publishable);
    assert_eq!(projection.landing, Landing::Setup("stations".into()));
    assert_eq!(projection.landing.route(), "/agency/setup/stations");
}

#[tokio::test]
async fn resumed_agency_wizard_updates_profile_instead_of_creating() {
    let server = MockServer::start().await;
    mount_agency_me(
        &server,
        agency_me(
            serde_json::json!({
                "profile": {"status": "completed"},
                "verification": {"status": "pending_processing"}
            }),
            false,
        ),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/agency"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "success": true,
            "data": {"id": 99}
        })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/profile"))
        .and(body_partial_json(serde_json::json!({"name": "Acme Voyages"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {"agency": {"id": 12}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut profiles = AgencyProfileStore::mount(MemoryProfileCache::default());
    profiles.refresh(&client).await.expect("refresh succeeds");
    let mut draft = profiles.draft().expect("profile was fetched");
    draft.coordinates = Some(Coordinates::new(4.05, 9.7));

    let mut wizard = AgencyWizard::new(client, GateContext::default());
    wizard.store_mut().set_draft(draft);
    wizard.resume().await.expect("status fetch");
    assert_eq!(wizard.current_step(), AgencyStep::Review);

    match wizard.handle_continue().await {
        ContinueOutcome::Submitted { receipt, landing, .. } => {
            assert_eq!(receipt.entity_id.as_deref(), Some("12"));
            assert_eq!(landing, Landing::AwaitingReview);
        }
        other => panic!("expected Submitted, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Station wizard against the HTTP adapter
// ---------------------------------------------------------------------------

fn fill_station(wizard: &mut StationWizard<ApiClient>) {
    let store = wizard.store_mut();
    store.update_form_data(StationPatch {
        name: Some("Agence Mvan".into()),
        neighborhood: Some("Mvan".into()),
        base_town: Some("Yaoundé".into()),
        address: Some("Carrefour Mvan".into()),
        coordinates: Some(Coordinates::new(3.82, 11.52)),
        destinations: Some(vec!["Douala".into(), "Kribi".into()]),
        ..StationPatch::default()
    });
    store.add_image(PendingFile::new("front.png", b"PNGDATA".to_vec()));
    store.add_payment_method(PaymentMethod::new(
        PaymentProvider::Momo,
        "Acme Voyages",
        "677123456",
    ));
    store.add_contact_with(ContactKind::Tel, "+237 677 12 34 56");
}

#[tokio::test]
async fn station_wizard_submits_multipart_and_assigns_manager() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stations"))
        .and(body_string_contains("name=\"baseTown\""))
        .and(body_string_contains("[\"Douala\",\"Kribi\"]"))
        .and(body_string_contains("filename=\"front.png\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "success": true,
            "data": {"station": {"id": 31, "name": "Agence Mvan"}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/stations/31/manager"))
        .and(body_partial_json(serde_json::json!({"email": "chef@acme.cm"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_agency_me(
        &server,
        agency_me(
            serde_json::json!({
                "verification": {"status": "completed"},
                "stations": {"status": "completed"},
                "buses": {"status": "required"}
            }),
            false,
        ),
    )
    .await;

    let mut wizard = StationWizard::new(test_client(&server.uri()), GateContext::default());
    fill_station(&mut wizard);

    for expected in [
        StationStep::Location,
        StationStep::Images,
        StationStep::Payment,
        StationStep::Contact,
    ] {
        assert_eq!(
            wizard.handle_continue().await,
            ContinueOutcome::Advanced(expected)
        );
    }

    match wizard.handle_continue().await {
        ContinueOutcome::Submitted {
            receipt,
            next,
            landing,
        } => {
            assert_eq!(receipt.entity_id.as_deref(), Some("31"));
            assert_eq!(next, Some(StationStep::AssignManager));
            assert_eq!(landing, Landing::Setup("buses".into()));
        }
        other => panic!("expected Submitted, got {other:?}"),
    }
    assert!(!wizard.is_loading());

    wizard.store_mut().update_form_data(StationPatch {
        manager_email: Some("chef@acme.cm".into()),
        ..StationPatch::default()
    });
    assert_eq!(
        wizard.handle_continue().await,
        ContinueOutcome::Finished {
            landing: Landing::Setup("buses".into())
        }
    );
}

#[tokio::test]
async fn station_submit_failure_keeps_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stations"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "success": false,
            "error": "A station with this name already exists"
        })))
        .mount(&server)
        .await;

    let mut wizard = StationWizard::new(test_client(&server.uri()), GateContext::default());
    fill_station(&mut wizard);
    for _ in 0..4 {
        wizard.handle_continue().await;
    }
    assert_eq!(wizard.current_step(), StationStep::Contact);

    assert_eq!(
        wizard.handle_continue().await,
        ContinueOutcome::Failed {
            message: "A station with this name already exists".into()
        }
    );
    assert_eq!(wizard.current_step(), StationStep::Contact);
    assert_eq!(wizard.store().draft().name.as_deref(), Some("Agence Mvan"));
    assert!(!wizard.is_loading());
}
