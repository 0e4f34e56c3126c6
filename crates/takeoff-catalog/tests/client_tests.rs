// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use std::thread;
use std::time::Duration;
use takeoff_app::{AppCommand, AppEvent, AppState, BuilderId, CommunityId, FetchRequest, ListKind};
use takeoff_catalog::{CatalogSource, Client, StaticCatalog, fulfill};
use takeoff_testkit::{TakeoffFaker, sample_catalog, temp_catalog_path};
use tiny_http::{Header, Response, Server};

fn json_response(body: String, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

#[test]
fn unreachable_catalog_error_names_remediation() {
    let client = Client::new("http://127.0.0.1:1/api", Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .list_builders()
        .expect_err("request should fail for unreachable endpoint");
    let message = error.to_string();
    assert!(message.contains("cannot reach catalog service"));
    assert!(message.contains("--catalog-file"));
}

#[test]
fn pipeline_runs_against_mock_server() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api", server.server_addr());
    let catalog = sample_catalog().to_json()?;

    let handle = thread::spawn(move || {
        let expected = [
            ("/api/builders", catalog["builders"].to_string()),
            (
                "/api/communities?builder_id=1",
                catalog["communities"].to_string(),
            ),
            (
                "/api/floorplans?builder_id=1&community_id=10",
                catalog["bundles"][0].to_string(),
            ),
        ];
        for (url, body) in expected {
            let request = server.recv().expect("request expected");
            assert_eq!(request.url(), url);
            request
                .respond(json_response(body, 200))
                .expect("response should succeed");
        }
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let mut state = AppState::default();
    let mut pending = state.dispatch(AppCommand::Start);
    let mut script = vec![
        AppCommand::SelectCommunity(CommunityId::new(10)),
        AppCommand::SelectBuilder(BuilderId::new(1)),
    ];

    loop {
        let request = pending.iter().find_map(|event| match event {
            AppEvent::FetchRequested(request) => Some(*request),
            _ => None,
        });
        pending = match request {
            Some(request) => state.dispatch(fulfill(&client, request)?),
            None => match script.pop() {
                Some(command) => state.dispatch(command),
                None => break,
            },
        };
    }

    handle.join().expect("server thread should join");

    assert_eq!(state.visible_communities().count(), 2);
    assert_eq!(state.selection.floor_plan.as_deref(), Some("PlanA"));
    state.dispatch(AppCommand::ToggleOption("Upgrade1".to_owned()));
    assert!(
        state
            .list(ListKind::Plumbing)
            .lines()
            .contains(&"1 - WidgetX - Sink".to_owned())
    );
    Ok(())
}

#[test]
fn server_error_message_is_surfaced() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/communities?builder_id=7");
        request
            .respond(json_response(
                r#"{"error":"builder 7 not found"}"#.to_owned(),
                404,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = fulfill(&client, FetchRequest::Communities(BuilderId::new(7)))
        .expect_err("404 should fail");
    assert_eq!(error.to_string(), "catalog error (404): builder 7 not found");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn malformed_bundle_fails_to_decode() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(
                r#"{"floor_plans": [], "options": {}}"#.to_owned(),
                200,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .load_plan_bundle(BuilderId::new(1), CommunityId::new(10))
        .expect_err("bundle without trims should fail");
    assert!(error.to_string().contains("decode floor plans and options"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn static_catalog_serves_generated_file() -> Result<()> {
    let fixture = TakeoffFaker::new(21).catalog(3);
    let (_dir, path) = temp_catalog_path(&fixture)?;
    let catalog = StaticCatalog::load(&path)?;

    assert_eq!(catalog.list_builders()?, fixture.builders);
    for (builder, community, bundle) in &fixture.bundles {
        let command = fulfill(
            &catalog,
            FetchRequest::PlanBundle {
                builder: *builder,
                community: *community,
            },
        )?;
        assert_eq!(
            command,
            AppCommand::PlanBundleLoaded {
                builder: *builder,
                community: *community,
                bundle: bundle.clone(),
            }
        );
    }
    Ok(())
}

#[test]
fn inserted_bundle_is_served() -> Result<()> {
    let fixture = sample_catalog();
    let mut catalog = StaticCatalog::new(fixture.builders.clone(), fixture.communities.clone());
    assert!(
        catalog
            .load_plan_bundle(BuilderId::new(1), CommunityId::new(11))
            .is_err()
    );

    let bundle = takeoff_testkit::sample_bundle(CommunityId::new(11));
    catalog.insert_bundle(BuilderId::new(1), CommunityId::new(11), bundle.clone());
    assert_eq!(
        catalog.load_plan_bundle(BuilderId::new(1), CommunityId::new(11))?,
        bundle
    );
    Ok(())
}

#[test]
fn missing_catalog_file_names_path() {
    let error = StaticCatalog::load(std::path::Path::new("/nonexistent/catalog.json"))
        .expect_err("missing file should fail");
    assert!(error.to_string().contains("/nonexistent/catalog.json"));
}

#[test]
fn unparseable_catalog_file_reports_path_and_cause() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("catalog.json");
    std::fs::write(&path, "{\"builders\": [")?;

    let error = StaticCatalog::load(&path).expect_err("truncated JSON should fail");
    let message = format!("{error:#}");
    assert!(message.contains("load catalog file"));
    assert!(message.contains("parse catalog JSON"));
    Ok(())
}
