//! Behavioural tests for [`OverpassClient`].
//!
//! These tests use [`StubTransport`] and [`ManualClock`] so no Overpass
//! service is contacted and no real time passes.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;
use waymark_core::{GeoQuery, GeoQueryError, RawRoute, Region, UpstreamFailure};
use waymark_data::overpass::test_support::{ManualClock, StubTransport};
use waymark_data::overpass::{OverpassClient, OverpassClientConfig, RequestThrottle};

/// Outcome of the most recent query.
type ResultCell = RefCell<Option<Result<Vec<RawRoute>, GeoQueryError>>>;

const ONE_RELATION: &str = r#"{"elements": [
    {"type": "relation", "id": 12345,
     "tags": {"name": "Bucegi: Busteni - Babele", "route": "hiking", "osmc:symbol": "red:white:red_cross"},
     "members": [
        {"type": "way", "ref": 1, "role": "",
         "geometry": [{"lat": 45.40, "lon": 25.50}, {"lat": 45.41, "lon": 25.51}]}
     ]}
]}"#;

#[fixture]
fn transport() -> RefCell<Option<StubTransport>> {
    RefCell::new(None)
}

#[fixture]
fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new())
}

#[fixture]
fn result() -> ResultCell {
    RefCell::new(None)
}

fn expect_routes(result: &ResultCell) -> Vec<RawRoute> {
    result
        .borrow()
        .as_ref()
        .expect("query was attempted")
        .as_ref()
        .expect("expected a successful query")
        .clone()
}

fn expect_unavailable(result: &ResultCell) -> (u32, UpstreamFailure) {
    match result.borrow().as_ref().expect("query was attempted") {
        Err(GeoQueryError::UpstreamUnavailable { attempts, cause }) => (*attempts, cause.clone()),
        other => panic!("expected UpstreamUnavailable, got {other:?}"),
    }
}

// --- Given steps ---

#[given("an Overpass service returning one hiking relation")]
fn healthy_service(#[from(transport)] transport: &RefCell<Option<StubTransport>>) {
    *transport.borrow_mut() = Some(StubTransport::always_ok(ONE_RELATION));
}

#[given("an Overpass service that keeps dropping connections")]
fn dropping_service(#[from(transport)] transport: &RefCell<Option<StubTransport>>) {
    *transport.borrow_mut() = Some(StubTransport::always_err(UpstreamFailure::Network {
        url: "http://overpass.invalid/api/interpreter".to_owned(),
        message: "connection reset by peer".to_owned(),
    }));
}

#[given("an Overpass service answering with a remark")]
fn remark_service(#[from(transport)] transport: &RefCell<Option<StubTransport>>) {
    *transport.borrow_mut() = Some(StubTransport::always_ok(
        r#"{"elements": [], "remark": "runtime error: Query timed out in \"query\""}"#,
    ));
}

// --- When steps ---

#[when("the client queries the Bucegi region")]
fn query_region(
    #[from(transport)] transport: &RefCell<Option<StubTransport>>,
    #[from(clock)] clock: &Arc<ManualClock>,
    #[from(result)] result: &ResultCell,
) {
    let stub = transport
        .borrow_mut()
        .take()
        .expect("transport should be configured");
    let config = OverpassClientConfig::default();
    let throttle = Arc::new(RequestThrottle::with_clock(
        config.request_delay,
        Arc::clone(clock) as Arc<dyn waymark_data::overpass::Clock>,
    ));
    let client = OverpassClient::with_transport(stub, config, throttle);
    *result.borrow_mut() = Some(client.query_region(&Region::bucegi()));
}

// --- Then steps ---

#[then("one raw route is returned")]
fn one_route(#[from(result)] result: &ResultCell) {
    let routes = expect_routes(result);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].external_id, 12345);
}

#[then("the route resolves its inline member geometry")]
fn inline_geometry(#[from(result)] result: &ResultCell) {
    let routes = expect_routes(result);
    let fragment = routes[0].fragment(1).expect("way 1 should resolve");
    assert_eq!(fragment.coordinates.len(), 2);
}

#[then("the query fails as unavailable after 3 attempts")]
fn unavailable_after_three(#[from(result)] result: &ResultCell) {
    let (attempts, cause) = expect_unavailable(result);
    assert_eq!(attempts, 3);
    assert!(cause.is_retryable());
}

#[then("the query fails as unavailable after 1 attempt")]
fn unavailable_after_one(#[from(result)] result: &ResultCell) {
    let (attempts, cause) = expect_unavailable(result);
    assert_eq!(attempts, 1);
    assert!(matches!(cause, UpstreamFailure::Remark { .. }));
}

#[then("the client waited 3 and then 6 seconds between attempts")]
fn doubled_backoff(#[from(clock)] clock: &Arc<ManualClock>) {
    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_secs(3), Duration::from_secs(6)]
    );
}

#[then("the client did not wait")]
fn no_wait(#[from(clock)] clock: &Arc<ManualClock>) {
    assert!(clock.sleeps().is_empty());
}

// --- Scenario registrations ---

macro_rules! register_overpass_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/overpass_client.feature", name = $title)]
        fn $fn_name(
            transport: RefCell<Option<StubTransport>>,
            clock: Arc<ManualClock>,
            result: ResultCell,
        ) {
            let _ = (transport, clock, result);
        }
    };
}

register_overpass_scenario!(healthy_service_scenario, "reading routes from a healthy service");
register_overpass_scenario!(
    repeated_failures_scenario,
    "giving up after repeated transport failures"
);
register_overpass_scenario!(remark_scenario, "failing fast on a service remark");
