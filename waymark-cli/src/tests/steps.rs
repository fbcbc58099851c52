//! Behaviour-driven step definitions driving the ingest CLI scenarios.

use super::helpers::{StubClientBuilder, bucegi_route, parse_ingest};
use super::*;
use crate::ingest::run_ingest_with;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use std::cell::RefCell;
use std::time::Duration;
use waymark_core::test_support::StubGeoQuery;

/// Aggregates ingest CLI scenario state so each step only needs a single world
/// argument.
#[derive(Debug)]
struct IngestWorld {
    builder: RefCell<Option<StubClientBuilder>>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl IngestWorld {
    fn new() -> Self {
        Self {
            builder: RefCell::new(None),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn push_args(&self, args: &[&str]) {
        self.cli_args
            .borrow_mut()
            .extend(args.iter().map(|arg| (*arg).to_owned()));
    }

    fn output(&self) -> Value {
        let stdout = String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8");
        serde_json::from_str(&stdout).expect("output should be JSON")
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }

    fn expect_success(&self) {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        if let Err(err) = result {
            panic!("expected success, found {err:?}");
        }
    }
}

#[fixture]
fn world() -> IngestWorld {
    IngestWorld::new()
}

// --- Given steps ---

#[given("an upstream holding one Bucegi route")]
fn upstream_with_route(#[from(world)] world: &IngestWorld) {
    let query = StubGeoQuery::with_routes(vec![bucegi_route(900)]);
    world.builder.replace(Some(StubClientBuilder::new(query)));
}

#[given("an upstream that is unavailable")]
fn upstream_unavailable(#[from(world)] world: &IngestWorld) {
    let query = StubGeoQuery::unavailable(3);
    world.builder.replace(Some(StubClientBuilder::new(query)));
}

#[given("I select the Bucegi region")]
fn select_region(#[from(world)] world: &IngestWorld) {
    world.push_args(&["--region", "bucegi"]);
}

#[given("I select relation 900")]
fn select_relation(#[from(world)] world: &IngestWorld) {
    world.push_args(&["--relation", "900"]);
}

#[given("I select a point near Busteni")]
fn select_point(#[from(world)] world: &IngestWorld) {
    world.push_args(&["--lat", "45.41", "--lon", "25.53", "--radius-km", "5"]);
}

#[given("I override the endpoint and retry settings")]
fn override_settings(#[from(world)] world: &IngestWorld) {
    world.push_args(&[
        "--endpoint",
        "http://localhost:12345/api/interpreter",
        "--request-delay-ms",
        "250",
        "--max-attempts",
        "5",
    ]);
}

// --- When steps ---

#[when("I run the ingest command")]
fn run_ingest_command(#[from(world)] world: &IngestWorld) {
    let argv = world.cli_args.borrow().clone();
    let argv: Vec<&str> = argv.iter().map(String::as_str).collect();
    let builder = world.builder.borrow();
    let builder = builder.as_ref().expect("upstream should be configured");
    let outcome = parse_ingest(&argv).and_then(|args| {
        let mut buffer = world.stdout.borrow_mut();
        run_ingest_with(args, builder, &mut *buffer)
    });
    world.result.replace(Some(outcome));
}

// --- Then steps ---

#[then("the command succeeds and reports 1 created trail")]
fn reports_created(#[from(world)] world: &IngestWorld) {
    world.expect_success();
    let output = world.output();
    assert_eq!(output["report"]["created"], 1);
    assert_eq!(output["report"]["success"], true);
    assert_eq!(output["trails"].as_array().map(Vec::len), Some(1));
}

#[then("the printed trail lists bears as a hazard")]
fn trail_has_bears(#[from(world)] world: &IngestWorld) {
    let output = world.output();
    let hazards = output["trails"][0]["hazards"]
        .as_array()
        .expect("hazards should be an array");
    assert!(hazards.iter().any(|hazard| hazard == "bears"));
}

#[then("the command succeeds and prints only the relation's trail")]
fn prints_relation(#[from(world)] world: &IngestWorld) {
    world.expect_success();
    let output = world.output();
    assert!(output.get("report").is_none());
    assert_eq!(output["trails"][0]["external_id"], 900);
    assert_eq!(output["trails"][0]["marking"]["color"], "RED");
    assert_eq!(output["trails"][0]["difficulty"], "EASY");
    assert_eq!(
        output["trails"][0]["difficulty_description"],
        "Easy walking on well-marked paths"
    );
    // The steepest step climbs about 26 %, beyond the easy grade's 10 %.
    assert_eq!(output["trails"][0]["within_grade"], false);
}

#[then("the command fails because the targets conflict")]
fn targets_conflict(#[from(world)] world: &IngestWorld) {
    match &*world.error() {
        CliError::ConflictingTargets { first, second } => {
            assert_eq!(*first, ARG_RELATION);
            assert_eq!(*second, ARG_REGION);
        }
        other => panic!("expected ConflictingTargets, found {other:?}"),
    }
    assert!(world.stdout.borrow().is_empty());
}

#[then("the command fails because the run aborted")]
fn run_aborted(#[from(world)] world: &IngestWorld) {
    match &*world.error() {
        CliError::RunAborted { message } => {
            assert!(message.contains("unavailable"), "{message}");
        }
        other => panic!("expected RunAborted, found {other:?}"),
    }
}

#[then("the printed report marks the run as unsuccessful")]
fn report_unsuccessful(#[from(world)] world: &IngestWorld) {
    let output = world.output();
    assert_eq!(output["report"]["success"], false);
    assert_eq!(output["report"]["fetched"], 0);
    assert_eq!(output["trails"].as_array().map(Vec::len), Some(0));
}

#[then("the client is built with the overridden settings")]
fn client_settings(#[from(world)] world: &IngestWorld) {
    world.expect_success();
    let builder = world.builder.borrow();
    let seen = builder
        .as_ref()
        .and_then(StubClientBuilder::seen)
        .expect("client should have been built");
    assert_eq!(seen.endpoint, "http://localhost:12345/api/interpreter");
    assert_eq!(seen.request_delay, Duration::from_millis(250));
    assert_eq!(seen.max_attempts, 5);
}

// --- Scenario registrations ---

macro_rules! register_ingest_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/ingest_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: IngestWorld) {
            let _ = world;
        }
    };
}

register_ingest_scenario!(ingesting_region, "ingesting a preset region");
register_ingest_scenario!(ingesting_relation, "ingesting a single relation");
register_ingest_scenario!(rejecting_conflicts, "rejecting conflicting targets");
register_ingest_scenario!(reporting_unavailable, "reporting an unavailable upstream");
register_ingest_scenario!(passing_settings, "passing upstream settings to the client");
