mod common;

use common::{block, TckTree};
use sparkplug_report::report::MAIN_GROUP;
use sparkplug_report::{AssertionUniverse, Profile, ReportError, ReportGenerator};

fn result_of<'a>(
    report: &'a sparkplug_report::ConformanceReport,
    profile: Profile,
    id: &str,
) -> Option<&'a str> {
    report
        .profile(profile)
        .and_then(|p| p.row(id))
        .and_then(|row| row.outcome.as_ref())
        .map(|o| o.result.as_str())
}

#[test]
fn universe_is_built_from_profile_and_monitor_modules() {
    let tree = TckTree::new();
    let universe = AssertionUniverse::discover(&tree.config()).unwrap();

    let host: Vec<&str> = universe.ids(Profile::Host).collect();
    assert_eq!(
        host,
        vec!["ID_HOST_TOPIC_PHID", "ID_NBIRTH_001", "ID_PAYLOADS_TIMESTAMP_IN_UTC"]
    );

    let edge: Vec<&str> = universe.ids(Profile::Edge).collect();
    assert_eq!(
        edge,
        vec![
            "ID_PAYLOADS_NBIRTH_SEQ",
            "ID_PAYLOADS_TEMPLATE_DEFINITION",
            "ID_PAYLOADS_TIMESTAMP_IN_UTC",
            "ID_TOPICS_NBIRTH_MQTT",
            "ID_TOPICS_NDATA_MQTT",
            "ID_TOPICS_NDATA_SEQ_NUM",
            "ID_TOPIC_RECOMMENDED",
        ]
    );

    let broker: Vec<&str> = universe.ids(Profile::Broker).collect();
    assert_eq!(
        broker,
        vec!["ID_CONFORMANCE_MQTT_AWARE_STORE", "ID_CONFORMANCE_MQTT_QOS0"]
    );

    assert!(universe.profiles_of("ID_NEVER_REPORTED").is_empty());
    assert_eq!(universe.catalog().len(), 8);
}

#[test]
fn single_block_records_outcome() {
    let tree = TckTree::new();
    let log = tree.write_log(&block(
        "Host",
        "SessionEstablishment",
        &[("NBIRTH-001", "PASS")],
    ));

    let report = ReportGenerator::new(tree.config()).run(&log, "2023-01-10").unwrap();
    let row = report.profile(Profile::Host).unwrap().row("ID_NBIRTH_001").unwrap();
    let outcome = row.outcome.as_ref().unwrap();
    assert_eq!(outcome.test, "SessionEstablishment");
    assert_eq!(outcome.timestamp, "2023-01-10 09:00:00.000");
    assert_eq!(outcome.result, "PASS");

    let html = std::fs::read_to_string(tree.output_path()).unwrap();
    assert!(html.contains(
        "<tr><td>ID_NBIRTH_001</td><td>MUST</td><td>SessionEstablishment</td><td>2023-01-10 09:00:00.000</td><td>PASS</td></tr>"
    ));
}

#[test]
fn repeated_run_keeps_failure_and_warns() {
    let tree = TckTree::new();
    let log = format!(
        "{}{}",
        block("Host", "SessionEstablishment", &[("ID_NBIRTH_001", "FAIL")]),
        block("Host", "SessionEstablishment", &[("ID_NBIRTH_001", "PASS")]),
    );
    let log = tree.write_log(&log);

    let report = ReportGenerator::new(tree.config()).run(&log, "now").unwrap();
    assert_eq!(result_of(&report, Profile::Host, "ID_NBIRTH_001"), Some("FAIL"));
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("Host.SessionEstablishment logged more than once"));

    let html = std::fs::read_to_string(tree.output_path()).unwrap();
    assert!(html.contains("Host.SessionEstablishment logged more than once"));
}

#[test]
fn repeated_run_warns_even_without_conflict() {
    let tree = TckTree::new();
    let log = format!(
        "{}{}",
        block("Edge", "SendData", &[("ID_TOPICS_NBIRTH_MQTT", "PASS")]),
        block("Edge", "SendData", &[("ID_TOPICS_NBIRTH_MQTT", "PASS")]),
    );

    let generator = ReportGenerator::new(tree.config());
    let universe = generator.build_universe().unwrap();
    let report = generator.generate(&universe, &log, "now").unwrap();
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(result_of(&report, Profile::Edge, "ID_TOPICS_NBIRTH_MQTT"), Some("PASS"));
}

#[test]
fn failure_is_never_overwritten_across_tests() {
    let tree = TckTree::new();
    let log = format!(
        "{}{}{}",
        block("Edge", "SendData", &[("ID_TOPIC_RECOMMENDED", "PASS")]),
        block("Edge", "SendComplexData", &[("ID_TOPIC_RECOMMENDED", "FAIL: bad topic")]),
        block("Edge", "SessionTermination", &[("ID_TOPIC_RECOMMENDED", "PASS")]),
    );

    let generator = ReportGenerator::new(tree.config());
    let universe = generator.build_universe().unwrap();
    let report = generator.generate(&universe, &log, "now").unwrap();

    let row = report.profile(Profile::Edge).unwrap().row("ID_TOPIC_RECOMMENDED").unwrap();
    let outcome = row.outcome.as_ref().unwrap();
    assert_eq!(outcome.result, "FAIL: bad topic");
    assert_eq!(outcome.test, "SendComplexData");
    assert!(report.warnings.is_empty());
}

#[test]
fn shared_monitor_ids_are_recorded_in_both_profiles() {
    let tree = TckTree::new();
    let log = format!(
        "{}{}",
        block("Edge", "SendData", &[("Monitor:ID_PAYLOADS_TIMESTAMP_IN_UTC", "PASS")]),
        block("Host", "SessionEstablishment", &[("ID_PAYLOADS_NBIRTH_SEQ", "FAIL")]),
    );

    let generator = ReportGenerator::new(tree.config());
    let universe = generator.build_universe().unwrap();
    let report = generator.generate(&universe, &log, "now").unwrap();

    assert_eq!(result_of(&report, Profile::Edge, "ID_PAYLOADS_TIMESTAMP_IN_UTC"), Some("PASS"));
    assert_eq!(result_of(&report, Profile::Host, "ID_PAYLOADS_TIMESTAMP_IN_UTC"), Some("PASS"));

    // Edge-only monitor id logged during a Host test is rerouted.
    assert_eq!(result_of(&report, Profile::Edge, "ID_PAYLOADS_NBIRTH_SEQ"), Some("FAIL"));
    assert!(report.profile(Profile::Host).unwrap().row("ID_PAYLOADS_NBIRTH_SEQ").is_none());
}

#[test]
fn unknown_ids_and_profiles_are_discarded() {
    let tree = TckTree::new();
    let log = format!(
        "{}{}",
        block("Edge", "SendData", &[("ID_NOT_DECLARED", "PASS"), ("ID_TOPIC_RECOMMENDED", "PASS")]),
        block("Gateway", "SendData", &[("ID_TOPICS_NBIRTH_MQTT", "FAIL")]),
    );

    let generator = ReportGenerator::new(tree.config());
    let universe = generator.build_universe().unwrap();
    let report = generator.generate(&universe, &log, "now").unwrap();

    assert_eq!(result_of(&report, Profile::Edge, "ID_TOPIC_RECOMMENDED"), Some("PASS"));
    assert_eq!(result_of(&report, Profile::Edge, "ID_TOPICS_NBIRTH_MQTT"), None);
    assert!(report.profile(Profile::Edge).unwrap().row("ID_NOT_DECLARED").is_none());
}

#[test]
fn quoted_array_ids_receive_log_outcomes() {
    let tree = TckTree::new();
    let log = tree.write_log(&block(
        "Edge",
        "SendNodeData",
        &[("topics-ndata-mqtt", "PASS"), ("topics-ndata-seq-num", "FAIL: gap")],
    ));

    let report = ReportGenerator::new(tree.config()).run(&log, "now").unwrap();
    assert_eq!(result_of(&report, Profile::Edge, "ID_TOPICS_NDATA_MQTT"), Some("PASS"));
    assert_eq!(
        result_of(&report, Profile::Edge, "ID_TOPICS_NDATA_SEQ_NUM"),
        Some("FAIL: gap")
    );

    let edge = report.profile(Profile::Edge).unwrap();
    assert!(edge.groups.iter().flat_map(|g| &g.rows).all(|r| !r.id.contains('"')));

    let html = std::fs::read_to_string(tree.output_path()).unwrap();
    assert!(!html.contains("&quot;topics-"));
}

#[test]
fn template_assertions_are_optional() {
    let tree = TckTree::new();
    let log = tree.write_log(&block(
        "Edge",
        "SendData",
        &[
            ("ID_PAYLOADS_TEMPLATE_DEFINITION", "PASS"),
            ("ID_TOPICS_NBIRTH_MQTT", "PASS"),
        ],
    ));

    let report = ReportGenerator::new(tree.config()).run(&log, "now").unwrap();
    let edge = report.profile(Profile::Edge).unwrap();

    let templates = edge.group("Templates").unwrap();
    let row = templates.row("ID_PAYLOADS_TEMPLATE_DEFINITION").unwrap();
    assert!(row.assertion_type.optional);
    assert_eq!(row.assertion_type.to_string(), "MUST optional");
    assert_eq!(templates.stats.optional_count, 1);
    assert_eq!(templates.stats.percent_passed_without_optional, 0);

    let main = edge.group(MAIN_GROUP).unwrap();
    assert!(main.row("ID_PAYLOADS_TEMPLATE_DEFINITION").is_none());
    assert_eq!(main.stats.count, 6);
    assert_eq!(main.stats.passed, 1);
    assert_eq!(main.stats.percent_passed, 16);
    // ID_TOPIC_RECOMMENDED is a SHOULD, so it leaves the mandatory denominator.
    assert_eq!(main.stats.optional_count, 1);
    assert_eq!(main.stats.percent_passed_without_optional, 20);

    let broker = report.profile(Profile::Broker).unwrap();
    assert!(broker.group("Aware").is_some());
}

#[test]
fn unobserved_assertions_render_empty_cells() {
    let tree = TckTree::new();
    let log = tree.write_log("no summary blocks in this log\n");

    ReportGenerator::new(tree.config()).run(&log, "now").unwrap();
    let html = std::fs::read_to_string(tree.output_path()).unwrap();
    assert!(html.contains(
        "<tr><td>ID_CONFORMANCE_MQTT_QOS0</td><td>MUST</td><td></td><td></td><td></td></tr>"
    ));
    assert!(html.contains(
        "<tr><td>ID_HOST_TOPIC_PHID</td><td>MUST</td><td></td><td></td><td></td></tr>"
    ));
    assert!(html.contains("<h3>Overall count: 12</h3>"));
}

#[test]
fn identical_input_gives_identical_report() {
    let tree = TckTree::new();
    let log = format!(
        "{}{}",
        block("Edge", "SendData", &[("ID_TOPIC_RECOMMENDED", "PASS")]),
        block("Host", "SessionEstablishment", &[("ID_NBIRTH_001", "FAIL")]),
    );

    let generator = ReportGenerator::new(tree.config());
    let universe = generator.build_universe().unwrap();
    let first = generator.generate(&universe, &log, "now").unwrap();
    let second = generator.generate(&universe, &log, "now").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.render_html(), second.render_html());
    assert_eq!(first.generate_json().unwrap(), second.generate_json().unwrap());
}

#[test]
fn json_rendition_is_written_when_configured() {
    let tree = TckTree::new();
    let json_path = tree.root().join("report/summary.json");
    let config = tree.config().with_json_output(&json_path);
    let log = tree.write_log(&block(
        "Broker",
        "AwareBroker",
        &[("ID_CONFORMANCE_MQTT_QOS0", "PASS")],
    ));

    ReportGenerator::new(config).run(&log, "now").unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(json["profiles"][0]["profile"], "Broker");
    assert_eq!(json["profiles"][0]["groups"][0]["stats"]["passed"], 1);
}

#[test]
fn unreadable_log_writes_no_report() {
    let tree = TckTree::new();
    let err = ReportGenerator::new(tree.config())
        .run(&tree.root().join("missing.log"), "now")
        .unwrap_err();
    assert!(matches!(err, ReportError::ReadFailed { .. }));
    assert!(!tree.output_path().exists());
}

#[test]
fn unterminated_block_writes_no_report() {
    let tree = TckTree::new();
    let log = tree.write_log(
        "2023-01-10 09:00:00.000 Summary Test Results for Edge SendData\nID_TOPIC_RECOMMENDED: PASS;\n",
    );
    let err = ReportGenerator::new(tree.config()).run(&log, "now").unwrap_err();
    assert!(err.is_malformed_log());
    assert!(!tree.output_path().exists());
}

#[test]
fn description_without_keyword_is_fatal() {
    let requirements = common::REQUIREMENTS_SOURCE.replace(
        "The broker MUST support QoS 0.",
        "The broker supports QoS 0.",
    );
    let tree = TckTree::with_requirements(&requirements);
    let log = tree.write_log("");

    let err = ReportGenerator::new(tree.config()).run(&log, "now").unwrap_err();
    match err {
        ReportError::MissingNormativeKeyword { id, .. } => {
            assert_eq!(id, "ID_CONFORMANCE_MQTT_QOS0");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!tree.output_path().exists());
}
