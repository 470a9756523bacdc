//! Integration tests for perfdata parsing and request resolution

use pretty_assertions::assert_eq;
use rrd_graph_templates::perfdata;
use rrd_graph_templates::{render_request, GraphRequest, RenderConfig, RequestError};

#[test]
fn test_plugin_output_line() {
    let line = "OK - 5 connections | 'active conns'=20;;;0; established=8c;;;0;";
    let values = perfdata::parse(perfdata::split_output(line)).expect("Should parse");

    assert_eq!(values.len(), 2);
    assert_eq!(values[0].label, "active conns");
    assert_eq!(values[0].min, Some(0.0));
    assert_eq!(values[1].unit.as_deref(), Some("c"));
}

#[test]
fn test_unknown_value() {
    let values = perfdata::parse("offset=U;5;10").expect("Should parse");
    assert_eq!(values[0].value, None);
    assert_eq!(values[0].warning(), Some(5.0));
    assert_eq!(values[0].critical(), Some(10.0));
}

#[test]
fn test_error_report_points_into_input() {
    let input = "offset=0.3s;5;10 bad";
    let err = perfdata::parse(input).expect_err("Should fail");
    assert!(err.span().start >= "offset=0.3s;5;10 ".len());

    let report = err.format(input, "perfdata");
    assert!(report.contains("perfdata"));
}

#[test]
fn test_request_to_pnp_strings() {
    let request = GraphRequest::from_str(
        r#"
        template = "check_mk-systemtime"
        host = "web01"
        service = "System Time"
        perfdata = "offset=0.3s;5;10;;"
        rrd_dir = "/var/lib/pnp4nagios/perfdata"
        "#,
    )
    .expect("Should parse request");

    let text = render_request(&request, &RenderConfig::default()).expect("Should render");
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("--vertical-label 'offset (s)' -l -10 -u 10 --title 'web01: system time offset to Nagios'")
    );
    let def = lines.next().expect("Should have directives");
    assert!(def.starts_with(
        "DEF:offset_max=/var/lib/pnp4nagios/perfdata/web01/System_Time_offset.rrd:1:MAX "
    ));
    assert_eq!(lines.next(), None);
}

#[test]
fn test_request_missing_threshold() {
    let request = GraphRequest::from_str(
        r#"
        template = "systemtime"
        host = "web01"
        perfdata = "offset=0.3s"
        "#,
    )
    .expect("Should parse request");

    let err = render_request(&request, &RenderConfig::default()).expect_err("Should fail");
    assert!(err.to_string().contains("warning threshold"));
}

#[test]
fn test_request_with_unbounded_thresholds() {
    let request = GraphRequest::from_str(
        r#"
        template = "systemtime"
        host = "web01"
        perfdata = "offset=0.3s;~:;~:;;"
        "#,
    )
    .expect("Should parse request");

    let err = render_request(&request, &RenderConfig::default()).expect_err("Should fail");
    assert!(err.to_string().contains("warning threshold"));
}

#[test]
fn test_request_with_bad_perfdata() {
    let mut request = GraphRequest::new("systemtime", "web01");
    request.perfdata = Some("offset=;5".to_string());

    let err = request
        .to_context(Default::default())
        .expect_err("Should fail");
    assert!(matches!(err, RequestError::Perfdata { .. }));
}
