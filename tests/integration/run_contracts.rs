use metapush::{MetapushError, Mismatch, MismatchKind};
use serde_json::json;

use crate::integration::support::{context, Workspace};

#[test]
fn csv_content_fills_template_fields() {
    let ws = Workspace::new();
    let csv = ws.content(
        "columns.csv",
        "layer,column,description,units\n\
         sites,id,Site identifier,\n\
         sites,lat,Latitude,degrees\n",
    );

    let report = context().execute(&ws.args(vec![csv])).unwrap();
    assert_eq!(report.fields_updated, 2);
    assert!(report.mismatches.is_empty());
    assert_eq!(report.exit_code(), 0);

    let merged = ws.read_output();
    let sites = merged.table("sites").unwrap();
    let id = sites.field("id").unwrap();
    assert_eq!(id.attributes.get("description"), Some(&json!("Site identifier")));
    assert_eq!(id.attributes.get("type"), Some(&json!("integer")));
    let lat = sites.field("lat").unwrap();
    assert_eq!(lat.attributes.get("units"), Some(&json!("degrees")));
    let area = merged.table("plots").unwrap().field("area").unwrap();
    assert_eq!(area.attributes.len(), 1);
}

#[test]
fn unknown_table_is_reported_and_rest_is_merged() {
    let ws = Workspace::new();
    let content = ws.content(
        "content.yaml",
        "bar:\n  foo: lost\nsites:\n  lat: Latitude\n",
    );

    let report = context().execute(&ws.args(vec![content])).unwrap();
    assert_eq!(
        report.mismatches,
        vec![Mismatch::content(MismatchKind::UnknownTable, "bar", Some("foo"))]
    );

    let merged = ws.read_output();
    assert!(merged.table("bar").is_none());
    let lat = merged.table("sites").unwrap().field("lat").unwrap();
    assert_eq!(lat.attributes.get("description"), Some(&json!("Latitude")));
}

#[test]
fn later_content_sources_win() {
    let ws = Workspace::new();
    let first = ws.content("a.yaml", "sites:\n  id:\n    description: first\n    units: none\n");
    let second = ws.content("b.json", r#"{"sites": {"id": "second"}}"#);

    let report = context().execute(&ws.args(vec![first, second])).unwrap();
    assert_eq!(report.content_sources, 2);

    let merged = ws.read_output();
    let id = merged.table("sites").unwrap().field("id").unwrap();
    assert_eq!(id.attributes.get("description"), Some(&json!("second")));
    assert_eq!(id.attributes.get("units"), Some(&json!("none")));
}

#[test]
fn tables_filter_leaves_other_tables_untouched() {
    let ws = Workspace::new();
    let content = ws.content(
        "content.yaml",
        "sites:\n  id: changed\nplots:\n  area: Plot area\n",
    );
    let mut args = ws.args(vec![content]);
    args.tables = Some(vec!["plots".to_string()]);
    args.no_template_attributes = true;

    context().execute(&args).unwrap();
    let merged = ws.read_output();

    let id = merged.table("sites").unwrap().field("id").unwrap();
    assert_eq!(id.attributes.get("description"), Some(&json!("template id")));
    assert_eq!(id.attributes.get("type"), Some(&json!("integer")));
    let area = merged.table("plots").unwrap().field("area").unwrap();
    assert_eq!(area.attributes.len(), 1);
    assert_eq!(area.attributes.get("description"), Some(&json!("Plot area")));
}

#[test]
fn malformed_template_aborts_before_write() {
    let ws = Workspace::new();
    std::fs::write(&ws.template, "tables: [unclosed").unwrap();
    let content = ws.content("content.yaml", "sites:\n  id: x\n");

    let err = context().execute(&ws.args(vec![content])).unwrap_err();
    assert!(matches!(err, MetapushError::InputRead { .. }));
    assert!(!ws.output.exists());
}

#[test]
fn missing_content_is_input_error() {
    let ws = Workspace::new();
    let missing = ws.dir.path().join("missing.csv");
    let err = context().execute(&ws.args(vec![missing])).unwrap_err();
    assert!(matches!(err, MetapushError::InputRead { .. }));
    assert!(!ws.output.exists());
}
