use metapush::MetapushError;
use std::fs;

use crate::integration::support::{context, write_file, Workspace};

#[test]
fn existing_output_without_overwrite_fails_and_is_untouched() {
    let ws = Workspace::new();
    fs::write(&ws.output, "keep me").unwrap();
    let content = ws.content("content.yaml", "sites:\n  id: x\n");

    let err = context().execute(&ws.args(vec![content])).unwrap_err();
    assert!(matches!(err, MetapushError::OutputExists(_)));
    assert_eq!(fs::read_to_string(&ws.output).unwrap(), "keep me");
}

#[test]
fn existing_output_is_checked_before_inputs_are_read() {
    let ws = Workspace::new();
    fs::write(&ws.output, "keep me").unwrap();
    let missing = ws.dir.path().join("missing.csv");

    let err = context().execute(&ws.args(vec![missing])).unwrap_err();
    assert!(matches!(err, MetapushError::OutputExists(_)));
}

#[test]
fn overwrite_replaces_existing_output() {
    let ws = Workspace::new();
    fs::write(&ws.output, "old").unwrap();
    let content = ws.content("content.yaml", "sites:\n  id: new\n");
    let mut args = ws.args(vec![content]);
    args.overwrite = true;

    context().execute(&args).unwrap();
    let merged = ws.read_output();
    assert_eq!(merged.tables.len(), 2);
}

#[test]
fn rerun_produces_identical_output() {
    let ws = Workspace::new();
    let content = ws.content(
        "columns.csv",
        "table,field,description\nsites,id,Identifier\nplots,area,Area\n",
    );
    let mut args = ws.args(vec![content]);
    args.overwrite = true;

    context().execute(&args).unwrap();
    let first = fs::read(&ws.output).unwrap();
    context().execute(&args).unwrap();
    let second = fs::read(&ws.output).unwrap();
    assert_eq!(first, second);
}

#[test]
fn output_format_follows_extension() {
    let ws = Workspace::new();
    let content = ws.content("content.yaml", "sites:\n  id: x\n");
    let mut args = ws.args(vec![content]);
    args.output = ws.dir.path().join("merged.toml");

    context().execute(&args).unwrap();
    let text = fs::read_to_string(&args.output).unwrap();
    let parsed: metapush::Template = toml::from_str(&text).unwrap();
    assert_eq!(parsed.tables[0].name, "sites");
}

#[test]
fn json_template_with_toml_content() {
    let ws = Workspace::new();
    let template = write_file(
        ws.dir.path(),
        "template.json",
        r#"{"tables": [{"name": "wells", "fields": [{"name": "depth", "type": "float"}]}]}"#,
    );
    let content = ws.content("content.toml", "[wells.depth]\nunits = \"m\"\n");
    let mut args = ws.args(vec![content]);
    args.template = template;

    let report = context().execute(&args).unwrap();
    assert_eq!(report.fields_updated, 1);
    let merged = ws.read_output();
    let depth = merged.table("wells").unwrap().field("depth").unwrap();
    assert_eq!(depth.attributes.get("units"), Some(&serde_json::json!("m")));
}

#[test]
fn empty_content_entry_still_writes_toml() {
    let ws = Workspace::new();
    let content = ws.content("content.yaml", "sites:\n  id:\n  lat: Latitude\n");
    let mut args = ws.args(vec![content]);
    args.output = ws.dir.path().join("merged.toml");

    let report = context().execute(&args).unwrap();
    assert_eq!(report.fields_updated, 1);
    let parsed: metapush::Template =
        toml::from_str(&fs::read_to_string(&args.output).unwrap()).unwrap();
    let id = parsed.table("sites").unwrap().field("id").unwrap();
    assert_eq!(
        id.attributes.get("description"),
        Some(&serde_json::json!("template id"))
    );
}

#[test]
fn name_column_does_not_corrupt_output() {
    let ws = Workspace::new();
    let content = ws.content(
        "columns.csv",
        "table,field,name,description\nsites,id,Site ID,Identifier\n",
    );

    context().execute(&ws.args(vec![content])).unwrap();
    let merged = ws.read_output();
    let id = merged.table("sites").unwrap().field("id").unwrap();
    assert_eq!(id.name, "id");
    assert_eq!(
        id.attributes.get("description"),
        Some(&serde_json::json!("Identifier"))
    );
    assert!(!id.attributes.contains_key("name"));
}
