use metapush::tooling::{format_report, DataCheck};
use metapush::{Mismatch, MismatchKind};
use std::fs;

use crate::integration::support::{context, Workspace};

#[test]
fn missing_data_dir_still_writes_output() {
    let ws = Workspace::new();
    let content = ws.content("content.yaml", "sites:\n  id: x\n");
    let mut args = ws.args(vec![content]);
    args.data = Some(ws.dir.path().join("no-such-data"));

    let report = context().execute(&args).unwrap();
    assert!(matches!(report.data_check, DataCheck::Failed { .. }));
    assert_eq!(report.exit_code(), 2);
    assert!(ws.output.exists());
}

#[test]
fn data_dir_mismatches_are_reported() {
    let ws = Workspace::new();
    let data = ws.dir.path().join("data");
    fs::create_dir_all(data.join("sites")).unwrap();
    fs::write(data.join("sites").join("id.csv"), "").unwrap();
    fs::write(data.join("sites").join("elev.csv"), "").unwrap();
    fs::write(data.join("soils.csv"), "code,name\n").unwrap();

    let content = ws.content("content.yaml", "sites:\n  id: x\n");
    let mut args = ws.args(vec![content]);
    args.data = Some(data.clone());

    let report = context().execute(&args).unwrap();
    assert_eq!(report.data_check, DataCheck::Checked { path: data });
    assert_eq!(
        report.mismatches,
        vec![
            Mismatch::data(MismatchKind::MissingFromData, "sites", Some("lat")),
            Mismatch::data(MismatchKind::MissingFromTemplate, "sites", Some("elev")),
            Mismatch::data(MismatchKind::MissingFromData, "plots", None),
            Mismatch::data(MismatchKind::MissingFromTemplate, "soils", None),
        ]
    );
    assert_eq!(report.exit_code(), 0);

    let text = format_report(&report, "text", false);
    assert!(text.contains("Mismatches (4)"));
    assert!(text.contains("sites.elev"));
}

#[test]
fn tables_filter_restricts_data_check() {
    let ws = Workspace::new();
    let data = ws.dir.path().join("data");
    fs::create_dir_all(data.join("plots")).unwrap();
    fs::write(data.join("plots").join("area.txt"), "").unwrap();
    fs::create_dir_all(data.join("other")).unwrap();

    let content = ws.content("content.yaml", "plots:\n  area: Area\n");
    let mut args = ws.args(vec![content]);
    args.data = Some(data);
    args.tables = Some(vec!["plots".to_string()]);

    let report = context().execute(&args).unwrap();
    assert!(report.mismatches.is_empty());
}
