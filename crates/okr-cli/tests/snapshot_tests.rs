use std::io::Write;

use okr_cli::{check, load_options, run_build, OutputFormat, Overrides, Snapshot};
use okr_test_utils::*;
use okr_tree::{ProjectStatus, SortColumn, SortDirection, TreeError};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

const SNAPSHOT: &str = r#"{
  "people": [
    { "id": "me", "full_name": "Mary Maker" },
    { "id": "other", "full_name": "Otto Other" }
  ],
  "goals": [
    {
      "id": "g1",
      "name": "Grow revenue",
      "space": { "id": "company", "name": "Company" },
      "champion": { "id": "other", "full_name": "Otto Other" },
      "is_closed": true,
      "closed_at": "2024-06-30T17:00:00Z"
    },
    {
      "id": "g2",
      "name": "Win enterprise deals",
      "space": { "id": "sales", "name": "Sales" },
      "champion": { "id": "me", "full_name": "Mary Maker" },
      "parent_goal_id": "g1",
      "timeframe": { "start_date": "2024-04-01", "end_date": "2024-06-30", "type": "quarter" },
      "progress": 40.0
    },
    {
      "id": "g3",
      "name": "Hire account executives",
      "space": { "id": "sales", "name": "Sales" },
      "parent_goal_id": "g2"
    }
  ],
  "projects": [
    {
      "id": "p1",
      "name": "Pilot with Acme",
      "space": { "id": "sales", "name": "Sales" },
      "goal_id": "g2",
      "status": "paused",
      "milestones": [
        { "title": "Kickoff", "status": "done" },
        { "title": "Contract" }
      ]
    }
  ]
}"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_snapshot_from_json() {
    let file = write_temp(SNAPSHOT);

    let snapshot = Snapshot::load(file.path()).unwrap();

    assert_eq!(snapshot.people.len(), 2);
    assert_eq!(snapshot.goals.len(), 3);
    assert_eq!(snapshot.projects[0].status, ProjectStatus::Paused);
    assert_eq!(snapshot.projects[0].milestone_counts(), (1, 2));
    assert_eq!(snapshot.person("me").unwrap().full_name, "Mary Maker");
}

#[test]
fn malformed_snapshot_names_the_file() {
    let file = write_temp("{ not json");

    let err = Snapshot::load(file.path()).unwrap_err();

    assert!(format!("{err:#}").contains("failed to parse snapshot"));
}

#[test]
fn missing_options_file_falls_back_to_defaults() {
    let options = load_options(None).unwrap();
    assert!(options.show_active);
    assert!(options.show_goals);
    assert!(!options.show_projects);
}

#[test]
fn loads_options_from_toml() {
    let file = write_temp(
        r#"
sort_column = "progress"
sort_direction = "desc"
show_projects = true
show_paused = true

[timeframe]
start_date = "2024-01-01"
end_date = "2024-12-31"
type = "year"
"#,
    );

    let options = load_options(Some(file.path())).unwrap();

    assert_eq!(options.sort_column, SortColumn::Progress);
    assert_eq!(options.sort_direction, SortDirection::Desc);
    assert!(options.show_projects && options.show_paused && options.show_active);
    assert_eq!(options.timeframe.unwrap().start_date, date(2024, 1, 1));
}

#[test]
fn builds_outline_with_closed_context() {
    let snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();
    let options = Overrides {
        show_projects: true,
        show_paused: true,
        ..Overrides::default()
    }
    .apply(load_options(None).unwrap());

    let out = run_build(&snapshot, &options, None, OutputFormat::Outline).unwrap();

    assert_eq!(
        out,
        "Grow revenue (closed)\n  \
         Win enterprise deals\n    \
         Hire account executives\n    \
         [project] Pilot with Acme\n"
    );
}

#[test]
fn owned_by_me_resolves_user_from_snapshot() {
    let snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();
    let options = Overrides {
        owned_by_me: true,
        goal: Some("g1".into()),
        ..Overrides::default()
    }
    .apply(load_options(None).unwrap());

    let out = run_build(&snapshot, &options, Some("me"), OutputFormat::Outline).unwrap();
    assert_eq!(out, "Win enterprise deals\n  Hire account executives\n");

    let err = run_build(&snapshot, &options, Some("nobody"), OutputFormat::Outline).unwrap_err();
    assert!(err.to_string().contains("unknown user nobody"));

    let err = run_build(&snapshot, &options, None, OutputFormat::Outline).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TreeError>(),
        Some(TreeError::MissingCurrentUser { .. })
    ));
}

#[test]
fn user_is_only_resolved_for_me_filters() {
    let snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();
    let options = load_options(None).unwrap();

    let out = run_build(&snapshot, &options, Some("nobody"), OutputFormat::Outline).unwrap();

    assert_eq!(out, "Grow revenue (closed)\n  Win enterprise deals\n    Hire account executives\n");
}

#[test]
fn json_output_carries_node_details() {
    let snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();
    let options = Overrides {
        space: Some("sales".into()),
        ..Overrides::default()
    }
    .apply(load_options(None).unwrap());

    let out = run_build(&snapshot, &options, None, OutputFormat::Json).unwrap();
    let forest: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(forest[0]["id"], "g1");
    assert_eq!(forest[0]["matches_filters"], false);
    assert_eq!(forest[0]["children"][0]["id"], "g2");
    assert_eq!(forest[0]["children"][0]["depth"], 1);
    assert_eq!(forest[0]["children"][0]["matches_filters"], true);
}

#[test]
fn check_reports_dangling_and_duplicates() {
    let snapshot = Snapshot {
        people: vec![me()],
        goals: vec![
            create_goal("g1", None),
            create_goal("g1", None),
            create_goal("g2", Some("gone")),
        ],
        projects: vec![create_project("p1", Some("missing")), create_project("p2", Some("g1"))],
    };

    let report = check(&snapshot);

    assert!(report.passed());
    assert_eq!(
        report.dangling,
        vec![
            ("g2".to_string(), "gone".to_string()),
            ("p1".to_string(), "missing".to_string()),
        ]
    );
    assert_eq!(report.duplicate_goals, vec!["g1"]);
    assert!(report.duplicate_projects.is_empty());
    assert!(report.to_string().contains("Result: PASS"));
}

#[test]
fn check_fails_on_cycles() {
    let snapshot = Snapshot {
        goals: vec![create_goal("a", Some("b")), create_goal("b", Some("a"))],
        ..Snapshot::default()
    };

    let report = check(&snapshot);

    assert!(!report.passed());
    assert!(matches!(report.fatal, Some(TreeError::CycleDetected { .. })));
    assert!(report.to_string().contains("Result: FAIL (parent goal cycle detected at"));
}
