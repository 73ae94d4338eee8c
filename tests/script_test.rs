use std::fs;

use anyhow::Result;
use layerdeck::services::script::{run_script, ScriptReport};
use layerdeck::{LayerId, Position, Workspace};
use tempfile::tempdir;

const TOUR: &str = "\
# a small tour
root home Home
connect home right inbox Inbox
connect inbox right archive Archive
connect home above notes Notes

goto 2 0 0
back
back
focus archive
index 0
nav forward
nav last
remove 0 0 1
";

#[test]
fn tour_script_ends_where_expected() -> Result<()> {
    let temp_root = tempdir()?;
    let script_path = temp_root.path().join("tour.txt");
    fs::write(&script_path, TOUR)?;

    let text = fs::read_to_string(&script_path)?;
    let mut workspace: Workspace<String> = Workspace::default();
    let report = run_script(&mut workspace, &text, true)?;

    assert_eq!(report.failed, Vec::new());
    assert_eq!(report.applied, 12);
    assert!(workspace.get(&LayerId::from("notes")).is_none());
    assert!(workspace.get_at(Position::new(0, 0, 1)).is_none());
    assert_eq!(workspace.len(), 3);
    assert_eq!(
        workspace.active().map(|node| node.id.as_str()),
        Some("home")
    );
    Ok(())
}

#[test]
fn empty_script_does_nothing() -> Result<()> {
    let mut workspace: Workspace<String> = Workspace::default();
    let report = run_script(&mut workspace, "\n# nothing here\n", true)?;
    assert_eq!(report, ScriptReport::default());
    assert!(workspace.is_empty());
    Ok(())
}
