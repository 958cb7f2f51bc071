use bte_cli::{build_cli, load_settings, run, EXIT_FAILED, EXIT_OK};
use bte_model::Settings;
use bte_test_utils::{
    insert, layered_catalog, standard_node_types, tree_with_unconnected, write_catalog, ROLES,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    settings: Settings,
}

fn workspace(extra_role: bool) -> Workspace {
    let dir = tempfile::tempdir().unwrap();
    let jsons = dir.path().join("json");
    let types = dir.path().join("node_types");

    let mut catalog = layered_catalog();
    if extra_role {
        insert(&mut catalog, ROLES, tree_with_unconnected("Loose"));
    }
    write_catalog(&jsons, &catalog);
    standard_node_types().write(Some(types.as_path()), Path::new("unused")).unwrap();

    let settings = Settings::new()
        .with_json_folder(jsons)
        .with_node_types_folder(types);
    Workspace {
        _dir: dir,
        settings,
    }
}

fn invoke(settings: &Settings, args: &[&str]) -> (u8, String) {
    let mut argv = vec!["bte"];
    argv.extend_from_slice(args);
    let matches = build_cli().try_get_matches_from(argv).unwrap();
    let mut out = Vec::new();
    let code = run(&matches, settings, &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn test_verify_valid_collection() {
    let ws = workspace(false);
    let (code, out) = invoke(&ws.settings, &["verify"]);
    assert_eq!(code, EXIT_OK, "{out}");
    assert!(out.contains("ok    strategies/Attack.json"));
    assert!(out.contains("ok    roles/Striker.json"));
    assert!(out.ends_with("3 trees verified, 0 failed\n"));
}

#[test]
fn test_verify_reports_failures() {
    let ws = workspace(true);
    let (code, out) = invoke(&ws.settings, &["verify", "--math-only"]);
    assert_eq!(code, EXIT_FAILED);
    assert!(out.contains("FAIL  roles/Loose.json"));
    assert!(out.contains("The node z is unconnected in tree Loose"));
    assert!(out.ends_with("4 trees verified, 1 failed\n"));
}

#[test]
fn test_verify_category_override() {
    let ws = workspace(false);
    let (code, out) = invoke(&ws.settings, &["verify", "--category", "strategies"]);
    assert_eq!(code, EXIT_FAILED);
    assert!(out.contains("ok    strategies/Attack.json"));
    assert!(out.contains("root node was supposed to be a strategies but was a tactics"));
}

#[test]
fn test_list() {
    let ws = workspace(false);
    let (code, out) = invoke(&ws.settings, &["list"]);
    assert_eq!(code, EXIT_OK);
    assert_eq!(
        out,
        "keeper/\nroles/\n  Striker.json\nstrategies/\n  Attack.json\ntactics/\n  Offend.json\n"
    );
}

#[test]
fn test_node_types_by_name() {
    let ws = workspace(false);
    let (code, out) = invoke(&ws.settings, &["node-types", "--name", "Kick"]);
    assert_eq!(code, EXIT_OK);
    assert_eq!(out, "skills: Kick, power\n");

    let (code, _) = invoke(&ws.settings, &["node-types", "--name", "Nope"]);
    assert_eq!(code, EXIT_FAILED);
}

#[test]
fn test_new_id() {
    let (code, out) = invoke(&Settings::default(), &["new-id", "--size", "5"]);
    assert_eq!(code, EXIT_OK);
    let id = out.trim_end();
    assert_eq!(id.len(), 5);
    assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
}

#[test]
fn test_fmt_to_other_directory() {
    let ws = workspace(false);
    let out_dir = tempfile::tempdir().unwrap();
    let target = out_dir.path().to_str().unwrap();

    let (code, out) = invoke(&ws.settings, &["fmt", "--out", target]);
    assert_eq!(code, EXIT_OK, "{out}");
    assert!(out_dir.path().join("tactics").join("Offend.json").is_file());
}

#[test]
fn test_explicit_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    Settings::new().with_id_size(11).save(&path).unwrap();

    let settings = load_settings(Some(path.as_path())).unwrap();
    assert_eq!(settings.default_id_size, 11);
    assert!(load_settings(Some(dir.path().join("missing.json").as_path())).is_err());
}
