use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use archgraph_cli::{Args, run};

/// Collects all .yaml files from a directory
fn collect_yaml_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yaml")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demos are at workspace root, relative to workspace not the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

/// Writes a config file into `dir` so runs never pick up a config from the machine
fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, contents).expect("Failed to write config");
    path
}

fn args_for(input: Option<&Path>, output: &Path, store: &Path, strict: bool) -> Args {
    let config = write_config(store.parent().expect("store has a parent"), "");
    Args {
        input: input.map(|path| path.to_string_lossy().to_string()),
        output: output.to_string_lossy().to_string(),
        config: Some(config.to_string_lossy().to_string()),
        store: Some(store.to_string_lossy().to_string()),
        strict,
        watch: false,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid_demos = collect_yaml_files(demos_path());

    assert!(!valid_demos.is_empty(), "No demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let stem = demo_path.file_stem().unwrap().to_string_lossy().to_string();
        let output_path = temp_dir.path().join(format!("{stem}.json"));
        let store_path = temp_dir.path().join(format!("{stem}-store"));

        let args = args_for(Some(demo_path), &output_path, &store_path, true);
        match run(&args) {
            Ok(()) => {
                let written = fs::read_to_string(&output_path).unwrap_or_default();
                let stored = fs::read_to_string(store_path.join("c4-yaml-config.yaml"))
                    .unwrap_or_default();
                let source = fs::read_to_string(demo_path).unwrap();
                if !written.contains("\"data\"") || stored != source {
                    failed_demos.push((demo_path.clone(), "output or store not written".to_string()));
                }
            }
            Err(e) => failed_demos.push((demo_path.clone(), e.to_string())),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_yaml_files(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let stem = demo_path.file_stem().unwrap().to_string_lossy().to_string();
        let output_path = temp_dir.path().join(format!("error_{stem}.json"));
        let store_path = temp_dir.path().join(format!("error_{stem}-store"));

        let args = args_for(Some(demo_path), &output_path, &store_path, true);
        if run(&args).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
        if store_path.join("c4-yaml-config.yaml").exists() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!("✅ All {} error demos failed as expected", error_demos.len());
}

#[test]
fn e2e_stored_description_is_rendered_without_input() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let store = temp_dir.path().join("store");
    let output = temp_dir.path().join("graph.json");

    // Nothing stored yet: the built-in default is rendered
    run(&args_for(None, &output, &store, false)).expect("default renders");
    let graph: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(graph["data"]["nodes"].as_array().map(Vec::len), Some(6));
    assert_eq!(graph["data"]["edges"].as_array().map(Vec::len), Some(4));
    assert_eq!(graph["options"]["nodes"]["color"]["background"], "#006400");

    // An accepted input is stored and rendered again on the next run
    let shop = demos_path().join("online-shop.yaml");
    run(&args_for(Some(&shop), &output, &store, false)).expect("demo renders");
    fs::remove_file(&output).unwrap();

    run(&args_for(None, &output, &store, false)).expect("stored description renders");
    let graph: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let first_id = &graph["data"]["nodes"][0]["id"];
    assert_eq!(first_id, "customer");
}

#[test]
fn e2e_lenient_mode_accepts_unknown_fields() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_path().join("errors").join("unknown-field.yaml");
    let output = temp_dir.path().join("graph.json");

    run(&args_for(Some(&input), &output, &temp_dir.path().join("store"), false))
        .expect("unknown fields are ignored without --strict");
    assert!(output.exists());
}

#[test]
fn e2e_config_file_sets_storage_key() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let store = temp_dir.path().join("store");
    let output = temp_dir.path().join("graph.json");
    let shop = demos_path().join("online-shop.yaml");

    let mut args = args_for(Some(&shop), &output, &store, true);
    let config = write_config(temp_dir.path(), "[storage]\nkey = \"shop-description\"\n");
    args.config = Some(config.to_string_lossy().to_string());

    run(&args).expect("demo renders");
    assert!(store.join("shop-description.yaml").exists());
    assert!(!store.join("c4-yaml-config.yaml").exists());
}
