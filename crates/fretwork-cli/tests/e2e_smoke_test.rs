use std::{fs, path::PathBuf};

use tempfile::tempdir;

use fretwork_cli::{Args, run, run_with_output};

/// Demos are at workspace root, relative to workspace not the crate
fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

/// Collects all .xml files from a directory
fn collect_xml_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("xml")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args_for(input: &PathBuf, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
        colors: false,
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_xml_files(demos_dir());
    assert!(!valid_demos.is_empty(), "No demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!("{}.svg", demo_path.file_stem().unwrap().to_string_lossy());
        let output_path = temp_dir.path().join(output_filename);

        let args = args_for(demo_path, output_path.clone());

        match run(&args) {
            Ok(()) => {
                let svg = fs::read_to_string(&output_path).expect("Output was not written");
                assert!(svg.starts_with("<?xml"), "{}", demo_path.display());
                assert!(svg.contains("<svg"), "{}", demo_path.display());
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo(s) failed unexpectedly", failed_demos.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_xml_files(demos_dir().join("errors"));
    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_filename = format!(
            "error_{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        let args = args_for(demo_path, output_path.clone());

        if run(&args).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
        assert!(!output_path.exists(), "{}", demo_path.display());
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
}

#[test]
fn e2e_color_report() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("unused.svg");

    let mut args = args_for(&demos_dir().join("c_major.xml"), output_path.clone());
    args.colors = true;

    let mut out = Vec::new();
    run_with_output(&args, &mut out).expect("Color report failed");

    let report = String::from_utf8(out).unwrap();
    let colors: Vec<&str> = report.lines().collect();
    assert!(!colors.is_empty());

    let mut sorted = colors.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(colors, sorted);

    // Nothing is rendered for a color report
    assert!(!output_path.exists());
}

#[test]
fn e2e_explicit_config_is_applied() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[style.root]
color = "Teal"
"#,
    )
    .unwrap();
    let output_path = temp_dir.path().join("c_major.svg");

    let mut args = args_for(&demos_dir().join("c_major.xml"), output_path.clone());
    args.config = Some(config_path.to_string_lossy().to_string());

    run(&args).expect("Render with config failed");
    let svg = fs::read_to_string(&output_path).unwrap();
    assert!(svg.contains("fill:teal;"));
}
