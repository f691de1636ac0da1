use std::{fs, path::Path};

use tempfile::tempdir;

use strata_cli::{Args, CliError};

const PIPELINE: &str = r#"
[viewport]
width = 400.0
height = 300.0

[[nodes]]
id = "parse"

[[nodes]]
id = "check"

[[nodes]]
id = "emit"

[[nodes]]
id = "backend"
width = 200.0
height = 120.0

[[nodes]]
id = "codegen"
parent = "backend"
width = 20.0
height = 10.0

[[nodes]]
id = "link"
parent = "backend"
width = 20.0
height = 10.0

[[edges]]
tail = "parse"
head = "check"

[[edges]]
tail = "check"
head = "emit"

[[edges]]
tail = "emit"
head = "parse"

[[edges]]
tail = "codegen"
head = "link"
"#;

fn args(input: &Path, output: &Path, engine: &str) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        engine: Some(engine.to_string()),
        seed: Some(42),
        config: None,
        log_level: "off".to_string(),
    }
}

fn parse_output(path: &Path) -> toml::Table {
    let text = fs::read_to_string(path).expect("Failed to read output");
    text.parse::<toml::Table>().expect("Output is valid TOML")
}

#[test]
fn e2e_smoke_test_both_engines() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("pipeline.toml");
    fs::write(&input, PIPELINE).expect("Failed to write input");

    for engine in ["level", "annealing"] {
        let output = temp_dir.path().join(format!("{engine}.toml"));

        let result = strata_cli::run(&args(&input, &output, engine));
        assert!(result.is_ok(), "{engine} failed: {:?}", result.err());

        let table = parse_output(&output);
        let nodes = table["nodes"].as_array().expect("nodes array");
        let edges = table["edges"].as_array().expect("edges array");
        assert_eq!(nodes.len(), 6);
        assert_eq!(edges.len(), 4);

        for node in nodes {
            let x = node["x"].as_float().expect("x is a float");
            let y = node["y"].as_float().expect("y is a float");
            assert!((-50.0..=450.0).contains(&x), "{engine}: x = {x}");
            assert!((-50.0..=350.0).contains(&y), "{engine}: y = {y}");
        }
    }
}

#[test]
fn e2e_same_seed_same_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("pipeline.toml");
    fs::write(&input, PIPELINE).expect("Failed to write input");

    for engine in ["level", "annealing"] {
        let first = temp_dir.path().join(format!("{engine}-1.toml"));
        let second = temp_dir.path().join(format!("{engine}-2.toml"));

        strata_cli::run(&args(&input, &first, engine)).expect("first run");
        strata_cli::run(&args(&input, &second, engine)).expect("second run");

        let first = fs::read_to_string(&first).expect("Failed to read output");
        let second = fs::read_to_string(&second).expect("Failed to read output");
        assert_eq!(first, second, "{engine} is not reproducible");
    }
}

#[test]
fn e2e_unknown_engine() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("pipeline.toml");
    fs::write(&input, PIPELINE).expect("Failed to write input");
    let output = temp_dir.path().join("out.toml");

    let result = strata_cli::run(&args(&input, &output, "force"));

    assert!(matches!(result, Err(CliError::Layout(_))));
    assert!(!output.exists());
}

#[test]
fn e2e_unknown_edge_endpoint() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("broken.toml");
    fs::write(
        &input,
        "[[nodes]]\nid = \"lonely\"\n\n[[edges]]\ntail = \"lonely\"\nhead = \"nowhere\"\n",
    )
    .expect("Failed to write input");
    let output = temp_dir.path().join("out.toml");

    let result = strata_cli::run(&args(&input, &output, "level"));

    assert!(matches!(result, Err(CliError::UnknownNode { .. })));
}

#[test]
fn e2e_config_file_is_validated() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("pipeline.toml");
    fs::write(&input, PIPELINE).expect("Failed to write input");
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[layout.annealing]\nmove_count = 0\n").expect("Failed to write config");
    let output = temp_dir.path().join("out.toml");

    let mut cli_args = args(&input, &output, "annealing");
    cli_args.config = Some(config.to_string_lossy().to_string());
    let result = strata_cli::run(&cli_args);

    assert!(matches!(result, Err(CliError::Layout(_))));
}
