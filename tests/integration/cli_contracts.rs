use folio::tooling::cli::{CliContext, Commands, NewCommands};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Config file keeping view state inside the project instead of XDG directories.
fn write_config(temp: &TempDir) -> PathBuf {
    let path = temp.path().join("folio-test.toml");
    fs::write(&path, "[storage]\nstate_path = \"state\"\n").unwrap();
    path
}

fn context(root: &Path, config: &Path) -> CliContext {
    CliContext::new(root.to_path_buf(), Some(config.to_path_buf())).unwrap()
}

fn init_project(temp: &TempDir) -> (PathBuf, PathBuf) {
    let config = write_config(temp);
    let root = temp.path().join("novel");
    let output = context(&root, &config)
        .execute(&Commands::Init {
            title: "Novel".to_string(),
            creator: "tester".to_string(),
        })
        .unwrap();
    assert!(output.contains("Novel"));
    (root, config)
}

#[test]
fn init_refuses_an_existing_project() {
    let temp = TempDir::new().unwrap();
    let (root, config) = init_project(&temp);
    assert!(root.join(".wtconfig").is_file());

    let result = context(&root, &config).execute(&Commands::Init {
        title: "Again".to_string(),
        creator: String::new(),
    });
    assert!(result.is_err());
}

#[test]
fn outline_json_contract_has_nested_items() {
    let temp = TempDir::new().unwrap();
    let (root, config) = init_project(&temp);
    let cli = context(&root, &config);

    let created = cli
        .execute(&Commands::New {
            command: NewCommands::Chapter {
                title: Some("Opening".to_string()),
                no_fragment: false,
            },
        })
        .unwrap();
    assert!(Path::new(&created).is_dir());

    let output = cli
        .execute(&Commands::Outline {
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["label"], "root");
    let containers = parsed["children"].as_array().unwrap();
    assert_eq!(containers.len(), 2);
    assert_eq!(containers[0]["label"], "Chapters");
    assert_eq!(containers[0]["children"][0]["label"], "Opening");
    assert_eq!(containers[0]["children"][0]["contextValue"], "dir");
    assert!(containers[0]["children"][0]["resourceUri"].is_string());

    let text = cli
        .execute(&Commands::Outline {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(text.contains("Opening"));
    assert!(text.contains("Work Snips"));
}

#[test]
fn todos_json_contract_lists_spans_per_fragment() {
    let temp = TempDir::new().unwrap();
    let (root, config) = init_project(&temp);
    let snip = PathBuf::from(
        context(&root, &config)
            .execute(&Commands::New {
                command: NewCommands::Snip {
                    at: None,
                    title: Some("Notes".to_string()),
                    no_fragment: false,
                },
            })
            .unwrap(),
    );
    let fragment = fs::read_dir(&snip)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .find(|path| path.extension().map(|ext| ext == "wt").unwrap_or(false))
        .unwrap();
    fs::write(&fragment, "[check dates]").unwrap();

    let output = context(&root, &config)
        .execute(&Commands::Todos {
            path: None,
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["todos"][0]["preview"], "[check dates]");
    assert_eq!(entries[0]["todos"][0]["colEnd"], 13);
}

#[test]
fn rename_and_remove_address_nodes_by_relative_path() {
    let temp = TempDir::new().unwrap();
    let (root, config) = init_project(&temp);
    let cli = context(&root, &config);

    let snip = PathBuf::from(
        cli.execute(&Commands::New {
            command: NewCommands::Snip {
                at: None,
                title: None,
                no_fragment: true,
            },
        })
        .unwrap(),
    );
    let relative = snip.strip_prefix(&root).unwrap().to_path_buf();

    cli.execute(&Commands::Rename {
        path: relative.clone(),
        title: "Renamed".to_string(),
    })
    .unwrap();
    let store = fs::read_to_string(root.join("data/snips/.config")).unwrap();
    assert!(store.contains("Renamed"));

    let output = cli
        .execute(&Commands::Remove {
            paths: vec![relative.clone()],
            yes: true,
        })
        .unwrap();
    assert!(output.contains("Recycled 1 resources"));
    assert!(!snip.exists());

    let missing = cli.execute(&Commands::Rename {
        path: relative,
        title: "Gone".to_string(),
    });
    assert!(missing.is_err());
}

#[test]
fn commands_outside_a_project_fail() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);
    let cli = context(temp.path(), &config);
    let result = cli.execute(&Commands::Outline {
        format: "text".to_string(),
    });
    assert!(matches!(
        result,
        Err(folio::error::ApiError::WorkspaceNotFound(_))
    ));
}
