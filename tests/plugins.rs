use mm::shell::TerminalShell;
use mm::{MmPaths, Overlay};
use mm_core::ResolutionError;
use serde_json::json;

fn temp_home() -> MmPaths {
    MmPaths::new(std::env::temp_dir().join(format!("mm-plugin-it-{}", uuid::Uuid::new_v4())))
}

fn write(paths: &MmPaths, relative: &str, contents: &str) {
    let path = paths.home().join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

#[test]
fn plugin_indicator_runs_next_to_builtins() {
    let paths = temp_home();
    write(
        &paths,
        "indicators/demo/greet.json",
        r#"{"indicators": {"Hello": {
            "kind": "command",
            "program": "echo",
            "args": ["{who}"],
            "format": "hi {value}",
            "params": {"who": "there"}
        }}}"#,
    );
    let config = json!({
        "indicators_settings": [
            {"type": "demo.greet.Hello"},
            {"type": "demo.greet.Hello", "kwargs": {"who": "you"}},
            {"type": "mm.indicator.simple.MemoryIndicator"}
        ]
    });
    write(&paths, "config.json", &config.to_string());

    let mut overlay = Overlay::start(&paths, TerminalShell::new(Vec::new(), false)).unwrap();
    assert!(overlay.tick().is_clean());

    let line = overlay.shell().line();
    assert!(line.starts_with("hi there  hi you  MEM "), "got {:?}", line);
    std::fs::remove_dir_all(paths.home()).unwrap();
}

#[test]
fn invalid_plugin_declaration_aborts_startup() {
    let paths = temp_home();
    write(
        &paths,
        "indicators/demo.json",
        r#"{"indicators": {"Broken": {"kind": "file"}}}"#,
    );
    write(
        &paths,
        "config.json",
        r#"{"indicators_settings": [{"type": "demo.Broken"}]}"#,
    );

    let err = Overlay::start(&paths, TerminalShell::new(Vec::new(), false))
        .err()
        .expect("startup should fail");
    let resolution = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ResolutionError>())
        .expect("a resolution error");
    assert!(matches!(resolution, ResolutionError::InvalidImplementation { .. }));
    std::fs::remove_dir_all(paths.home()).unwrap();
}

#[test]
fn bar_indicator_renders_as_cells() {
    let paths = temp_home();
    write(
        &paths,
        "config.json",
        r#"{"indicators_settings": [{"type": "mm.indicator.default.CpuIndicator"}]}"#,
    );
    let mut overlay = Overlay::start(&paths, TerminalShell::new(Vec::new(), false)).unwrap();
    overlay.tick();
    let line = overlay.shell().line();
    assert!(line.starts_with('[') && line.ends_with(']'), "got {:?}", line);
    assert_eq!(line.chars().count(), 12);
    std::fs::remove_dir_all(paths.home()).unwrap();
}
