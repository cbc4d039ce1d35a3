use super::*;
use serial_test::serial;

#[test]
#[serial]
fn test_coach_home_dir_under_home() {
    let home = tempfile::tempdir().unwrap();
    let previous = std::env::var_os("HOME");
    std::env::set_var("HOME", home.path());

    let dir = coach_home_dir().expect("home dir should resolve");
    assert!(dir.ends_with(".interview-coach"));
    assert!(dir.is_dir());

    match previous {
        Some(value) => std::env::set_var("HOME", value),
        None => std::env::remove_var("HOME"),
    }
}

#[test]
#[serial]
fn test_logs_dir_is_created() {
    let home = tempfile::tempdir().unwrap();
    let previous = std::env::var_os("HOME");
    std::env::set_var("HOME", home.path());

    let dir = logs_dir().expect("logs dir should resolve");
    assert!(dir.ends_with("logs"));
    assert!(dir.is_dir());
    assert!(dir.starts_with(home.path()));

    let config = user_config_path().unwrap();
    assert!(config.ends_with("config.yaml"));
    assert!(!config.exists());

    match previous {
        Some(value) => std::env::set_var("HOME", value),
        None => std::env::remove_var("HOME"),
    }
}
