use std::sync::Mutex;
use tripgate::config::Config;

// Config::load reads process-global env vars; serialize the tests that touch
// them so parallel test threads don't race.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn test_config_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        std::env::remove_var("TRIPGATE_CONFIG");
        std::env::remove_var("LISTEN");
    }

    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:9393");
    assert_eq!(cfg.server.backlog, 500);
    assert_eq!(cfg.server.max_connections, 100);
    assert_eq!(cfg.server.request_buffer_bytes, 1024);
    assert_eq!(cfg.broker.addr, "127.0.0.1:9292");
}

#[test]
fn test_config_listen_env_override() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        std::env::remove_var("TRIPGATE_CONFIG");
        std::env::set_var("LISTEN", "0.0.0.0:3000");
    }

    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:3000");

    unsafe {
        std::env::remove_var("LISTEN");
    }
}

#[test]
fn test_config_yaml_file_with_partial_fields() {
    let _guard = ENV_LOCK.lock().unwrap();

    let path = std::env::temp_dir().join("tripgate-test-config.yaml");
    std::fs::write(
        &path,
        "server:\n  listen_addr: \"127.0.0.1:7777\"\n  max_connections: 5\nbroker:\n  addr: \"127.0.0.1:7001\"\n",
    )
    .unwrap();

    unsafe {
        std::env::remove_var("LISTEN");
        std::env::set_var("TRIPGATE_CONFIG", &path);
    }

    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:7777");
    assert_eq!(cfg.server.max_connections, 5);
    // Unset fields keep their defaults.
    assert_eq!(cfg.server.backlog, 500);
    assert_eq!(cfg.server.request_buffer_bytes, 1024);
    assert_eq!(cfg.broker.addr, "127.0.0.1:7001");

    unsafe {
        std::env::remove_var("TRIPGATE_CONFIG");
    }
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_config_missing_file_is_an_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        std::env::set_var("TRIPGATE_CONFIG", "/nonexistent/tripgate.yaml");
    }

    assert!(Config::load().is_err());

    unsafe {
        std::env::remove_var("TRIPGATE_CONFIG");
    }
}
