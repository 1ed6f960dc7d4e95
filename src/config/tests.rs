use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_allegro_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ALLEGRO_CONFIG_PATH", "/tmp/allegro-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/allegro-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/xdg-config-home")
            .join("allegro")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("allegro")
            .join("config.toml")
    );
}

#[test]
fn default_dir_prefers_setting_then_home_music() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("HOME", "/tmp/home-dir");

    let mut library = LibrarySettings::default();
    assert_eq!(
        library.resolve_default_dir(),
        PathBuf::from("/tmp/home-dir").join("Music")
    );

    library.default_dir = Some(PathBuf::from("/srv/music"));
    assert_eq!(library.resolve_default_dir(), PathBuf::from("/srv/music"));
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
default_dir = "/srv/music"
extensions = ["mp3"]
recursive = false
include_hidden = false
follow_links = false
max_depth = 3
strict_tags = true

[playback]
seek_step_secs = 15
poll_interval_ms = 50

[logging]
filter = "allegro=debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ALLEGRO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ALLEGRO__PLAYBACK__SEEK_STEP_SECS");

    let s = Settings::load().unwrap();
    assert_eq!(s.library.default_dir, Some(PathBuf::from("/srv/music")));
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert!(s.library.strict_tags);
    assert_eq!(s.playback.seek_step_secs, 15);
    assert_eq!(s.playback.poll_interval_ms, 50);
    assert_eq!(s.logging.filter, "allegro=debug");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_missing_file_uses_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "ALLEGRO_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );
    let _g2 = EnvGuard::remove("ALLEGRO__PLAYBACK__SEEK_STEP_SECS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.seek_step_secs, 5);
    assert_eq!(s.playback.poll_interval_ms, 200);
    assert_eq!(s.logging.filter, "info");
    assert!(s.library.recursive);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
seek_step_secs = 10
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ALLEGRO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ALLEGRO__PLAYBACK__SEEK_STEP_SECS", "30");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.seek_step_secs, 30);
}

#[test]
fn validate_rejects_zero_poll_interval_and_empty_extensions() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.playback.poll_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec![" . ".into()];
    assert!(s.validate().is_err());
}
