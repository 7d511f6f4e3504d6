use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
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
fn resolve_config_path_prefers_segue_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SEGUE_CONFIG_PATH", "/tmp/segue-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/segue-test-config.toml")
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
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("segue")
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
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("segue")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file_parses_every_section() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
quit_fade_out_ms = 123

[controls]
step_seconds = 9

[playback]
progress_tick_ms = 250

[ui]
header_text = "hello"
now_playing_fields = ["title", "name"]
now_playing_separator = " • "
time_fields = ["elapsed", "remaining"]
time_separator = " | "

[library]
extensions = ["mp3"]
recursive = false
include_hidden = false
follow_links = false
max_depth = 3
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SEGUE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("SEGUE__CONTROLS__STEP_SECONDS");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.controls.step_seconds, 9);
    assert_eq!(s.playback.progress_tick_ms, 250);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.now_playing_fields.len(), 2);
    assert!(matches!(s.ui.now_playing_fields[0], MetaField::Title));
    assert!(matches!(s.ui.now_playing_fields[1], MetaField::Name));
    assert_eq!(s.ui.now_playing_separator, " • ");
    assert_eq!(s.ui.time_fields.len(), 2);
    assert!(matches!(s.ui.time_fields[0], TimeField::Elapsed));
    assert!(matches!(s.ui.time_fields[1], TimeField::Remaining));
    assert_eq!(s.ui.time_separator, " | ");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
step_seconds = 5
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SEGUE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("SEGUE__CONTROLS__STEP_SECONDS", "30");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.step_seconds, 30);
}

#[test]
fn validate_rejects_zero_step_and_zero_tick() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.controls.step_seconds = 0;
    assert!(s.validate().is_err());

    s.controls.step_seconds = 5;
    s.playback.progress_tick_ms = 0;
    assert!(s.validate().is_err());
}
