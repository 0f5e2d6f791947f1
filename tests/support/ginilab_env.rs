use std::{
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};

use ginilab::app_dirs::CONFIG_HOME_ENV;
use ginilab::config::API_URL_ENV;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Points the app directory at a test folder and restores the environment on drop.
pub struct GinilabEnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl GinilabEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let mut guard = Self {
            previous: Vec::new(),
            _lock: lock,
        };
        guard.set(CONFIG_HOME_ENV, Some(path.to_string_lossy().into_owned()));
        guard.set(API_URL_ENV, None);
        guard
    }

    pub fn with_api_url(mut self, url: &str) -> Self {
        self.set(API_URL_ENV, Some(url.to_string()));
        self
    }

    fn set(&mut self, key: &'static str, value: Option<String>) {
        if !self.previous.iter().any(|(saved, _)| *saved == key) {
            self.previous.push((key, std::env::var(key).ok()));
        }
        apply(key, value);
    }
}

impl Drop for GinilabEnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            apply(key, value);
        }
    }
}

fn apply(key: &str, value: Option<String>) {
    // SAFETY: tests run under a global lock to prevent concurrent env mutations.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}
