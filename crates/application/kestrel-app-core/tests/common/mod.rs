#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use kestrel_app_core::{LauncherBackend, PreferencesRepo};
use kestrel_core::{LauncherConfig, UiPreferences};
use tokio::sync::Semaphore;

/// Backend double whose answers are scripted by the test.
pub struct ScriptedBackend {
    pub launch_calls: Mutex<Vec<(String, Vec<String>)>>,
    launch_results: Mutex<VecDeque<Result<(), String>>>,
    gate_launch: AtomicBool,
    launch_gate: Semaphore,

    pub abort_calls: AtomicUsize,
    pub abort_fails: AtomicBool,
    launching: Mutex<HashSet<String>>,

    config: Mutex<LauncherConfig>,
    pub set_calls: Mutex<Vec<LauncherConfig>>,
    pub set_fails: AtomicBool,
    gate_set: AtomicBool,
    set_gate: Semaphore,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            launch_calls: Mutex::default(),
            launch_results: Mutex::default(),
            gate_launch: AtomicBool::new(false),
            launch_gate: Semaphore::new(0),
            abort_calls: AtomicUsize::new(0),
            abort_fails: AtomicBool::new(false),
            launching: Mutex::default(),
            config: Mutex::default(),
            set_calls: Mutex::default(),
            set_fails: AtomicBool::new(false),
            gate_set: AtomicBool::new(false),
            set_gate: Semaphore::new(0),
        }
    }
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_config(config: LauncherConfig) -> Arc<Self> {
        let backend = Self::default();
        *backend.config.lock().unwrap() = config;
        Arc::new(backend)
    }

    pub fn fail_next_launch(&self, message: &str) {
        self.launch_results
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// Launch calls block until [`Self::release_launches`].
    pub fn hold_launches(&self) {
        self.gate_launch.store(true, Ordering::SeqCst);
    }

    pub fn release_launches(&self, n: usize) {
        self.launch_gate.add_permits(n);
    }

    pub fn hold_commits(&self, hold: bool) {
        self.gate_set.store(hold, Ordering::SeqCst);
    }

    pub fn release_commits(&self, n: usize) {
        self.set_gate.add_permits(n);
    }

    pub fn set_launching(&self, profile_id: &str, launching: bool) {
        let mut set = self.launching.lock().unwrap();
        if launching {
            set.insert(profile_id.to_string());
        } else {
            set.remove(profile_id);
        }
    }

    pub fn launch_count(&self) -> usize {
        self.launch_calls.lock().unwrap().len()
    }

    pub fn committed_values(&self) -> Vec<LauncherConfig> {
        self.set_calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LauncherBackend for ScriptedBackend {
    async fn launch(&self, profile_id: &str, extra_args: &[String]) -> anyhow::Result<()> {
        self.launch_calls
            .lock()
            .unwrap()
            .push((profile_id.to_string(), extra_args.to_vec()));
        if self.gate_launch.load(Ordering::SeqCst) {
            self.launch_gate.acquire().await?.forget();
        }
        let next = self.launch_results.lock().unwrap().pop_front();
        match next {
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            _ => Ok(()),
        }
    }

    async fn abort_launch(&self, _profile_id: &str) -> anyhow::Result<()> {
        self.abort_calls.fetch_add(1, Ordering::SeqCst);
        if self.abort_fails.load(Ordering::SeqCst) {
            anyhow::bail!("backend refused to abort");
        }
        Ok(())
    }

    async fn is_launching(&self, profile_id: &str) -> anyhow::Result<bool> {
        Ok(self.launching.lock().unwrap().contains(profile_id))
    }

    async fn get_config(&self) -> anyhow::Result<LauncherConfig> {
        Ok(self.config.lock().unwrap().clone())
    }

    async fn set_config(&self, config: LauncherConfig) -> anyhow::Result<LauncherConfig> {
        self.set_calls.lock().unwrap().push(config.clone());
        if self.gate_set.load(Ordering::SeqCst) {
            self.set_gate.acquire().await?.forget();
        }
        if self.set_fails.load(Ordering::SeqCst) {
            anyhow::bail!("backend unavailable");
        }
        *self.config.lock().unwrap() = config.clone();
        Ok(config)
    }
}

/// Preferences store kept in memory and shared with the test.
#[derive(Clone, Default)]
pub struct MemoryRepo {
    pub stored: Arc<Mutex<Option<UiPreferences>>>,
    pub saves: Arc<AtomicUsize>,
    pub fail_saves: Arc<AtomicBool>,
}

impl MemoryRepo {
    pub fn with(prefs: UiPreferences) -> Self {
        let repo = Self::default();
        *repo.stored.lock().unwrap() = Some(prefs);
        repo
    }

    pub fn stored(&self) -> Option<UiPreferences> {
        self.stored.lock().unwrap().clone()
    }
}

impl PreferencesRepo for MemoryRepo {
    fn load(&self) -> anyhow::Result<Option<UiPreferences>> {
        Ok(self.stored())
    }

    fn save(&self, prefs: &UiPreferences) -> anyhow::Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            anyhow::bail!("disk full");
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.stored.lock().unwrap() = Some(prefs.clone());
        Ok(())
    }
}

/// Yields to spawned tasks until `cond` holds.
pub async fn settle(mut cond: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
