//! Wiring: config, registry, indicators, shell and the tick loop

use crate::config::{ConfigStore, MmPaths};
use crate::shell::{DisplayShell, ShellEvent};
use anyhow::{Context, Result};
use log::{error, info, warn};
use mm_core::{instantiate, IndicatorSet, Registry, Scheduler, TickReport};
use mm_types::IndicatorSetting;
use std::cell::RefCell;
use tokio::sync::mpsc;

/// Registry with every built-in and whatever the plugin directory declares
pub fn build_registry(paths: &MmPaths) -> Result<Registry> {
    let mut registry = Registry::new();
    mm_sources::register_all(&mut registry);

    let plugin_dir = paths.plugin_dir();
    mm_sources::load_plugin_dir(&mut registry, &plugin_dir)
        .with_context(|| format!("Failed to scan plugin directory {:?}", plugin_dir))?;
    Ok(registry)
}

/// Construct the configured indicators, in order.
///
/// Any setting that does not resolve or construct aborts startup.
pub fn instantiate_all(registry: &Registry, settings: &[IndicatorSetting]) -> Result<IndicatorSet> {
    let mut indicators = IndicatorSet::new();
    for (index, setting) in settings.iter().enumerate() {
        let ty = registry
            .resolve(&setting.type_id)
            .with_context(|| format!("indicators_settings[{}]", index))?;
        let indicator = instantiate(ty.as_ref(), &setting.kwargs)
            .with_context(|| format!("Failed to create {} (indicators_settings[{}])", setting.type_id, index))?;
        indicators.push(setting.type_id.as_str(), indicator);
    }
    info!("Created {} indicator(s)", indicators.len());
    Ok(indicators)
}

/// A running overlay
pub struct Overlay<S: DisplayShell> {
    store: ConfigStore,
    indicators: IndicatorSet,
    shell: S,
}

impl<S: DisplayShell> Overlay<S> {
    /// Load (and persist) the config, build every indicator and mount them
    pub fn start(paths: &MmPaths, mut shell: S) -> Result<Self> {
        paths.ensure_dirs()?;
        mm_sources::initialize_sensors();

        let registry = build_registry(paths)?;
        let store = ConfigStore::load(paths.config_file(), &registry)?;
        store.persist().context("Failed to write config")?;

        let config = store.config();
        let indicators = instantiate_all(&registry, &config.indicators_settings)?;
        shell
            .mount(
                indicators.display_handles(),
                (config.pos_x, config.pos_y),
                &config.global_settings,
            )
            .context("Failed to mount indicators")?;

        Ok(Self {
            store,
            indicators,
            shell,
        })
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// One collect/update pass followed by a redraw
    pub fn tick(&mut self) -> TickReport {
        let report = self.indicators.tick();
        if let Err(e) = self.shell.render() {
            warn!("Failed to render indicators: {}", e);
        }
        report
    }

    /// Apply a shell event. Returns false once the overlay should stop.
    pub fn handle_event(&mut self, event: ShellEvent) -> bool {
        match event {
            ShellEvent::Moved { x, y } => {
                self.shell.move_to(x, y);
                if let Err(e) = self.store.on_position_changed(x, y) {
                    error!("Failed to save position: {}", e);
                }
                true
            }
            ShellEvent::Quit => false,
        }
    }

    /// Tick every `interval` until a quit event or Ctrl-C
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<ShellEvent>) -> Result<()> {
        let scheduler = Scheduler::from_millis(self.store.config().interval);
        info!("Ticking every {:?}", scheduler.period());

        let overlay = RefCell::new(self);
        let ticking = scheduler.run(|| {
            overlay.borrow_mut().tick();
        });
        tokio::pin!(ticking);
        let interrupted = tokio::signal::ctrl_c();
        tokio::pin!(interrupted);

        loop {
            tokio::select! {
                () = &mut ticking => break,
                Some(event) = events.recv() => {
                    if !overlay.borrow_mut().handle_event(event) {
                        info!("Quit requested");
                        break;
                    }
                }
                result = &mut interrupted => {
                    result.context("Failed to listen for Ctrl-C")?;
                    info!("Interrupted");
                    break;
                }
            }
        }
        Ok(())
    }
}
