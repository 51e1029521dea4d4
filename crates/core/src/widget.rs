//! Display handles indicators expose to the display shell
//!
//! Handles are cheap to clone and share their state, so an indicator keeps
//! writing into the same label or bar the shell mounted at startup.

use crate::constants::PERCENT_LIMIT;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

fn read_recovering<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| {
        log::warn!("Display handle lock was poisoned, recovering");
        poisoned.into_inner()
    })
}

fn write_recovering<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| {
        log::warn!("Display handle lock was poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Renderable object handed out by `Indicator::display_handle`
#[derive(Debug, Clone)]
pub enum DisplayHandle {
    Label(TextLabel),
    Bar(StackBar),
}

/// Single line of text
#[derive(Debug, Clone, Default)]
pub struct TextLabel {
    text: Arc<RwLock<String>>,
}

impl TextLabel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *write_recovering(&self.text) = text.into();
    }

    pub fn text(&self) -> String {
        read_recovering(&self.text).clone()
    }
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0, 255, 0);
}

/// One stacked segment of a bar
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayer {
    pub value: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone)]
struct StackBarState {
    limit: f64,
    layers: Vec<BarLayer>,
}

/// Vertical bar made of stacked layers, filled bottom-up
#[derive(Debug, Clone)]
pub struct StackBar {
    state: Arc<RwLock<StackBarState>>,
}

impl StackBar {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StackBarState {
                limit: PERCENT_LIMIT,
                layers: Vec::new(),
            })),
        }
    }

    pub fn set_layers(&self, layers: Vec<BarLayer>) {
        write_recovering(&self.state).layers = layers;
    }

    pub fn set_limit(&self, limit: f64) {
        write_recovering(&self.state).limit = limit;
    }

    pub fn limit(&self) -> f64 {
        read_recovering(&self.state).limit
    }

    pub fn layers(&self) -> Vec<BarLayer> {
        read_recovering(&self.state).layers.clone()
    }

    /// Cell extent of each layer for a bar `height` cells tall.
    ///
    /// Returns `(start, len, color)` measured from the bottom. Lengths are
    /// truncated and the stack is clipped to the bar.
    pub fn layer_extents(&self, height: u32) -> Vec<(u32, u32, Rgb)> {
        let state = read_recovering(&self.state);
        if state.limit <= 0.0 {
            return Vec::new();
        }
        let mut start = 0u32;
        let mut extents = Vec::with_capacity(state.layers.len());
        for layer in &state.layers {
            let len = ((layer.value / state.limit) * f64::from(height)).max(0.0) as u32;
            let len = len.min(height.saturating_sub(start));
            extents.push((start, len, layer.color));
            start += len;
        }
        extents
    }
}

impl Default for StackBar {
    fn default() -> Self {
        Self::new()
    }
}
