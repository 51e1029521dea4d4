//! Network interface throughput indicator

use crate::rate::RateMeter;
use mm_core::{
    convert_bytes_unit, params_into, BuiltinIndicator, DisplayHandle, Indicator, IndicatorError,
    Params, TextLabel,
};
use mm_types::NetworkParams;
use serde_json::Value;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::Networks;

/// Per-interface device statistics table
const NET_DEV_PATH: &str = "/proc/net/dev";

/// Counter columns after the `iface:` prefix
const RX_BYTES_FIELD: usize = 0;
const TX_BYTES_FIELD: usize = 8;

/// Preferred address prefix when guessing the LAN interface
const PRIVATE_PREFIX: &str = "192";

/// Download/upload speed of one interface, e.g. `Net ⇣ 1.43MB/s   ⇡ 12.00KB/s  `
pub struct NetworkIndicator {
    params: NetworkParams,
    counter_path: PathBuf,
    /// [down, up] bytes/sec
    traffic: RateMeter<2>,
    miss_reported: bool,
    label: TextLabel,
}

impl NetworkIndicator {
    pub fn new(params: NetworkParams) -> Self {
        Self {
            params,
            counter_path: PathBuf::from(NET_DEV_PATH),
            traffic: RateMeter::new(),
            miss_reported: false,
            label: TextLabel::new(),
        }
    }

    /// Read counters from another file laid out like `/proc/net/dev`
    pub fn with_counter_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.counter_path = path.into();
        self
    }

    pub fn netdev(&self) -> &str {
        &self.params.netdev
    }

    pub fn down_speed(&self) -> u64 {
        self.traffic.rates()[0]
    }

    pub fn up_speed(&self) -> u64 {
        self.traffic.rates()[1]
    }

    /// Interfaces known to sysinfo with their addresses, sorted by name
    pub fn interfaces() -> Vec<(String, Vec<IpAddr>)> {
        let networks = Networks::new_with_refreshed_list();
        let mut interfaces: Vec<(String, Vec<IpAddr>)> = networks
            .iter()
            .map(|(name, data)| {
                let addrs = data.ip_networks().iter().map(|net| net.addr).collect();
                (name.clone(), addrs)
            })
            .collect();
        interfaces.sort_by(|a, b| a.0.cmp(&b.0));
        interfaces
    }

    fn render(down: u64, up: u64) -> String {
        format!(
            "Net \u{21E3} {:<10} \u{21E1} {:<10}",
            format!("{}/s", convert_bytes_unit(down)),
            format!("{}/s", convert_bytes_unit(up)),
        )
    }
}

/// Received and transmitted byte counters of `netdev` in a net/dev table.
///
/// `Ok(None)` when the interface has no line.
pub(crate) fn find_interface_counters(
    contents: &str,
    netdev: &str,
) -> Result<Option<(u64, u64)>, IndicatorError> {
    for line in contents.lines() {
        let Some((name, counters)) = line.split_once(':') else {
            continue;
        };
        if name.trim() != netdev {
            continue;
        }

        let fields: Vec<&str> = counters.split_whitespace().collect();
        let field = |idx: usize| -> Result<u64, IndicatorError> {
            fields
                .get(idx)
                .ok_or_else(|| {
                    IndicatorError::Collect(format!("{} line has {} fields", netdev, fields.len()))
                })?
                .parse::<u64>()
                .map_err(|e| IndicatorError::Collect(format!("bad counter for {}: {}", netdev, e)))
        };
        return Ok(Some((field(RX_BYTES_FIELD)?, field(TX_BYTES_FIELD)?)));
    }
    Ok(None)
}

/// Pick the interface most likely to be the LAN link.
///
/// Virtual (`v*`) and container (`docker*`) interfaces are ignored. The first
/// remaining interface with an address starting with "192" wins, else the
/// first remaining one.
pub(crate) fn pick_netdev(interfaces: &[(String, Vec<IpAddr>)]) -> Option<String> {
    let candidates: Vec<&(String, Vec<IpAddr>)> = interfaces
        .iter()
        .filter(|(name, _)| !name.starts_with('v') && !name.starts_with("docker"))
        .collect();

    candidates
        .iter()
        .find(|(_, addrs)| addrs.iter().any(|a| a.to_string().starts_with(PRIVATE_PREFIX)))
        .or_else(|| candidates.first())
        .map(|(name, _)| name.clone())
}

impl Indicator for NetworkIndicator {
    fn collect(&mut self) -> Result<(), IndicatorError> {
        let contents = std::fs::read_to_string(&self.counter_path)
            .map_err(|e| IndicatorError::io(&self.counter_path, e))?;

        match find_interface_counters(&contents, &self.params.netdev)? {
            Some((down, up)) => {
                self.miss_reported = false;
                self.traffic.observe([down, up], Instant::now());
            }
            None => {
                // Keep the last speeds; only say so once per disappearance
                if !self.miss_reported {
                    log::warn!(
                        "Interface {} not listed in {:?}, keeping last values",
                        self.params.netdev,
                        self.counter_path
                    );
                    self.miss_reported = true;
                }
            }
        }
        Ok(())
    }

    fn update(&mut self) -> Result<(), IndicatorError> {
        self.label
            .set_text(Self::render(self.down_speed(), self.up_speed()));
        Ok(())
    }

    fn display_handle(&self) -> DisplayHandle {
        DisplayHandle::Label(self.label.clone())
    }
}

impl BuiltinIndicator for NetworkIndicator {
    const TYPE_ID: &'static str = crate::NETWORK_INDICATOR;

    fn infer_preferred_params() -> Result<Params, IndicatorError> {
        let netdev = pick_netdev(&Self::interfaces()).ok_or_else(|| {
            IndicatorError::Inference("no candidate network interfaces".to_string())
        })?;
        let mut params = Params::new();
        params.insert("netdev".to_string(), Value::from(netdev));
        Ok(params)
    }

    fn from_params(params: &Params) -> Result<Self, IndicatorError> {
        Ok(Self::new(params_into(params)?))
    }
}
