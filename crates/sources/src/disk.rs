//! Disk usage and throughput indicator
//!
//! Usage is per partition (via sysinfo); any path works and reports the
//! filesystem it lives on. Read/write throughput comes from
//! the host-wide block device counters in `/proc/diskstats`, not from the
//! configured partition.

use crate::rate::RateMeter;
use mm_core::{
    convert_bytes_unit, params_into, round_percent, BuiltinIndicator, DisplayHandle, Indicator,
    IndicatorError, Params, TextLabel,
};
use mm_types::DiskParams;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Instant;
use sysinfo::Disks;

/// Block device statistics table
const DISKSTATS_PATH: &str = "/proc/diskstats";

/// One entry per whole disk; partitions are absent here
const SYS_BLOCK_DIR: &str = "/sys/block";

/// `/proc/diskstats` counts in 512-byte sectors regardless of device
const SECTOR_SIZE: u64 = 512;

/// Usage percent of one partition plus host-wide read/write speeds
pub struct DiskIndicator {
    params: DiskParams,
    disks: Disks,
    diskstats_path: PathBuf,
    sys_block_dir: PathBuf,
    percent: f64,
    /// [read, write] bytes/sec
    io: RateMeter<2>,
    label: TextLabel,
}

impl DiskIndicator {
    pub fn new(params: DiskParams) -> Self {
        Self {
            params,
            disks: Disks::new_with_refreshed_list(),
            diskstats_path: PathBuf::from(DISKSTATS_PATH),
            sys_block_dir: PathBuf::from(SYS_BLOCK_DIR),
            percent: 0.0,
            io: RateMeter::new(),
            label: TextLabel::new(),
        }
    }

    /// Read counters from other locations than the host's
    pub fn with_counter_paths(mut self, diskstats: impl Into<PathBuf>, sys_block: impl Into<PathBuf>) -> Self {
        self.diskstats_path = diskstats.into();
        self.sys_block_dir = sys_block.into();
        self
    }

    pub fn partition(&self) -> &str {
        &self.params.partition
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn read_speed(&self) -> u64 {
        self.io.rates()[0]
    }

    pub fn write_speed(&self) -> u64 {
        self.io.rates()[1]
    }

    /// Mount points known to sysinfo
    pub fn mount_points() -> Vec<String> {
        Disks::new_with_refreshed_list()
            .iter()
            .map(|disk| disk.mount_point().to_string_lossy().to_string())
            .collect()
    }

    fn collect_usage(&mut self) -> Result<(), IndicatorError> {
        let target = Path::new(&self.params.partition);
        if !target.exists() {
            return Err(IndicatorError::MissingDevice(self.params.partition.clone()));
        }

        self.disks.refresh();
        // The filesystem holding the path is the deepest mount point above it
        let disk = self
            .disks
            .iter()
            .filter(|d| target.starts_with(d.mount_point()))
            .max_by_key(|d| d.mount_point().components().count())
            .ok_or_else(|| IndicatorError::MissingDevice(self.params.partition.clone()))?;

        let total = disk.total_space();
        let used = total.saturating_sub(disk.available_space());
        self.percent = if total > 0 {
            used as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Ok(())
    }

    fn collect_io(&mut self) -> Result<(), IndicatorError> {
        let contents = std::fs::read_to_string(&self.diskstats_path)
            .map_err(|e| IndicatorError::io(&self.diskstats_path, e))?;
        let sys_block = &self.sys_block_dir;
        let (read, written) =
            sum_disk_io(&contents, |device| sys_block.join(device).exists())?;
        self.io.observe([read, written], Instant::now());
        Ok(())
    }

    fn render(percent: f64, read: u64, write: u64) -> String {
        format!(
            "Disk {:>3}% W {:<10} R {:<10}",
            round_percent(percent),
            format!("{}/s", convert_bytes_unit(write)),
            format!("{}/s", convert_bytes_unit(read)),
        )
    }
}

/// Sum bytes read and written over whole-disk devices in a diskstats table
///
/// Partitions are skipped so their traffic is not counted twice.
pub(crate) fn sum_disk_io(
    contents: &str,
    is_whole_disk: impl Fn(&str) -> bool,
) -> Result<(u64, u64), IndicatorError> {
    let mut read = 0u64;
    let mut written = 0u64;

    for line in contents.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 10 || !is_whole_disk(parts[2]) {
            continue;
        }
        let sectors = |idx: usize| {
            parts[idx].parse::<u64>().map_err(|e| {
                IndicatorError::Collect(format!("bad diskstats field for {}: {}", parts[2], e))
            })
        };
        read = read.saturating_add(sectors(5)?.saturating_mul(SECTOR_SIZE));
        written = written.saturating_add(sectors(9)?.saturating_mul(SECTOR_SIZE));
    }

    Ok((read, written))
}

/// Shortest mount point, as a guess at the root-like volume
pub(crate) fn pick_partition<I, S>(mount_points: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    mount_points
        .into_iter()
        .map(|m| m.as_ref().to_string())
        .fold(None, |best: Option<String>, m| match best {
            Some(b) if b.len() <= m.len() => Some(b),
            _ => Some(m),
        })
}

impl Indicator for DiskIndicator {
    fn collect(&mut self) -> Result<(), IndicatorError> {
        self.collect_usage()?;
        self.collect_io()
    }

    fn update(&mut self) -> Result<(), IndicatorError> {
        self.label
            .set_text(Self::render(self.percent, self.read_speed(), self.write_speed()));
        Ok(())
    }

    fn display_handle(&self) -> DisplayHandle {
        DisplayHandle::Label(self.label.clone())
    }
}

impl BuiltinIndicator for DiskIndicator {
    const TYPE_ID: &'static str = crate::DISK_INDICATOR;

    fn infer_preferred_params() -> Result<Params, IndicatorError> {
        let partition = pick_partition(Self::mount_points())
            .ok_or_else(|| IndicatorError::Inference("no mounted partitions".to_string()))?;
        let mut params = Params::new();
        params.insert("partition".to_string(), Value::from(partition));
        Ok(params)
    }

    fn from_params(params: &Params) -> Result<Self, IndicatorError> {
        Ok(Self::new(params_into(params)?))
    }
}
