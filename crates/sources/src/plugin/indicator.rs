//! Indicators backed by a manifest declaration

use super::manifest::{Declaration, Probe};
use super::template::{self, VALUE_KEY};
use crate::rate::RateMeter;
use mm_core::{
    convert_bytes_unit, BoxedIndicator, DisplayHandle, Indicator, IndicatorError, IndicatorType,
    Params, TextLabel,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

/// Decimal places for scaled file readings when the manifest gives none
const DEFAULT_PRECISION: usize = 2;

/// Shown until the first successful collect
const NO_READING: &str = "-";

/// Indicator type declared in a plugin manifest
pub struct PluginType {
    id: String,
    origin: PathBuf,
    declaration: Declaration,
}

impl PluginType {
    pub fn new(id: String, origin: PathBuf, declaration: Declaration) -> Self {
        Self {
            id,
            origin,
            declaration,
        }
    }

    /// Manifest this type was declared in
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Every parameter name the declaration can consume
    fn accepted_params(&self) -> HashSet<&str> {
        let decl = &self.declaration;
        let mut names: HashSet<&str> = decl.params.keys().map(String::as_str).collect();
        let mut templates = vec![decl.format.as_str()];
        match &decl.probe {
            Probe::File { path, .. } | Probe::Counter { path } => templates.push(path.as_str()),
            Probe::Command { program, args } => {
                templates.push(program.as_str());
                templates.extend(args.iter().map(String::as_str));
            }
        }
        for t in templates {
            names.extend(template::placeholders(t).into_iter().filter(|p| *p != VALUE_KEY));
        }
        names
    }
}

impl IndicatorType for PluginType {
    fn type_id(&self) -> &str {
        &self.id
    }

    fn infer_preferred_params(&self) -> Result<Params, IndicatorError> {
        Ok(self.declaration.params.clone())
    }

    fn create(&self, params: &Params) -> Result<BoxedIndicator, IndicatorError> {
        let accepted = self.accepted_params();
        if let Some(unknown) = params.keys().find(|k| !accepted.contains(k.as_str())) {
            return Err(IndicatorError::InvalidParams(format!(
                "unknown parameter `{}` for {}",
                unknown, self.id
            )));
        }
        Ok(Box::new(PluginIndicator::new(
            &self.id,
            &self.declaration,
            params,
        )?))
    }
}

enum Source {
    File {
        path: PathBuf,
        scale: Option<f64>,
        precision: usize,
    },
    Command {
        program: String,
        args: Vec<String>,
    },
    Counter {
        path: PathBuf,
        meter: RateMeter<1>,
    },
}

/// Last collected value, formatted on update
#[derive(Debug, Clone, PartialEq)]
enum Reading {
    Text(String),
    /// Bytes per second
    Rate(u64),
}

/// Text indicator filled from a file, a command or a byte counter
pub struct PluginIndicator {
    type_id: String,
    source: Source,
    format: String,
    params: Params,
    reading: Option<Reading>,
    label: TextLabel,
}

impl PluginIndicator {
    fn new(type_id: &str, decl: &Declaration, params: &Params) -> Result<Self, IndicatorError> {
        let fill = |t: &str| template::render(t, params, None).map_err(IndicatorError::InvalidParams);

        let source = match &decl.probe {
            Probe::File {
                path,
                scale,
                precision,
            } => Source::File {
                path: PathBuf::from(fill(path.as_str())?),
                scale: *scale,
                precision: precision.unwrap_or(DEFAULT_PRECISION),
            },
            Probe::Command { program, args } => Source::Command {
                program: fill(program.as_str())?,
                args: args.iter().map(|a| fill(a.as_str())).collect::<Result<_, _>>()?,
            },
            Probe::Counter { path } => Source::Counter {
                path: PathBuf::from(fill(path.as_str())?),
                meter: RateMeter::new(),
            },
        };

        // Checks the format once so update() cannot fail on a missing key
        template::render(&decl.format, params, Some(NO_READING))
            .map_err(IndicatorError::InvalidParams)?;

        Ok(Self {
            type_id: type_id.to_string(),
            source,
            format: decl.format.clone(),
            params: params.clone(),
            reading: None,
            label: TextLabel::new(),
        })
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

impl Indicator for PluginIndicator {
    fn collect(&mut self) -> Result<(), IndicatorError> {
        let reading = match &mut self.source {
            Source::File {
                path,
                scale,
                precision,
            } => {
                let contents =
                    std::fs::read_to_string(&*path).map_err(|e| IndicatorError::io(&*path, e))?;
                let line = first_line(&contents);
                let text = match scale {
                    Some(scale) => {
                        let number: f64 = line.parse().map_err(|_| {
                            IndicatorError::Collect(format!("{:?} is not a number in {:?}", line, path))
                        })?;
                        format!("{:.*}", *precision, number * *scale)
                    }
                    None => line.to_string(),
                };
                Reading::Text(text)
            }
            // Runs synchronously on the scheduler thread
            Source::Command { program, args } => {
                let output = Command::new(&*program)
                    .args(&*args)
                    .output()
                    .map_err(|e| IndicatorError::Collect(format!("cannot run {}: {}", program, e)))?;
                if !output.status.success() {
                    return Err(IndicatorError::Collect(format!(
                        "{} exited with {}",
                        program, output.status
                    )));
                }
                Reading::Text(first_line(&String::from_utf8_lossy(&output.stdout)).to_string())
            }
            Source::Counter { path, meter } => {
                let contents =
                    std::fs::read_to_string(&*path).map_err(|e| IndicatorError::io(&*path, e))?;
                let counter: u64 = contents
                    .split_whitespace()
                    .next()
                    .and_then(|token| token.parse().ok())
                    .ok_or_else(|| {
                        IndicatorError::Collect(format!("no byte counter in {:?}", path))
                    })?;
                meter.observe([counter], Instant::now());
                Reading::Rate(meter.rates()[0])
            }
        };
        self.reading = Some(reading);
        Ok(())
    }

    fn update(&mut self) -> Result<(), IndicatorError> {
        let value = match &self.reading {
            Some(Reading::Text(text)) => text.clone(),
            Some(Reading::Rate(rate)) => format!("{}/s", convert_bytes_unit(*rate)),
            None => NO_READING.to_string(),
        };
        let text = template::render(&self.format, &self.params, Some(&value))
            .map_err(IndicatorError::Update)?;
        self.label.set_text(text);
        Ok(())
    }

    fn display_handle(&self) -> DisplayHandle {
        DisplayHandle::Label(self.label.clone())
    }
}
