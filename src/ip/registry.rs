//! Field registry: current values of the eleven header fields
//!
//! One registry is created per build. Values are stored unpadded and
//! padded with spaces only when rendered into an image.

use super::constants::IP_SIZE;
use super::fields::{FIELDS, FieldKind, NUM_FIELDS};
use crate::exceptions::{MakeipError, Result};
use crate::utils::rtrim;
use chrono::Local;
use log::{debug, error, info, trace};

/// Holds one value per `FieldKind`
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    values: [String; NUM_FIELDS],
    erroneous: bool,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRegistry {
    /// Registry seeded with defaults and today's date as release date
    pub fn new() -> Self {
        let today = Local::now().format("%Y%m%d").to_string();
        Self::with_release_date(&today)
    }

    /// Registry seeded with defaults and a given release date
    pub fn with_release_date(release_date: &str) -> Self {
        let mut registry = FieldRegistry {
            values: Default::default(),
            erroneous: false,
        };

        for field in &FIELDS {
            if let Some(default) = field.default_value {
                registry.values[field.kind.index()] = default.to_string();
            }
        }

        if let Err(e) = registry.set(FieldKind::ReleaseDate, release_date) {
            error!("{e}");
        }
        registry
    }

    /// Assign a value, validating and canonicalizing it.
    ///
    /// A rejected value leaves the previous one in place and marks the
    /// registry as erroneous so a batch of assignments can be checked at once.
    pub fn set(&mut self, kind: FieldKind, text: &str) -> Result<()> {
        let field = kind.descriptor();

        if text.len() > field.length {
            self.erroneous = true;
            return Err(MakeipError::TooLong {
                field: field.name,
                max: field.length,
            });
        }

        let mut value = text.to_string();
        if let Some(validator) = field.validator {
            if let Err(reason) = validator.validate(field, &mut value) {
                self.erroneous = true;
                return Err(MakeipError::InvalidValue {
                    field: field.name,
                    reason,
                });
            }
        }

        self.values[kind.index()] = value;
        info!("setting field \"{}\" to \"{}\"", field.name, self.get_pretty(kind));
        Ok(())
    }

    /// Stored value padded with spaces to the field width
    pub fn get(&self, kind: FieldKind) -> String {
        let length = kind.descriptor().length;
        format!("{:<length$}", self.values[kind.index()])
    }

    /// Stored value without padding
    pub fn get_raw(&self, kind: FieldKind) -> &str {
        &self.values[kind.index()]
    }

    /// Display form: area symbols without padding, device info without the
    /// checksum prefix
    pub fn get_pretty(&self, kind: FieldKind) -> &str {
        let value = self.get_raw(kind);
        match kind {
            FieldKind::AreaSymbols => rtrim(value),
            FieldKind::DeviceInfo => value.split_once(' ').map_or(value, |(_, device)| device),
            _ => value,
        }
    }

    /// True once any assignment has failed
    pub fn is_erroneous(&self) -> bool {
        self.erroneous
    }

    /// Apply a text template (`"Field Name: value"` per line).
    ///
    /// Syntax errors abort immediately. Rejected values are collected and
    /// returned together after every line has been applied.
    pub fn load_from_text(&mut self, source: &str) -> Result<Vec<MakeipError>> {
        let mut failures = Vec::new();

        for (index, raw_line) in source.lines().enumerate() {
            let line_no = index + 1;
            let line = rtrim(raw_line);
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                return Err(MakeipError::MissingColon { line: line_no });
            };

            let key = key.trim();
            let kind = FieldKind::from_name(key).ok_or_else(|| MakeipError::UnknownField {
                name: key.to_string(),
                line: line_no,
            })?;

            let value = value.trim_start_matches([' ', '\t']);
            trace!("template line {line_no}: {key} = {value:?}");

            if let Err(e) = self.set(kind, value) {
                failures.push(e);
            }
        }

        debug!("text template applied with {} rejected value(s)", failures.len());
        Ok(failures)
    }

    /// Emit the values as a text template
    pub fn to_text(&self) -> String {
        FieldKind::ALL
            .iter()
            .map(|kind| format!("{}: {}\n", kind.name(), rtrim(self.get_raw(*kind))))
            .collect()
    }

    /// Write every field, space-padded, at its fixed offset
    pub fn render_into(&self, ip: &mut [u8]) {
        for field in &FIELDS {
            let window = &mut ip[field.range()];
            window.fill(b' ');
            let value = self.values[field.kind.index()].as_bytes();
            window[..value.len()].copy_from_slice(value);
        }
    }

    /// Read values back out of an existing image without validating them.
    ///
    /// Trailing padding and NUL bytes are dropped; bytes that are not valid
    /// UTF-8 are replaced.
    pub fn read_from(ip: &[u8]) -> Result<Self> {
        if ip.len() != IP_SIZE {
            return Err(MakeipError::InvalidFormat(format!(
                "bootstrap image must be {IP_SIZE} bytes, got {}",
                ip.len()
            )));
        }

        let mut registry = FieldRegistry {
            values: Default::default(),
            erroneous: false,
        };
        for field in &FIELDS {
            let text = String::from_utf8_lossy(&ip[field.range()]);
            let text = text.trim_end_matches([' ', '\0']);
            registry.values[field.kind.index()] = text.to_string();
        }
        Ok(registry)
    }
}
