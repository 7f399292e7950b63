//! Bootstrap meta header schema
//!
//! Eleven fixed-width text fields at fixed offsets in the first 0x100 bytes
//! of the image. The table below is the single source of truth for names,
//! defaults, positions and validation.

use super::validators::Validator;
use std::fmt;

/// One of the eleven meta header fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    HardwareId,
    MakerId,
    DeviceInfo,
    AreaSymbols,
    Peripherals,
    ProductNo,
    Version,
    ReleaseDate,
    BootFilename,
    SwMakerName,
    GameTitle,
}

/// Static description of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    /// Display name, also the key in text templates
    pub name: &'static str,
    /// `None` when the default is computed at runtime (release date)
    pub default_value: Option<&'static str>,
    pub offset: usize,
    pub length: usize,
    pub validator: Option<Validator>,
}

pub const NUM_FIELDS: usize = 11;

/// Field table, in header order
pub static FIELDS: [FieldDescriptor; NUM_FIELDS] = [
    FieldDescriptor {
        kind: FieldKind::HardwareId,
        name: "Hardware ID",
        default_value: Some("SEGA SEGAKATANA"),
        offset: 0x00,
        length: 0x10,
        validator: Some(Validator::Fixed),
    },
    FieldDescriptor {
        kind: FieldKind::MakerId,
        name: "Maker ID",
        default_value: Some("SEGA ENTERPRISES"),
        offset: 0x10,
        length: 0x10,
        validator: Some(Validator::Fixed),
    },
    FieldDescriptor {
        kind: FieldKind::DeviceInfo,
        name: "Device Info",
        default_value: Some("0000 CD-ROM1/1"),
        offset: 0x20,
        length: 0x10,
        validator: Some(Validator::DeviceInfo),
    },
    FieldDescriptor {
        kind: FieldKind::AreaSymbols,
        name: "Area Symbols",
        default_value: Some("JUE"),
        offset: 0x30,
        length: 0x08,
        validator: Some(Validator::AreaSymbols),
    },
    FieldDescriptor {
        kind: FieldKind::Peripherals,
        name: "Peripherals",
        default_value: Some("E000F10"),
        offset: 0x38,
        length: 0x08,
        validator: Some(Validator::Peripherals),
    },
    FieldDescriptor {
        kind: FieldKind::ProductNo,
        name: "Product No",
        default_value: Some("T-00000"),
        offset: 0x40,
        length: 0x0a,
        validator: None,
    },
    FieldDescriptor {
        kind: FieldKind::Version,
        name: "Version",
        default_value: Some("V1.000"),
        offset: 0x4a,
        length: 0x06,
        validator: Some(Validator::Version),
    },
    FieldDescriptor {
        kind: FieldKind::ReleaseDate,
        name: "Release Date",
        default_value: None,
        offset: 0x50,
        length: 0x10,
        validator: Some(Validator::Date),
    },
    FieldDescriptor {
        kind: FieldKind::BootFilename,
        name: "Boot Filename",
        default_value: Some("1ST_READ.BIN"),
        offset: 0x60,
        length: 0x10,
        validator: None,
    },
    FieldDescriptor {
        kind: FieldKind::SwMakerName,
        name: "SW Maker Name",
        default_value: Some("KallistiOS"),
        offset: 0x70,
        length: 0x10,
        validator: None,
    },
    FieldDescriptor {
        kind: FieldKind::GameTitle,
        name: "Game Title",
        default_value: Some("GAMETITLE"),
        offset: 0x80,
        length: 0x80,
        validator: None,
    },
];

impl FieldKind {
    /// All kinds in header order
    pub const ALL: [FieldKind; NUM_FIELDS] = [
        FieldKind::HardwareId,
        FieldKind::MakerId,
        FieldKind::DeviceInfo,
        FieldKind::AreaSymbols,
        FieldKind::Peripherals,
        FieldKind::ProductNo,
        FieldKind::Version,
        FieldKind::ReleaseDate,
        FieldKind::BootFilename,
        FieldKind::SwMakerName,
        FieldKind::GameTitle,
    ];

    /// Position in the field table
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn descriptor(self) -> &'static FieldDescriptor {
        &FIELDS[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Look up a field by its display name (exact match)
    pub fn from_name(name: &str) -> Option<FieldKind> {
        FIELDS.iter().find(|f| f.name == name).map(|f| f.kind)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FieldDescriptor {
    /// Byte range covered by this field inside the image
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.length
    }
}
