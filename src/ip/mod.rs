//! IP.BIN bootstrap: header fields, checksum, base templates and assembly

pub mod builder;
pub mod constants;
pub mod crc;
pub mod fields;
pub mod reader;
pub mod registry;
pub mod template;
pub mod validators;

pub use builder::{Bootstrap, BootstrapBuilder};
pub use fields::{FIELDS, FieldDescriptor, FieldKind};
pub use reader::{BootstrapInfo, inspect_bootstrap};
pub use registry::FieldRegistry;
