// makeip/src/ip/constants.rs
// Bootstrap (IP.BIN) layout constants. Offsets are fixed by the console boot ROM.

// Whole bootstrap image
pub const IP_SIZE: usize = 0x8000; // 32768 bytes

// Hardware-managed checksum: 4 uppercase hex chars at the start of Device Info
pub const CRC_OFFSET: usize = 0x20;
pub const CRC_LENGTH: usize = 4;

// CRC input: Product No + Version (16 bytes)
pub const CRC_DATA_OFFSET: usize = 0x40;
pub const CRC_DATA_LENGTH: usize = 16;

// Meta header covered by the field table
pub const HEADER_SIZE: usize = 0x100;

// Boot logo region
pub const LOGO_OFFSET: usize = 0x3820;
pub const LOGO_MAX_SIZE: usize = 8192;

// Largest raster the boot screen displays
pub const LOGO_MAX_WIDTH: u32 = 320;
pub const LOGO_MAX_HEIGHT: u32 = 90;

// Placeholder written before the real checksum is known
pub const DEVICE_INFO_CRC_PLACEHOLDER: &str = "0000 ";
