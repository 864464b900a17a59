// Device domain: sensor control and the frame source.

pub mod backend;
pub mod chardev;
pub mod dummy;
pub mod sensor;
pub mod sysfs;
