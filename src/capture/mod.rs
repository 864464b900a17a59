// Capture domain: device read, reshape, PNG encode and output files.

pub mod encode;
pub mod error;
pub mod frame;
pub mod output;
pub mod pipeline;
pub mod read;
