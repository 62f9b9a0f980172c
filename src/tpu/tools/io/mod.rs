//! File adapters: reading HTML-table sheets and writing the JSON collection.

pub mod html_read;
pub mod json_write;
