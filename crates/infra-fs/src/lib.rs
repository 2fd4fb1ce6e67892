// jobscout Infrastructure - Filesystem
// Implements: RecordWriter

pub mod record_writer;

pub use record_writer::FsRecordWriter;
