//! Collaborator interfaces consumed from the hosting media server: user and
//! device directories, the library catalog, and the log store. The bridge
//! calls these but does not implement them; the in-memory variants here back
//! the standalone binary and the tests.

mod directory;
mod library;
mod logs;

pub use directory::{Device, DeviceDirectory, DeviceQuery, MemoryDeviceDirectory, MemoryUserDirectory, User, UserDirectory};
pub use library::{Library, LibraryService, MemoryLibraryService};
pub use logs::{LogCapture, LogEntry, LogLevel, LogStore, MemoryLogStore};
