mod collection;
pub use collection::MemCollection;

mod exec_log;
pub use exec_log::{ExecLog, Op};

mod session;
pub use session::{MemSession, MemSessionConfig};
