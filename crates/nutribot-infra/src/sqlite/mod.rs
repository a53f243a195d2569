//! SQLite persistence: split read/write pool and the session store.

pub mod pool;
pub mod session;
