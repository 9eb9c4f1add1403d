//! Non-persistent storage backends

mod memory;

pub use memory::InMemoryUserRepository;
#[cfg(test)]
pub(crate) use memory::FailingInsertRepository;
