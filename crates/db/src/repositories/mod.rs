//! Repository layer: one zero-sized struct per table with static async methods.

pub mod client_repo;
pub mod contract_repo;
pub mod event_repo;
pub mod user_repo;

pub use client_repo::ClientRepo;
pub use contract_repo::ContractRepo;
pub use event_repo::EventRepo;
pub use user_repo::UserRepo;
