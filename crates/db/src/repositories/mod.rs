pub mod quota_repo;

pub use quota_repo::QuotaRepo;
