/// All timestamps are stored and compared in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
