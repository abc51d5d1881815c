pub mod account;
pub mod category;
pub mod collection;
pub mod item;
pub mod statistics;

pub use account::{Identity, StoredAccount};
pub use category::{Category, RemoveTarget, UnknownCategory};
pub use collection::ListCollection;
pub use item::ItemRecord;
pub use statistics::{
    DecadeCount, Distributions, Overview, RatingBucket, RatingDistribution, StatisticsSnapshot,
    TopStats, YearCount,
};
