mod contribution;

pub use contribution::{ContributionRates, ContributionResult};
