mod contribution_calculator;

pub use contribution_calculator::{validate_wage, BpjsContributionCalculator, ContributionCalculator};
