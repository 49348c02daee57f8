use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::withholding::models::{PtkpCode, TerCategory};

/// One TER row: wages up to `upper_bound` (inclusive) pay `percent` of gross.
/// `None` marks the open-ended top bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerBracket {
    pub upper_bound: Option<Decimal>,
    pub percent: Decimal,
}

/// One marginal bracket of the annual progressive schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveBracket {
    pub upper_bound: Option<Decimal>,
    pub percent: Decimal,
}

/// All PPh 21 tables for a tax year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithholdingTables {
    pub ter_a: Vec<TerBracket>,
    pub ter_b: Vec<TerBracket>,
    pub ter_c: Vec<TerBracket>,
    /// Annual PTKP amount per code
    pub ptkp_values: BTreeMap<PtkpCode, Decimal>,
    pub progressive: Vec<ProgressiveBracket>,
}

// (upper bound in Rupiah, rate in hundredths of a percent); PP 58/2023 Lampiran
const TER_A: &[(i64, i64)] = &[
    (5_400_000, 0),
    (5_650_000, 25),
    (5_950_000, 50),
    (6_300_000, 75),
    (6_750_000, 100),
    (7_500_000, 125),
    (8_550_000, 150),
    (9_650_000, 175),
    (10_050_000, 200),
    (10_350_000, 225),
    (10_700_000, 250),
    (11_050_000, 300),
    (11_600_000, 350),
    (12_500_000, 400),
    (13_750_000, 500),
    (15_100_000, 600),
    (16_950_000, 700),
    (19_750_000, 800),
    (24_150_000, 900),
    (26_450_000, 1000),
    (28_000_000, 1100),
    (30_050_000, 1200),
    (32_400_000, 1300),
    (35_400_000, 1400),
    (39_100_000, 1500),
    (43_850_000, 1600),
    (47_800_000, 1700),
    (51_400_000, 1800),
    (56_300_000, 1900),
    (62_200_000, 2000),
    (68_600_000, 2100),
    (77_500_000, 2200),
    (89_000_000, 2300),
    (103_000_000, 2400),
    (125_000_000, 2500),
    (157_000_000, 2600),
    (206_000_000, 2700),
    (337_000_000, 2800),
    (454_000_000, 2900),
    (550_000_000, 3000),
    (695_000_000, 3100),
    (910_000_000, 3200),
    (1_400_000_000, 3300),
];

const TER_B: &[(i64, i64)] = &[
    (6_200_000, 0),
    (6_500_000, 25),
    (6_850_000, 50),
    (7_300_000, 75),
    (9_200_000, 100),
    (10_750_000, 150),
    (11_250_000, 200),
    (11_600_000, 250),
    (12_600_000, 300),
    (13_600_000, 400),
    (14_950_000, 500),
    (16_400_000, 600),
    (18_450_000, 700),
    (21_850_000, 800),
    (26_000_000, 900),
    (27_700_000, 1000),
    (29_350_000, 1100),
    (31_450_000, 1200),
    (33_950_000, 1300),
    (37_100_000, 1400),
    (41_100_000, 1500),
    (45_800_000, 1600),
    (49_500_000, 1700),
    (53_800_000, 1800),
    (58_500_000, 1900),
    (64_000_000, 2000),
    (71_000_000, 2100),
    (80_000_000, 2200),
    (93_000_000, 2300),
    (109_000_000, 2400),
    (129_000_000, 2500),
    (163_000_000, 2600),
    (211_000_000, 2700),
    (374_000_000, 2800),
    (459_000_000, 2900),
    (555_000_000, 3000),
    (704_000_000, 3100),
    (957_000_000, 3200),
    (1_405_000_000, 3300),
];

const TER_C: &[(i64, i64)] = &[
    (6_600_000, 0),
    (6_950_000, 25),
    (7_350_000, 50),
    (7_800_000, 75),
    (8_850_000, 100),
    (9_800_000, 125),
    (10_950_000, 150),
    (11_200_000, 175),
    (12_050_000, 200),
    (12_950_000, 300),
    (14_150_000, 400),
    (15_550_000, 500),
    (17_050_000, 600),
    (19_500_000, 700),
    (22_700_000, 800),
    (26_600_000, 900),
    (28_100_000, 1000),
    (30_100_000, 1100),
    (32_600_000, 1200),
    (35_400_000, 1300),
    (38_900_000, 1400),
    (43_000_000, 1500),
    (47_400_000, 1600),
    (51_200_000, 1700),
    (55_800_000, 1800),
    (60_400_000, 1900),
    (66_700_000, 2000),
    (74_500_000, 2100),
    (83_200_000, 2200),
    (95_600_000, 2300),
    (110_000_000, 2400),
    (134_000_000, 2500),
    (169_000_000, 2600),
    (221_000_000, 2700),
    (390_000_000, 2800),
    (463_000_000, 2900),
    (561_000_000, 3000),
    (709_000_000, 3100),
    (965_000_000, 3200),
    (1_419_000_000, 3300),
];

const TER_TOP_RATE: i64 = 3400;

fn ter_table(rows: &[(i64, i64)]) -> Vec<TerBracket> {
    rows.iter()
        .map(|&(bound, rate)| TerBracket {
            upper_bound: Some(Decimal::new(bound, 0)),
            percent: Decimal::new(rate, 2),
        })
        .chain(std::iter::once(TerBracket {
            upper_bound: None,
            percent: Decimal::new(TER_TOP_RATE, 2),
        }))
        .collect()
}

impl Default for WithholdingTables {
    /// Tables in force since January 2024 (PP 58/2023, UU HPP brackets)
    fn default() -> Self {
        let ptkp_values = [
            (PtkpCode::Tk0, 54_000_000),
            (PtkpCode::Tk1, 58_500_000),
            (PtkpCode::Tk2, 63_000_000),
            (PtkpCode::Tk3, 67_500_000),
            (PtkpCode::K0, 58_500_000),
            (PtkpCode::K1, 63_000_000),
            (PtkpCode::K2, 67_500_000),
            (PtkpCode::K3, 72_000_000),
        ]
        .into_iter()
        .map(|(code, amount)| (code, Decimal::new(amount, 0)))
        .collect();

        let progressive = [
            (Some(60_000_000), 5),
            (Some(250_000_000), 15),
            (Some(500_000_000), 25),
            (Some(5_000_000_000), 30),
            (None, 35),
        ]
        .into_iter()
        .map(|(bound, rate)| ProgressiveBracket {
            upper_bound: bound.map(|b: i64| Decimal::new(b, 0)),
            percent: Decimal::new(rate, 0),
        })
        .collect();

        Self {
            ter_a: ter_table(TER_A),
            ter_b: ter_table(TER_B),
            ter_c: ter_table(TER_C),
            ptkp_values,
            progressive,
        }
    }
}

impl WithholdingTables {
    pub fn ter_table(&self, category: TerCategory) -> &[TerBracket] {
        match category {
            TerCategory::A => &self.ter_a,
            TerCategory::B => &self.ter_b,
            TerCategory::C => &self.ter_c,
        }
    }

    /// Annual PTKP for a code, falling back to `TK/0`
    pub fn ptkp_value(&self, code: PtkpCode) -> Decimal {
        self.ptkp_values
            .get(&code)
            .or_else(|| self.ptkp_values.get(&PtkpCode::Tk0))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Tables must be strictly ascending and end in an open bucket
    pub fn validate(&self) -> Result<()> {
        for category in [TerCategory::A, TerCategory::B, TerCategory::C] {
            let bounds: Vec<Option<Decimal>> = self
                .ter_table(category)
                .iter()
                .map(|b| b.upper_bound)
                .collect();
            check_bounds(&format!("TER {}", category), &bounds)?;
        }

        let bounds: Vec<Option<Decimal>> = self.progressive.iter().map(|b| b.upper_bound).collect();
        check_bounds("progressive", &bounds)?;

        if !self.ptkp_values.contains_key(&PtkpCode::Tk0) {
            return Err(AppError::Configuration(
                "PTKP table must define TK/0".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_bounds(name: &str, bounds: &[Option<Decimal>]) -> Result<()> {
    let Some((last, finite)) = bounds.split_last() else {
        return Err(AppError::Configuration(format!("{} table is empty", name)));
    };

    if last.is_some() {
        return Err(AppError::Configuration(format!(
            "{} table must end with an open-ended bracket",
            name
        )));
    }

    let mut previous = Decimal::MIN;
    for bound in finite {
        match bound {
            Some(value) if *value > previous => previous = *value,
            _ => {
                return Err(AppError::Configuration(format!(
                    "{} table bounds must be strictly ascending",
                    name
                )))
            }
        }
    }

    Ok(())
}
