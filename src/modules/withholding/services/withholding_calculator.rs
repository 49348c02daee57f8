use rust_decimal::Decimal;
use tracing::debug;

use crate::core::{apply_percent, non_negative, round_rupiah};
use crate::modules::withholding::models::{
    PtkpCode, TaxMethod, TerCategory, WithholdingInput, WithholdingResult, WithholdingTables,
};

/// Month in which the progressive reconciliation replaces TER
pub const RECONCILIATION_MONTH: u32 = 12;

/// Computes PPh 21 withholding for one month
pub trait WithholdingCalculator: Send + Sync {
    fn calculate(&self, input: &WithholdingInput<'_>) -> WithholdingResult;
}

/// PPh 21 calculator driven by [`WithholdingTables`]
#[derive(Debug, Clone, Default)]
pub struct Pph21Calculator {
    tables: WithholdingTables,
}

impl Pph21Calculator {
    pub fn new(tables: WithholdingTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &WithholdingTables {
        &self.tables
    }

    /// TER percentage for a wage: the first bracket whose bound is at or
    /// above the wage, or the open top bucket
    pub fn ter_percent(&self, category: TerCategory, wage: Decimal) -> Decimal {
        let table = self.tables.ter_table(category);

        table
            .iter()
            .find(|bracket| bracket.upper_bound.map_or(true, |bound| wage <= bound))
            .or_else(|| table.last())
            .map(|bracket| bracket.percent)
            .unwrap_or(Decimal::ZERO)
    }

    /// Annual tax on `taxable_income` under the marginal progressive schedule
    pub fn annual_progressive_tax(&self, taxable_income: Decimal) -> Decimal {
        let taxable_income = non_negative(taxable_income);
        let mut tax = Decimal::ZERO;
        let mut lower = Decimal::ZERO;

        for bracket in &self.tables.progressive {
            if taxable_income <= lower {
                break;
            }
            let upper = bracket.upper_bound.unwrap_or(taxable_income);
            let portion = taxable_income.min(upper) - lower;
            if portion > Decimal::ZERO {
                tax += portion * bracket.percent / Decimal::ONE_HUNDRED;
            }
            lower = upper;
        }

        round_rupiah(tax)
    }

    fn calculate_ter(&self, input: &WithholdingInput<'_>, code: PtkpCode) -> WithholdingResult {
        let category = code.ter_category();
        let wage = non_negative(input.gross_wage);
        let percent = self.ter_percent(category, wage);

        WithholdingResult {
            tax_amount: apply_percent(wage, percent),
            method: TaxMethod::Ter,
            category: Some(category),
            ptkp_code: code,
            ptkp_value: self.tables.ptkp_value(code),
            taxable_income: None,
            annual_tax: None,
        }
    }

    fn calculate_progressive(
        &self,
        input: &WithholdingInput<'_>,
        code: PtkpCode,
    ) -> WithholdingResult {
        let ytd = &input.year_to_date;
        let annual_gross = ytd.gross + non_negative(input.gross_wage);
        let annual_contributions = ytd.employee_contributions + input.employee_contributions;
        let annual_net = annual_gross - annual_contributions;

        let ptkp_value = self.tables.ptkp_value(code);
        let taxable_income = non_negative(annual_net - ptkp_value);
        let annual_tax = self.annual_progressive_tax(taxable_income);
        let tax_amount = non_negative(annual_tax - ytd.tax_withheld);

        debug!(
            ptkp_code = code.as_str(),
            annual_net = %annual_net,
            taxable_income = %taxable_income,
            annual_tax = %annual_tax,
            ytd_tax = %ytd.tax_withheld,
            "Progressive reconciliation"
        );

        WithholdingResult {
            tax_amount,
            method: TaxMethod::Progressive,
            category: None,
            ptkp_code: code,
            ptkp_value,
            taxable_income: Some(taxable_income),
            annual_tax: Some(annual_tax),
        }
    }
}

impl WithholdingCalculator for Pph21Calculator {
    fn calculate(&self, input: &WithholdingInput<'_>) -> WithholdingResult {
        let code = PtkpCode::parse_or_default(input.ptkp_code);

        if input.month.clamp(1, RECONCILIATION_MONTH) == RECONCILIATION_MONTH {
            self.calculate_progressive(input, code)
        } else {
            self.calculate_ter(input, code)
        }
    }
}
