//! CSV export of the per-(path, year) audit log
//!
//! Real-dollar columns are optionally converted to nominal dollars by
//! multiplying by the row's cumulative inflation factor, and their headers
//! are relabeled from `...Real` to `...Nominal` when that conversion is
//! applied. Year, sim, and the inflation factor itself are emitted as-is.

use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::simulation::PathRecord;

const REAL_HEADER: [&str; 8] = [
    "Year",
    "Sim",
    "StartBalanceReal",
    "LmpPaymentReal",
    "RiskWithdrawalReal",
    "TotalSpendingReal",
    "EndBalanceReal",
    "CumulativeInflation",
];

const NOMINAL_HEADER: [&str; 8] = [
    "Year",
    "Sim",
    "StartBalanceNominal",
    "LmpPaymentNominal",
    "RiskWithdrawalNominal",
    "TotalSpendingNominal",
    "EndBalanceNominal",
    "CumulativeInflation",
];

/// Write the record log as CSV to any writer.
pub fn write_records<W: Write>(writer: W, records: &[PathRecord], nominal: bool) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(if nominal { NOMINAL_HEADER } else { REAL_HEADER })?;

    for record in records {
        let factor = if nominal {
            record.cumulative_inflation
        } else {
            1.0
        };
        out.write_record(&[
            record.year.to_string(),
            record.sim.to_string(),
            format!("{:.2}", record.start_balance * factor),
            format!("{:.2}", record.lmp_payment * factor),
            format!("{:.2}", record.risk_withdrawal * factor),
            format!("{:.2}", record.total_spending * factor),
            format!("{:.2}", record.end_balance * factor),
            format!("{:.6}", record.cumulative_inflation),
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Write the record log to a file path.
pub fn export_to_path(path: &Path, records: &[PathRecord], nominal: bool) -> Result<()> {
    let file = File::create(path)?;
    write_records(file, records, nominal)
}
