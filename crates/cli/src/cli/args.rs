// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.

use chrono::NaiveDate;
use clap::Args;
use pt_core::{parse_date, ProductionEntry, Shift};

fn date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn shift_arg(s: &str) -> Result<Shift, String> {
    s.parse().map_err(|e: pt_core::Error| e.to_string())
}

/// Fields of one production entry.
#[derive(Args, Clone, Debug)]
pub struct EntryArgs {
    /// Machine identifier
    #[arg(long = "machine", short = 'm')]
    pub machine_id: String,

    /// Product name
    #[arg(long = "product", short = 'p')]
    pub product_name: String,

    /// Units produced (validated by the server)
    #[arg(long, short = 'q', allow_negative_numbers = true)]
    pub quantity: i64,

    /// Shift (morning, afternoon, night)
    #[arg(long, short = 's', value_parser = shift_arg)]
    pub shift: Shift,

    /// Production date, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = date_arg)]
    pub date: Option<NaiveDate>,

    /// Free-text remarks
    #[arg(long)]
    pub remarks: Option<String>,

    /// Operator identifier
    #[arg(long)]
    pub operator: Option<String>,

    /// Minutes spent on the run
    #[arg(long)]
    pub minutes: Option<u32>,
}

impl EntryArgs {
    /// Build the entry, dating it `today` when no date was given.
    pub fn into_entry(self, today: NaiveDate) -> ProductionEntry {
        let mut entry = ProductionEntry::new(
            self.date.unwrap_or(today),
            self.machine_id,
            self.shift,
            self.product_name,
            self.quantity,
        );
        if let Some(remarks) = self.remarks {
            entry = entry.with_remarks(remarks);
        }
        if let Some(operator) = self.operator {
            entry = entry.with_operator(operator);
        }
        if let Some(minutes) = self.minutes {
            entry = entry.with_time_taken(minutes);
        }
        entry
    }
}
