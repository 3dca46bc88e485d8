//! CSV export in the Stereo received-invoice import layout.

mod columns;
mod writer;

pub use columns::Column;
pub use writer::{CsvExporter, localize_float};

use crate::models::row::{AccountingRow, ExchangeRate};

/// A single output value before localization.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Float(f64),
    Int(i64),
    Empty,
}

impl AccountingRow {
    /// Value of this row in `column`.
    pub fn cell(&self, column: Column) -> Cell<'_> {
        match column {
            Column::DocumentCode => Cell::Text(&self.document_code),
            Column::DocumentNumber => Cell::Text(&self.document_number),
            Column::Agenda => Cell::Text(&self.agenda),
            Column::Series => Cell::Text(&self.series),
            Column::Kind => Cell::Text(&self.kind),
            Column::Issued => Cell::Text(&self.issued),
            Column::Supplied => Cell::Text(&self.supplied),
            Column::Due => Cell::Text(&self.due),
            Column::Description => Cell::Text(&self.description),
            Column::TaxRate => self.tax_rate.map_or(Cell::Empty, Cell::Float),
            Column::TotalAmount => Cell::Float(self.total_amount),
            Column::TotalHome => Cell::Float(self.total_home),
            Column::Currency => Cell::Text(&self.currency),
            Column::SupplierName => Cell::Text(&self.supplier_name),
            Column::InvoiceLanguage => Cell::Text(&self.invoice_language),
            Column::VariableSymbol => Cell::Text(&self.variable_symbol),
            Column::Rate => match self.rate {
                ExchangeRate::Home => Cell::Int(1),
                ExchangeRate::Quoted(rate) => Cell::Float(rate),
            },
            Column::CreditAccount => Cell::Text(&self.credit_account),
            Column::DebitAccount => Cell::Text(&self.debit_account),
            Column::DocType => Cell::Text(&self.doc_type),
            Column::InvoiceId => Cell::Text(&self.invoice_id),
        }
    }
}
