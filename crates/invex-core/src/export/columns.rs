//! Fixed column layout of the import file.

/// Output columns in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    DocumentCode,
    DocumentNumber,
    Agenda,
    Series,
    Kind,
    Issued,
    Supplied,
    Due,
    Description,
    TaxRate,
    TotalAmount,
    TotalHome,
    Currency,
    SupplierName,
    InvoiceLanguage,
    VariableSymbol,
    Rate,
    CreditAccount,
    DebitAccount,
    DocType,
    InvoiceId,
}

impl Column {
    /// All columns in the order they are written.
    pub const ALL: [Column; 21] = [
        Column::DocumentCode,
        Column::DocumentNumber,
        Column::Agenda,
        Column::Series,
        Column::Kind,
        Column::Issued,
        Column::Supplied,
        Column::Due,
        Column::Description,
        Column::TaxRate,
        Column::TotalAmount,
        Column::TotalHome,
        Column::Currency,
        Column::SupplierName,
        Column::InvoiceLanguage,
        Column::VariableSymbol,
        Column::Rate,
        Column::CreditAccount,
        Column::DebitAccount,
        Column::DocType,
        Column::InvoiceId,
    ];

    /// Internal field key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::DocumentCode => "doklad",
            Self::DocumentNumber => "cislo",
            Self::Agenda => "agenda",
            Self::Series => "rada",
            Self::Kind => "druh",
            Self::Issued => "date",
            Self::Supplied => "date_a",
            Self::Due => "date_s",
            Self::Description => "description",
            Self::TaxRate => "tax_rate",
            Self::TotalAmount => "total_amount",
            Self::TotalHome => "total_czk",
            Self::Currency => "currency",
            Self::SupplierName => "supplier_name",
            Self::InvoiceLanguage => "invoice_language",
            Self::VariableSymbol => "variabilni_symbol",
            Self::Rate => "rate",
            Self::CreditAccount => "dal",
            Self::DebitAccount => "ma_dati",
            Self::DocType => "type",
            Self::InvoiceId => "id",
        }
    }

    /// Header text expected by the accounting import.
    pub fn header(&self) -> &'static str {
        match self {
            Self::DocumentCode => "Doklad",
            Self::DocumentNumber => "Číslo dokladu",
            Self::Agenda => "Agenda",
            Self::Series => "Řada dokladu",
            Self::Kind => "Druh",
            Self::Issued => "Okamžik vystavení",
            Self::Supplied => "Okamžik uskutečnění",
            Self::Due => "Datum splatnosti",
            Self::Description => "Text",
            Self::TaxRate => "Sazba DPH",
            Self::TotalAmount => "Celkem v cizí měně",
            Self::TotalHome => "Celkem",
            Self::Currency => "Měna",
            Self::SupplierName => "Název firmy",
            Self::InvoiceLanguage => "Jazyk faktury",
            Self::VariableSymbol => "Variabilní symbol",
            Self::Rate => "Kurz",
            Self::CreditAccount => "Dal",
            Self::DebitAccount => "Má dáti",
            Self::DocType => "Typ dokladu",
            Self::InvoiceId => "Související doklad",
        }
    }
}
