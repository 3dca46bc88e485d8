//! Delimited text writer with decimal commas.

use std::io::{self, Write};

use tracing::{debug, warn};

use super::{Cell, Column};
use crate::error::{InvexError, Result};
use crate::models::config::{OutputConfig, OutputEncoding};
use crate::models::row::AccountingRow;

/// Render a float the way the import expects: shortest round-trip form,
/// always with a fractional part, decimal comma.
///
/// Values below 1e-4 or from 1e16 up use exponent notation with a signed,
/// at least two-digit exponent (`1e+16`, `1,5e-05`).
pub fn localize_float(value: f64) -> String {
    let text = format!("{:?}", value);
    let text = match text.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
            }
            Err(_) => text.clone(),
        },
        None => text.clone(),
    };
    text.replace('.', ",")
}

fn render(cell: Cell<'_>) -> String {
    match cell {
        Cell::Text(text) => text.to_string(),
        Cell::Float(value) => localize_float(value),
        Cell::Int(value) => value.to_string(),
        Cell::Empty => String::new(),
    }
}

/// Writes accounting rows as a delimited import file.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    delimiter: u8,
    encoding: OutputEncoding,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvExporter {
    /// `;`-delimited UTF-8 output.
    pub fn new() -> Self {
        Self {
            delimiter: b';',
            encoding: OutputEncoding::Utf8,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Result<Self> {
        let delimiter = u8::try_from(config.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                InvexError::Config(format!(
                    "delimiter must be a single ASCII character, got {:?}",
                    config.delimiter
                ))
            })?;

        Ok(Self {
            delimiter,
            encoding: config.encoding,
        })
    }

    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Header plus one record per row, encoded as configured.
    pub fn to_bytes(&self, rows: &[AccountingRow]) -> Result<Vec<u8>> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(csv::Terminator::CRLF)
            .from_writer(vec![]);

        wtr.write_record(Column::ALL.iter().map(|c| c.header()))?;
        for row in rows {
            wtr.write_record(Column::ALL.iter().map(|&c| render(row.cell(c))))?;
        }

        let data = wtr.into_inner().map_err(|e| InvexError::Io(e.into_error()))?;
        debug!("Serialized {} rows ({} bytes)", rows.len(), data.len());

        match self.encoding {
            OutputEncoding::Utf8 => Ok(data),
            OutputEncoding::Cp1250 => {
                let text = String::from_utf8(data)
                    .map_err(|e| InvexError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
                let (encoded, _, had_errors) = encoding_rs::WINDOWS_1250.encode(&text);
                if had_errors {
                    warn!("Some characters have no Windows-1250 form and were replaced");
                }
                Ok(encoded.into_owned())
            }
        }
    }

    /// Serialize all rows, then write them to `out` in one go.
    pub fn write<W: Write>(&self, rows: &[AccountingRow], mut out: W) -> Result<()> {
        let data = self.to_bytes(rows)?;
        out.write_all(&data)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::row::ExchangeRate;
    use pretty_assertions::assert_eq;

    fn row(code: &str, date: &str, currency: &str, total: f64, rate: ExchangeRate) -> AccountingRow {
        AccountingRow {
            document_code: format!("pf{}", code),
            document_number: code.to_string(),
            agenda: "PF".to_string(),
            series: "pf".to_string(),
            kind: "NS".to_string(),
            issued: date.to_string(),
            supplied: date.to_string(),
            due: date.to_string(),
            description: "Hosting".to_string(),
            tax_rate: None,
            total_amount: total,
            total_home: total * rate.value(),
            currency: currency.to_string(),
            supplier_name: "Acme".to_string(),
            invoice_language: "English".to_string(),
            variable_symbol: "0".to_string(),
            rate,
            credit_account: "321".to_string(),
            debit_account: "518o".to_string(),
            doc_type: "F".to_string(),
            invoice_id: "INV-1".to_string(),
        }
    }

    fn render_utf8(rows: &[AccountingRow]) -> String {
        String::from_utf8(CsvExporter::new().to_bytes(rows).unwrap()).unwrap()
    }

    #[test]
    fn test_localize_float() {
        assert_eq!(localize_float(2350.0), "2350,0");
        assert_eq!(localize_float(23.5), "23,5");
        assert_eq!(localize_float(0.04807699), "0,04807699");
        assert_eq!(localize_float(-12.75), "-12,75");
        assert_eq!(localize_float(25.0), "25,0");
    }

    #[test]
    fn test_localize_float_exponent() {
        assert_eq!(localize_float(1e16), "1e+16");
        assert_eq!(localize_float(1.5e-5), "1,5e-05");
        assert_eq!(localize_float(2.5e-123), "2,5e-123");
        assert_eq!(localize_float(9999999999999998.0), "9999999999999998,0");
        assert_eq!(localize_float(0.0001), "0,0001");
    }

    #[test]
    fn test_header() {
        let output = render_utf8(&[]);
        assert_eq!(
            output,
            "Doklad;Číslo dokladu;Agenda;Řada dokladu;Druh;Okamžik vystavení;\
             Okamžik uskutečnění;Datum splatnosti;Text;Sazba DPH;Celkem v cizí měně;\
             Celkem;Měna;Název firmy;Jazyk faktury;Variabilní symbol;Kurz;Dal;Má dáti;\
             Typ dokladu;Související doklad\r\n"
        );
    }

    #[test]
    fn test_rows() {
        let rows = vec![
            row("0001", "15.01.2023", "USD", 100.0, ExchangeRate::Quoted(23.5)),
            row("0002", "01.03.2023", "Kč", 1000.0, ExchangeRate::Home),
        ];

        let output = render_utf8(&rows);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "pf0001;0001;PF;pf;NS;15.01.2023;15.01.2023;15.01.2023;Hosting;;100,0;2350,0;\
             USD;Acme;English;0;23,5;321;518o;F;INV-1"
        );
        assert_eq!(
            lines[2],
            "pf0002;0002;PF;pf;NS;01.03.2023;01.03.2023;01.03.2023;Hosting;;1000,0;1000,0;\
             Kč;Acme;English;0;1;321;518o;F;INV-1"
        );
    }

    #[test]
    fn test_no_decimal_points() {
        let mut r = row("0001", "15.01.2023", "EUR", 19.99, ExchangeRate::Quoted(24.315));
        r.tax_rate = Some(21.0);
        r.total_home = 486.06;

        let output = render_utf8(&[r]);
        let data_line = output.lines().nth(1).unwrap();
        let fields: Vec<&str> = data_line.split(';').collect();
        for column in [Column::TaxRate, Column::TotalAmount, Column::TotalHome, Column::Rate] {
            let idx = Column::ALL.iter().position(|&c| c == column).unwrap();
            assert!(!fields[idx].contains('.'), "{} = {}", column.key(), fields[idx]);
        }
        assert!(data_line.contains(";21,0;19,99;486,06;"));
        assert!(data_line.contains(";24,315;"));
    }

    #[test]
    fn test_quotes_delimiter_in_text() {
        let mut r = row("0001", "15.01.2023", "Kč", 1.0, ExchangeRate::Home);
        r.description = "Hosting; May".to_string();

        let output = render_utf8(&[r]);
        assert!(output.contains(";\"Hosting; May\";"));
    }

    #[test]
    fn test_cp1250() {
        let rows = vec![row("0001", "01.03.2023", "Kč", 1000.0, ExchangeRate::Home)];
        let utf8 = render_utf8(&rows);

        let bytes = CsvExporter::new()
            .with_encoding(OutputEncoding::Cp1250)
            .to_bytes(&rows)
            .unwrap();

        assert!(bytes.windows(2).any(|w| w == [b'K', 0xE8]));
        let (decoded, _, had_errors) = encoding_rs::WINDOWS_1250.decode(&bytes);
        assert!(!had_errors);
        assert_eq!(decoded, utf8);
    }

    #[test]
    fn test_from_config_rejects_non_ascii_delimiter() {
        let config = OutputConfig {
            delimiter: '§',
            ..OutputConfig::default()
        };
        assert!(matches!(
            CsvExporter::from_config(&config),
            Err(InvexError::Config(_))
        ));
    }

    #[test]
    fn test_write() {
        let mut out = Vec::new();
        CsvExporter::new()
            .write(&[row("0001", "15.01.2023", "Kč", 5.0, ExchangeRate::Home)], &mut out)
            .unwrap();
        assert!(String::from_utf8(out).unwrap().ends_with(";INV-1\r\n"));
    }
}
