//! Picks at most one invoice per job.
//!
//! Candidates are the invoices of the job's customer, in the order the API
//! returned them. That order is the tie-break for both strategies, so a
//! remote service that reorders results can change which invoice wins.

use crate::models::fusion::Invoice;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    /// First invoice whose total is within tolerance of the job total.
    AmountMatch,
    /// Invoice with the greatest date string.
    MostRecent,
    None,
}

impl MatchMethod {
    pub fn label(&self) -> &'static str {
        match self {
            MatchMethod::AmountMatch => "Amount Match",
            MatchMethod::MostRecent => "Most Recent",
            MatchMethod::None => "None",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InvoiceMatch<'a> {
    pub invoice: Option<&'a Invoice>,
    pub method: MatchMethod,
}

/// Partition invoices by customer name, keeping input order within each
/// customer. Invoices without a customer name are not indexed.
pub fn index_by_customer(invoices: &[Invoice]) -> HashMap<String, Vec<Invoice>> {
    let mut index: HashMap<String, Vec<Invoice>> = HashMap::new();
    for invoice in invoices {
        match invoice.customer.as_deref() {
            Some(customer) if !customer.is_empty() => {
                index.entry(customer.to_string()).or_default().push(invoice.clone());
            }
            _ => {}
        }
    }
    index
}

/// Relative tolerance check against a positive job total.
fn within_tolerance(job_total: f64, invoice_total: f64, tolerance: f64) -> bool {
    invoice_total > 0.0 && (invoice_total - job_total).abs() / job_total <= tolerance
}

pub fn match_invoice<'a>(job_total: Option<f64>, candidates: &'a [Invoice], tolerance: f64) -> InvoiceMatch<'a> {
    let job_total = job_total.unwrap_or(0.0);

    if job_total > 0.0
        && let Some(invoice) = candidates
            .iter()
            .find(|inv| within_tolerance(job_total, inv.total.unwrap_or(0.0), tolerance))
    {
        return InvoiceMatch {
            invoice: Some(invoice),
            method: MatchMethod::AmountMatch,
        };
    }

    // max_by_key keeps the last maximum; fold keeps the first.
    let most_recent = candidates.iter().fold(None::<&Invoice>, |best, inv| match best {
        Some(b) if date_key(b) >= date_key(inv) => Some(b),
        _ => Some(inv),
    });

    match most_recent {
        Some(invoice) => InvoiceMatch {
            invoice: Some(invoice),
            method: MatchMethod::MostRecent,
        },
        None => InvoiceMatch {
            invoice: None,
            method: MatchMethod::None,
        },
    }
}

fn date_key(invoice: &Invoice) -> &str {
    invoice.date.as_deref().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(id: &str, total: f64, date: &str) -> Invoice {
        Invoice {
            id: Some(id.into()),
            customer: Some("Acme".into()),
            total: Some(total),
            date: Some(date.into()),
        }
    }

    #[test]
    fn first_invoice_within_tolerance_wins() {
        let candidates = vec![
            invoice("a", 85.0, "2024-01-01"),
            invoice("b", 130.0, "2024-02-01"),
            invoice("c", 109.0, "2024-03-01"),
            invoice("d", 100.0, "2024-04-01"),
        ];
        let m = match_invoice(Some(100.0), &candidates, 0.1);
        assert_eq!(m.method, MatchMethod::AmountMatch);
        assert_eq!(m.invoice.and_then(|i| i.id.as_deref()), Some("c"));
    }

    #[test]
    fn zero_total_falls_back_to_most_recent() {
        let candidates = vec![invoice("a", 50.0, "2024-01-01"), invoice("b", 70.0, "2024-03-01")];
        let m = match_invoice(Some(0.0), &candidates, 0.1);
        assert_eq!(m.method, MatchMethod::MostRecent);
        assert_eq!(m.invoice.and_then(|i| i.date.as_deref()), Some("2024-03-01"));
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let candidates = vec![invoice("a", 1.0, "2024-03-01"), invoice("b", 2.0, "2024-03-01")];
        let m = match_invoice(None, &candidates, 0.1);
        assert_eq!(m.invoice.and_then(|i| i.id.as_deref()), Some("a"));
    }

    #[test]
    fn no_candidates_no_match() {
        let m = match_invoice(Some(100.0), &[], 0.1);
        assert!(m.invoice.is_none());
        assert_eq!(m.method.label(), "None");
    }

    #[test]
    fn index_skips_invoices_without_customer() {
        let mut orphan = invoice("x", 10.0, "2024-01-01");
        orphan.customer = Some(String::new());
        let index = index_by_customer(&[invoice("a", 1.0, "2024-01-01"), orphan]);
        assert_eq!(index.len(), 1);
        assert_eq!(index["Acme"].len(), 1);
    }
}
