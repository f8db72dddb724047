use chrono::{DateTime, Utc};
use festivo_catalog::PriceBreakdown;
use festivo_core::validation::Field;
use festivo_shared::{mask_card_number, BookingSelection};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use uuid::Uuid;

use crate::form::CheckoutForm;

pub const RECEIPT_HEADER: &str = "Festivo Payment Receipt";

/// Who paid, as printed on the receipt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptCustomer {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub card_type: String,
    /// `•••• 1111`
    pub card_masked: String,
}

impl ReceiptCustomer {
    pub fn from_form(form: &CheckoutForm) -> Self {
        Self {
            name: form.value(Field::Name).to_string(),
            email: form.value(Field::Email).to_string(),
            phone_number: form.value(Field::PhoneNumber).to_string(),
            address: form.value(Field::Address).to_string(),
            card_type: form.value(Field::CardType).to_string(),
            card_masked: mask_card_number(form.value(Field::CardNumber)),
        }
    }
}

/// Document produced after a successful payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: Uuid,
    pub transaction_id: String,
    pub issued_at: DateTime<Utc>,
    pub customer: ReceiptCustomer,
    pub booking: BookingSelection,
    pub breakdown: PriceBreakdown,
}

impl Receipt {
    pub fn new(
        transaction_id: String,
        customer: ReceiptCustomer,
        booking: BookingSelection,
        breakdown: PriceBreakdown,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            issued_at: Utc::now(),
            customer,
            booking,
            breakdown,
        }
    }

    /// Plain-text rendering for printing or attaching to an email
    pub fn render(&self) -> String {
        let mut out = String::new();
        let b = &self.booking;
        let p = &self.breakdown;

        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", RECEIPT_HEADER);
        let _ = writeln!(out, "Receipt No:      {}", self.id);
        let _ = writeln!(out, "Transaction ID:  {}", self.transaction_id);
        let _ = writeln!(out, "Date:            {}", self.issued_at.format("%B %-d, %Y"));
        let _ = writeln!(out);
        let _ = writeln!(out, "Customer");
        let _ = writeln!(out, "  Name:          {}", self.customer.name);
        let _ = writeln!(out, "  Email:         {}", self.customer.email);
        let _ = writeln!(out, "  Phone:         {}", self.customer.phone_number);
        let _ = writeln!(out, "  Address:       {}", self.customer.address);
        let _ = writeln!(out, "  Card:          {} {}", self.customer.card_type, self.customer.card_masked);
        let _ = writeln!(out);
        let _ = writeln!(out, "Booking");
        let _ = writeln!(out, "  Event:         {}", b.event_name());
        let _ = writeln!(out, "  Theme:         {}", b.event_theme());
        let _ = writeln!(out, "  Date:          {}", b.event_date().format("%B %-d, %Y"));
        let _ = writeln!(out, "  Type:          {}", b.event_type());
        let _ = writeln!(out, "  Guests:        {}", b.guest_count());
        let _ = writeln!(out, "  Package:       {}", b.package_tier());
        if !b.special_request().is_empty() {
            let _ = writeln!(out, "  Request:       {}", b.special_request());
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Package price:   {}", p.package_price);
        let _ = writeln!(out, "Service charge:  {}", p.service_charge);
        let _ = writeln!(out, "Tax:             {}", p.tax_amount);
        let _ = writeln!(out, "Total:           {}", p.total_amount);
        out
    }
}
