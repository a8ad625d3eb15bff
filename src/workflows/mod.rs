pub mod price_paid;
