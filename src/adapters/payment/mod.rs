//! Payment adapters.

mod online_payment_links;

pub use online_payment_links::OnlinePaymentLinks;
