//! Payment gateway clients implementing [`PaymentProvider`].
//!
//! [`PaymentProvider`]: ezemailer_core::payment::PaymentProvider

pub mod razorpay;
