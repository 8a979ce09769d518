mod stripe;

pub use stripe::StripeGateway;
