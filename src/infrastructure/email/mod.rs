mod smtp;

pub use smtp::SmtpMailer;
