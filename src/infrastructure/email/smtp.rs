use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::{ports::Mailer, DomainError};
use crate::infrastructure::config::SmtpConfig;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    verify_base_url: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, DomainError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| DomainError::external(format!("SMTP relay: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
            verify_base_url: config.verify_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn verification_body(&self, to: &str, code: &str) -> String {
        let link = format!(
            "{}/api/v1/auth/verify-email?code={code}&email={to}",
            self.verify_base_url
        );
        format!(
            "<h3>Thank you for registering for Interview Pilot</h3>\
             <p>Your verification code is: <strong>{code}</strong></p>\
             <p>Please click the link below to verify your email:</p>\
             <a href=\"{link}\">Verify Email</a>\
             <p>If you did not request this, please ignore this email.</p>"
        )
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_verification(&self, to: &str, code: &str) -> Result<(), DomainError> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| DomainError::internal(format!("bad sender address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| DomainError::validation(format!("bad recipient address: {e}")))?)
            .subject("Interview Pilot Email Verification")
            .header(ContentType::TEXT_HTML)
            .body(self.verification_body(to, code))
            .map_err(|e| DomainError::internal(format!("build mail: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DomainError::external(format!("SMTP send: {e}")))?;
        Ok(())
    }
}
