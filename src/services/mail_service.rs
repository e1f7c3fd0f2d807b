//! Order emails. Bodies are plain text built from the order; delivery goes
//! through a [`MailTransport`] chosen from configuration.

use crate::api::config::Config;
use crate::data::models::order::Order;
use crate::utils::mappers::timestamp_string;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound for one relay request; mail is sent inline with the request
/// that triggered it.
pub const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail relay request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("mail relay answered {0}")]
    Rejected(u16),
    #[error("no recipient address")]
    NoRecipient,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Posts mails as JSON to an HTTP relay.
pub struct HttpMailTransport {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailTransport {
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        from: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(HttpMailTransport {
            client,
            url: url.into(),
            api_key,
            from: from.into(),
        })
    }
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let mut request = self.client.post(&self.url).json(&RelayRequest {
            from: &self.from,
            to: &mail.to,
            subject: &mail.subject,
            text: &mail.body,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status().as_u16()));
        }

        Ok(())
    }
}

/// Writes mails to the log instead of delivering them.
pub struct LogMailTransport;

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "mail (log transport)\n{}", mail.body);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderMailKind {
    Placed,
    Confirmed,
    ReadyForPickup,
    Cancelled,
}

impl OrderMailKind {
    fn subject_prefix(&self) -> &'static str {
        match self {
            OrderMailKind::Placed => "Order Confirmation",
            OrderMailKind::Confirmed => "Order Confirmed",
            OrderMailKind::ReadyForPickup => "Your Order is Ready for Pickup",
            OrderMailKind::Cancelled => "Order Cancelled",
        }
    }

    fn opening(&self) -> &'static str {
        match self {
            OrderMailKind::Placed => {
                "Thank you for your order! It has been received and is pending confirmation."
            }
            OrderMailKind::Confirmed => {
                "Your order has been confirmed and is being prepared."
            }
            OrderMailKind::ReadyForPickup => "Good news! Your order is ready for pickup.",
            OrderMailKind::Cancelled => "Your order has been cancelled.",
        }
    }
}

/// One line of an order as it appears in an email.
#[derive(Debug, Clone)]
pub struct MailLine {
    pub title: String,
    pub size: Option<String>,
    pub quantity: i32,
    pub subtotal: BigDecimal,
}

/// Everything an order email needs besides the order row itself.
#[derive(Debug, Clone, Default)]
pub struct OrderMailContext {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub department_name: Option<String>,
    pub lines: Vec<MailLine>,
}

/// The order's own email, falling back to the account address.
pub fn recipient(order: &Order, ctx: &OrderMailContext) -> Option<String> {
    Some(order.email.trim())
        .filter(|email| !email.is_empty())
        .map(str::to_string)
        .or_else(|| ctx.customer_email.clone().filter(|e| !e.trim().is_empty()))
}

pub fn compose_order_mail(
    kind: OrderMailKind,
    order: &Order,
    ctx: &OrderMailContext,
) -> Result<OutgoingMail, MailError> {
    let to = recipient(order, ctx).ok_or(MailError::NoRecipient)?;

    let mut body = String::new();
    let greeting = ctx.customer_name.as_deref().unwrap_or("there");
    let _ = writeln!(body, "Hi {greeting},\n");
    let _ = writeln!(body, "{}\n", kind.opening());
    let _ = writeln!(body, "Order number: {}", order.order_number);
    if let Some(department) = &ctx.department_name {
        let _ = writeln!(body, "Department: {department}");
    }
    let _ = writeln!(body, "Status: {}", order.status_display());

    if !ctx.lines.is_empty() {
        let _ = writeln!(body, "\nItems:");
        for line in &ctx.lines {
            let size = line
                .size
                .as_deref()
                .map(|s| format!(" ({s})"))
                .unwrap_or_default();
            let _ = writeln!(
                body,
                "  - {}{} x{}: ₱{}",
                line.title, size, line.quantity, line.subtotal
            );
        }
    }

    let _ = writeln!(body);
    if order.has_discount() {
        let _ = writeln!(body, "Subtotal: ₱{}", order.original_amount);
        let _ = writeln!(body, "Discount: -₱{}", order.discount_amount);
    }
    let _ = writeln!(body, "Total: ₱{}", order.total_amount);
    let _ = writeln!(
        body,
        "Reservation fee (35%): ₱{}{}",
        order.reservation_fee_amount,
        if order.reservation_fee_paid { " (paid)" } else { "" }
    );
    let _ = writeln!(
        body,
        "Remaining balance (65%, cash on pickup): ₱{}",
        order.remaining_balance()
    );

    if let Some(pickup) = timestamp_string(order.pickup_date) {
        let _ = writeln!(body, "Pickup date: {}", pickup.replace('T', " "));
    }

    if kind == OrderMailKind::Placed && !order.reservation_fee_paid {
        let _ = writeln!(
            body,
            "\nPlease upload your reservation fee receipt so the department can confirm your order."
        );
    }

    Ok(OutgoingMail {
        to,
        subject: format!("{} - {}", kind.subject_prefix(), order.order_number),
        body,
    })
}

#[derive(Clone)]
pub struct MailService {
    transport: Arc<dyn MailTransport>,
}

impl MailService {
    /// Uses the HTTP relay when `MAIL_API_URL` is set, the log otherwise.
    pub fn new() -> Self {
        let config = Config::new();

        let Some(url) = config.mail_api_url else {
            return Self::with_transport(Arc::new(LogMailTransport));
        };

        match HttpMailTransport::new(url, config.mail_api_key, config.mail_from, RELAY_TIMEOUT) {
            Ok(transport) => Self::with_transport(Arc::new(transport)),
            Err(e) => {
                tracing::error!(error = %e, "failed to build mail relay client, logging mail instead");
                Self::with_transport(Arc::new(LogMailTransport))
            }
        }
    }

    pub fn with_transport(transport: Arc<dyn MailTransport>) -> Self {
        MailService { transport }
    }

    /// Sends the mail; failures are logged and reported as `false`.
    pub async fn send_order_mail(
        &self,
        kind: OrderMailKind,
        order: &Order,
        ctx: &OrderMailContext,
    ) -> bool {
        let result = match compose_order_mail(kind, order, ctx) {
            Ok(mail) => self.transport.send(&mail).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::info!(order = %order.order_number, ?kind, "order mail sent");
                true
            }
            Err(e) => {
                tracing::error!(order = %order.order_number, ?kind, error = %e, "failed to send order mail");
                false
            }
        }
    }
}

impl Default for MailService {
    fn default() -> Self {
        Self::new()
    }
}
