use tracing::info;

use crate::accounts::AccountEvent;

/// Receives account events synchronously, in registration order.
pub trait Observer {
    fn update(&self, event: &AccountEvent);
    fn label(&self) -> String;
}

/// Routes account events to a customer's email address. Delivery here is a
/// structured log record; a real mailer would slot in behind the same trait.
pub struct EmailObserver {
    email: String,
    customer_name: String,
}

impl EmailObserver {
    pub fn new(email: &str, customer_name: &str) -> EmailObserver {
        EmailObserver {
            email: email.to_string(),
            customer_name: customer_name.to_string(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }
}

impl Observer for EmailObserver {
    fn update(&self, event: &AccountEvent) {
        info!(
            channel = "email",
            to = %self.email,
            customer = %self.customer_name,
            event = %event,
            "account notification"
        );
    }

    fn label(&self) -> String {
        format!("email:{}", self.email)
    }
}
