//! Pay command - run the x402 flow

use anyhow::Result;

use zephyr_client::payment::{OutcomeStatus, PaymentFlow, PaymentRequest};

use crate::ui;

pub async fn run(
    offline: bool,
    amount: &str,
    recipient: Option<&str>,
    native: bool,
) -> Result<()> {
    ui::header("x402 Payment");

    let (session, config) = super::build_session(offline)?;
    if session.connect().await.is_err() {
        return Ok(());
    }

    let recipient = recipient.unwrap_or(config.receiver.as_str());
    let request = if native {
        PaymentRequest::native(amount, recipient)
    } else {
        PaymentRequest::token(config.token_mint.clone(), amount, recipient)
    };

    let flow = PaymentFlow::new(session);
    if let Ok(outcome) = flow.pay(&request).await {
        match outcome.status {
            OutcomeStatus::Confirmed => ui::success("Payment confirmed"),
            OutcomeStatus::Submitted => ui::info("Payment submitted, finality unknown"),
            OutcomeStatus::Failed(_) => {
                ui::info("Payment reported failed; look up the transaction before retrying")
            }
        }
        if let Some(id) = outcome.transaction_id {
            ui::key_value("transaction", id.as_str());
        }
    }
    Ok(())
}
