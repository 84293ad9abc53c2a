//! Auth command - run the x401 flow

use anyhow::Result;

use zephyr_client::auth::AuthFlow;

use crate::ui;

pub async fn run(offline: bool) -> Result<()> {
    ui::header("x401 Authentication");

    let (session, _config) = super::build_session(offline)?;
    if session.connect().await.is_err() {
        return Ok(());
    }

    let flow = AuthFlow::new(session);
    if let Ok(assertion) = flow.authenticate().await {
        ui::success("Assertion verified locally");
        ui::key_value("message", &assertion.message);
        ui::key_value("signer", assertion.signer.as_str());
        ui::key_value("signature", &hex::encode(&assertion.signature));
    }
    Ok(())
}
