//! Connect command - establish a wallet session

use anyhow::Result;

use zephyr_client::session::ConnectOutcome;

use crate::ui;

pub async fn run(offline: bool) -> Result<()> {
    ui::header("Connect Wallet");

    let (session, config) = super::build_session(offline)?;
    match session.connect().await {
        Ok(ConnectOutcome::Connected(account)) => {
            ui::success("Session established");
            ui::key_value("account", account.as_str());
            ui::key_value("endpoint", &config.rpc_endpoint);
        }
        Ok(ConnectOutcome::RedirectIssued(url)) => {
            ui::info("No in-page provider; open the wallet app to continue");
            ui::key_value("handshake", &url);
        }
        Err(_) => {
            // Already reported on the status channel.
        }
    }
    Ok(())
}
