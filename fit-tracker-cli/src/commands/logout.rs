use anyhow::Result;

use crate::session::Session;
use crate::ui;

pub async fn logout(session: &mut Session) -> Result<()> {
    if !session.config.is_authenticated() {
        println!("You are not logged in.");
        return Ok(());
    }

    session.config.clear_token();
    session.save_config()?;
    session.reset_cache();

    ui::success("Logged out successfully!");

    Ok(())
}
