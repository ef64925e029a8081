use anyhow::Result;
use clap::Args;
use dialoguer::{Input, Password};

use crate::session::Session;
use crate::ui;

#[derive(Args)]
pub struct AuthArgs {
    /// Username (prompted when omitted)
    #[arg(short, long)]
    username: Option<String>,

    /// Password (prompted when omitted)
    #[arg(short, long, env = "FIT_TRACKER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl AuthArgs {
    fn resolve(self) -> Result<(String, String)> {
        let username = match self.username {
            Some(username) => username,
            None => Input::new().with_prompt("Username").interact_text()?,
        };
        let password = match self.password {
            Some(password) => password,
            None => Password::new().with_prompt("Password").interact()?,
        };
        Ok((username, password))
    }
}

#[derive(Clone, Copy)]
enum Flow {
    Login,
    Register,
}

pub async fn login(session: &mut Session, args: AuthArgs) -> Result<()> {
    authenticate(session, args, Flow::Login).await
}

pub async fn register(session: &mut Session, args: AuthArgs) -> Result<()> {
    authenticate(session, args, Flow::Register).await
}

async fn authenticate(session: &mut Session, args: AuthArgs, flow: Flow) -> Result<()> {
    let (username, password) = args.resolve()?;

    let result = match flow {
        Flow::Login => session.client().login(&username, &password).await,
        Flow::Register => session.client().register(&username, &password).await,
    };

    let token = match result {
        Ok(token) => token,
        Err(e) => {
            println!("✗ {}", e);
            return Err(e.into());
        }
    };

    // new session, start from an empty AI cache
    session.reset_cache();
    session.config.set_token(username.clone(), token);
    session.save_config()?;

    match flow {
        Flow::Login => ui::success(format!("Logged in as {}", username)),
        Flow::Register => ui::success(format!("Account created. Welcome, {}!", username)),
    }

    if session.client().get_profile().await.ok().flatten().is_none() {
        ui::info("No profile yet. Create one with `fit-tracker profile set`.");
    }

    Ok(())
}
