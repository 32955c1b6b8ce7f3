//! Account commands.

use anyhow::{Result, bail};

use tomo_application::{AppController, Screen};
use tomo_core::auth::AuthService;

pub async fn login(controller: &AppController, username: &str, password: &str) -> Result<()> {
    controller.login(username, password).await?;
    match controller.current_user().await {
        Some(user) => println!("Signed in as {}", user.email),
        None => println!("Signed in"),
    }
    Ok(())
}

pub async fn register(auth: &dyn AuthService, email: &str, password: &str) -> Result<()> {
    let user = auth.register(email, password).await?;
    println!("Registered {} (id {})", user.email, user.id);
    println!("Run `tomo login {}` to sign in.", user.email);
    Ok(())
}

pub async fn logout(controller: &AppController) -> Result<()> {
    controller.logout().await?;
    println!("Signed out");
    Ok(())
}

pub async fn whoami(controller: &AppController) -> Result<()> {
    if controller.startup().await? == Screen::Login {
        bail!("not signed in; run `tomo login` first");
    }
    match controller.current_user().await {
        Some(user) => {
            println!("{} ({}, {})", user.email, user.role, if user.is_active { "active" } else { "inactive" });
        }
        None => bail!("could not load the current user"),
    }
    Ok(())
}
