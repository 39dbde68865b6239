//! CRMS terminal front-end
//!
//! Signs in against the hosted backend (or the offline demo when
//! `CRMS_BACKEND_URL` is unset) and runs the interactive menu.

mod app;
mod console;
mod demo;
mod gateway;
mod logger;

use std::sync::Arc;

use crms_client::Notifier;

use crate::app::{App, Exit};
use crate::console::{Console, ConsoleNotifier};
use crate::gateway::Gateway;
use crate::logger::LogSettings;

/// Load `.env` and start logging
fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logger::init_logger(&LogSettings::from_env())
}

fn print_banner(demo: bool) {
    println!(
        r#"
   ____ ____  __  __ ____
  / ___|  _ \|  \/  / ___|
 | |   | |_) | |\/| \___ \
 | |___|  _ <| |  | |___) |
  \____|_| \_\_|  |_|____/
  Campus Resource Management System"#
    );
    if demo {
        println!("  (demo data, nothing leaves this machine)");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_environment()?;

    let gateway = Gateway::from_env()?;
    print_banner(gateway.is_demo());

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let mut console = Console::stdio();

    while let Some((session, backend)) = gateway.sign_in(&mut console).await? {
        let mut app = App::new(backend, notifier.clone(), session);
        match app.run(&mut console).await? {
            Exit::SignOut => {
                gateway.sign_out(app.session()).await;
                console.say("Signed out.")?;
            }
            Exit::Quit => break,
        }
    }

    tracing::info!("Bye");
    Ok(())
}
